//! Command-line interface definitions for the storefront binary.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use logging::LogArgs;
use storefront_engine::UiEvent;

/// Command-line interface for the `storefront` binary.
#[derive(Parser, Debug)]
#[command(
    name = "storefront",
    about = "Render and inspect declarative storefront block trees",
    version
)]
pub struct Cli {
    /// Logging controls.
    #[command(flatten)]
    pub log: LogArgs,

    /// What to do.
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render a block tree against a data file and print the result.
    Render(RenderArgs),
    /// Parse a block tree and summarize its blocks and declared state.
    Check(CheckArgs),
    /// List the canonical icon names.
    Icons,
    /// Render, fire handlers in order, and report what the host saw.
    Simulate(SimulateArgs),
}

/// Output format for `render`.
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Format {
    /// Serialized HTML.
    #[default]
    Html,
    /// The node tree and diagnostics as JSON.
    Json,
}

/// Inputs shared by commands that render.
#[derive(Args, Debug, Clone)]
pub struct TreeArgs {
    /// Block tree JSON: one block object or a list of them.
    #[arg(long, value_name = "PATH")]
    pub blocks: PathBuf,

    /// Render data JSON object.
    #[arg(long, value_name = "PATH")]
    pub data: Option<PathBuf>,

    /// Engine settings (`.ron` or `.json`).
    #[arg(long, value_name = "PATH")]
    pub settings: Option<PathBuf>,

    /// Viewport width in pixels, for carousel breakpoints.
    #[arg(long, value_name = "PX")]
    pub viewport: Option<u32>,
}

/// Arguments for the `render` subcommand.
#[derive(Args, Debug, Clone)]
pub struct RenderArgs {
    /// Tree and data inputs.
    #[command(flatten)]
    pub tree: TreeArgs,

    /// Output format.
    #[arg(long, value_enum, default_value_t = Format::Html)]
    pub format: Format,
}

/// Arguments for the `check` subcommand.
#[derive(Args, Debug, Clone)]
pub struct CheckArgs {
    /// Block tree JSON.
    #[arg(long, value_name = "PATH")]
    pub blocks: PathBuf,
}

/// Arguments for the `simulate` subcommand.
#[derive(Args, Debug, Clone)]
pub struct SimulateArgs {
    /// Tree and data inputs.
    #[command(flatten)]
    pub tree: TreeArgs,

    /// Events to fire, in order: `TARGET[:EVENT[=VALUE]]`.
    ///
    /// TARGET is a numeric handler id or an element id. EVENT is one of
    /// click (default), mouseenter, mouseleave, submit, input=TEXT, key=NAME.
    #[arg(long = "fire", value_name = "HANDLER", value_parser = parse_fire, num_args = 1..)]
    pub fire: Vec<Fire>,
}

/// What a `--fire` argument addresses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FireTarget {
    /// A handler id from the last render pass.
    Handler(u32),
    /// The element with this id.
    Element(String),
}

/// One parsed `--fire` argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fire {
    /// The argument as written.
    pub raw: String,
    /// Addressed handler or element.
    pub target: FireTarget,
    /// Event delivered to the handler.
    pub event: UiEvent,
}

impl Fire {
    /// DOM event name an element wires this event under.
    pub fn event_name(&self) -> &'static str {
        match self.event {
            UiEvent::Click => "click",
            UiEvent::MouseEnter => "mouseenter",
            UiEvent::MouseLeave => "mouseleave",
            UiEvent::Submit => "submit",
            UiEvent::Input(_) => "input",
            UiEvent::Key(_) => "keydown",
        }
    }
}

/// Parse `TARGET[:EVENT[=VALUE]]`.
fn parse_fire(s: &str) -> Result<Fire, String> {
    let (target, event) = s.split_once(':').unwrap_or((s, "click"));
    if target.is_empty() {
        return Err("missing target".to_string());
    }
    let (name, value) = match event.split_once('=') {
        Some((name, value)) => (name, Some(value)),
        None => (event, None),
    };
    let event = match (name, value) {
        ("click", None) => UiEvent::Click,
        ("mouseenter", None) => UiEvent::MouseEnter,
        ("mouseleave", None) => UiEvent::MouseLeave,
        ("submit", None) => UiEvent::Submit,
        ("input", Some(text)) => UiEvent::Input(text.to_string()),
        ("key", Some(key)) => UiEvent::Key(key.to_string()),
        _ => return Err(format!("unknown event `{event}`")),
    };
    let target = match target.parse() {
        Ok(id) => FireTarget::Handler(id),
        Err(_) => FireTarget::Element(target.to_string()),
    };
    Ok(Fire {
        raw: s.to_string(),
        target,
        event,
    })
}
