#![allow(dead_code)]

use std::sync::Arc;

use parking_lot::Mutex;
use schema::{Block, EngineSettings, Map, Value};
use storefront_engine::{Element, Host, Navigation, Node, RenderOutput, RenderTree};
use tokio::runtime::Handle;
use tracing_subscriber::EnvFilter;

/// One host callback.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Navigate(String, Navigation),
    ToggleDrawer(String),
    ToggleTheme,
    Search(String),
    SliderPrev(String),
    SliderNext(String),
    SliderGoto(usize),
    ToggleAccordion(String),
    ToggleDropdown(String),
    SetStyle(String, Value),
    RequestRender,
}

/// Host that records every callback.
#[derive(Debug, Default)]
pub struct RecordingHost {
    calls: Mutex<Vec<Call>>,
}

impl RecordingHost {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn record(&self, call: Call) {
        self.calls.lock().push(call);
    }

    /// Every call so far, render requests included.
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    /// Calls other than render requests.
    pub fn actions(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| *c != Call::RequestRender)
            .collect()
    }

    /// Queries passed to `search`.
    pub fn searches(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Search(q) => Some(q),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        self.calls.lock().clear();
    }
}

impl Host for RecordingHost {
    fn navigate(&self, url: &str, how: Navigation) {
        self.record(Call::Navigate(url.to_string(), how));
    }

    fn toggle_drawer(&self, id: &str) {
        self.record(Call::ToggleDrawer(id.to_string()));
    }

    fn toggle_theme(&self) {
        self.record(Call::ToggleTheme);
    }

    fn search(&self, query: &str) {
        self.record(Call::Search(query.to_string()));
    }

    fn slider_prev(&self, target: &str) {
        self.record(Call::SliderPrev(target.to_string()));
    }

    fn slider_next(&self, target: &str) {
        self.record(Call::SliderNext(target.to_string()));
    }

    fn slider_goto(&self, index: usize) {
        self.record(Call::SliderGoto(index));
    }

    fn toggle_accordion(&self, id: &str) {
        self.record(Call::ToggleAccordion(id.to_string()));
    }

    fn toggle_dropdown(&self, id: &str) {
        self.record(Call::ToggleDropdown(id.to_string()));
    }

    fn set_style(&self, target: &str, value: &Value) {
        self.record(Call::SetStyle(target.to_string(), value.clone()));
    }

    fn request_render(&self) {
        self.record(Call::RequestRender);
    }
}

pub fn block(v: Value) -> Block {
    serde_json::from_value(v).expect("block json")
}

pub fn data(v: Value) -> Map {
    v.as_object().cloned().expect("data object")
}

/// Route engine logs to the test writer; `RUST_LOG=storefront_engine=trace` to see them.
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init()
        .ok();
}

/// Tree without a runtime: timers are never scheduled.
pub fn tree(root: Value, host: &Arc<RecordingHost>) -> RenderTree {
    init_tracing();
    RenderTree::with_options(
        vec![block(root)],
        host.clone(),
        EngineSettings::default(),
        None,
    )
}

/// Tree on the current tokio runtime.
pub fn live_tree(root: Value, host: &Arc<RecordingHost>) -> RenderTree {
    init_tracing();
    RenderTree::with_options(
        vec![block(root)],
        host.clone(),
        EngineSettings::default(),
        Handle::try_current().ok(),
    )
}

/// The element with `id`, panicking when absent.
pub fn by_id<'a>(out: &'a RenderOutput, id: &str) -> &'a Element {
    out.find_by_id(id)
        .unwrap_or_else(|| panic!("no element #{id} in {}", out.to_html()))
}

/// Text content of an element's subtree.
pub fn text(el: &Element) -> String {
    Node::from(el.clone()).text_content()
}
