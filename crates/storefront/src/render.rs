//! The `render` command and the tree loading it shares with `simulate`.

use std::sync::Arc;

use schema::{
    EngineSettings, Map, load_blocks_from_path, load_data_from_path, load_settings_from_path,
};
use storefront_engine::{Host, NoopHost, RenderOutput, RenderTree};
use tokio::runtime::Handle;
use tracing::info;

use crate::{
    cli::{Format, RenderArgs, TreeArgs},
    error::Result,
};

/// Load the tree, data and settings named by `args`.
pub fn load(
    args: &TreeArgs,
    host: Arc<dyn Host>,
    runtime: Option<Handle>,
) -> Result<(RenderTree, Map)> {
    let blocks = load_blocks_from_path(&args.blocks)?;
    let data = match &args.data {
        Some(path) => load_data_from_path(path)?,
        None => Map::new(),
    };
    let settings = match &args.settings {
        Some(path) => load_settings_from_path(path)?,
        None => EngineSettings::default(),
    };
    info!(
        path = %args.blocks.display(),
        roots = blocks.len(),
        data_keys = data.len(),
        "tree_loaded"
    );
    let tree = RenderTree::with_options(blocks, host, settings, runtime);
    tree.set_viewport(args.viewport);
    Ok((tree, data))
}

/// Print diagnostics to stderr.
pub fn report_diagnostics(out: &RenderOutput) {
    for d in &out.diagnostics {
        eprintln!("warning: {d}");
    }
}

/// Render once and print the result in the requested format.
pub fn run(args: &RenderArgs) -> Result<()> {
    let (tree, data) = load(&args.tree, Arc::new(NoopHost), None)?;
    let out = tree.render(&data);
    report_diagnostics(&out);
    match args.format {
        Format::Html => println!("{}", out.to_html()),
        Format::Json => println!("{}", serde_json::to_string_pretty(&out)?),
    }
    Ok(())
}
