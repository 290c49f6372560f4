//! The `simulate` command: fire handlers against a live tree and report host calls.

use std::{sync::Arc, time::Duration};

use storefront_engine::{HandlerId, RenderOutput};
use tokio::{runtime::Handle, task, time};
use tracing::info;

use crate::{
    cli::{Fire, FireTarget, SimulateArgs},
    error::{Error, Result},
    host::ConsoleHost,
    render::{load, report_diagnostics},
};

/// Handler a `--fire` argument addresses in `out`.
fn handler_for(out: &RenderOutput, fire: &Fire) -> Result<HandlerId> {
    match &fire.target {
        FireTarget::Handler(id) => Ok(HandlerId(*id)),
        FireTarget::Element(id) => out
            .find_by_id(id)
            .and_then(|el| el.handler(fire.event_name()))
            .ok_or_else(|| Error::UnknownTarget(fire.raw.clone())),
    }
}

/// Render, fire each event followed by a re-render, let pending timers settle,
/// then print the final HTML and the host calls.
pub async fn run(args: &SimulateArgs) -> Result<()> {
    let host = Arc::new(ConsoleHost::default());
    let (tree, data) = load(&args.tree, host.clone(), Some(Handle::current()))?;
    let mut out = tree.render(&data);
    report_diagnostics(&out);

    for fire in &args.fire {
        let id = handler_for(&out, fire)?;
        info!(fire = %fire.raw, handler = id.0, "fire");
        if !tree.fire(id, fire.event.clone()) {
            return Err(Error::UnknownTarget(fire.raw.clone()));
        }
        task::yield_now().await;
        out = tree.render(&data);
    }

    time::sleep(Duration::from_millis(tree.settings().debounce_ms + 1)).await;
    task::yield_now().await;
    out = tree.render(&data);
    tree.shutdown_async().await;

    println!("{}", out.to_html());
    for call in host.calls() {
        println!("host: {call}");
    }
    Ok(())
}
