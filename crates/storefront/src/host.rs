//! A host that logs and records every callback, for `simulate`.

use parking_lot::Mutex;
use schema::Value;
use storefront_engine::{Host, Navigation};
use tracing::{debug, trace};

/// Records host callbacks as one-line descriptions.
#[derive(Debug, Default)]
pub struct ConsoleHost {
    /// Calls in order.
    calls: Mutex<Vec<String>>,
}

impl ConsoleHost {
    /// Append one call.
    fn record(&self, call: String) {
        debug!(%call, "host_call");
        self.calls.lock().push(call);
    }

    /// Every recorded call so far.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }
}

impl Host for ConsoleHost {
    fn navigate(&self, url: &str, how: Navigation) {
        self.record(format!("navigate {url} ({how})"));
    }

    fn toggle_drawer(&self, id: &str) {
        self.record(format!("toggle_drawer {id}"));
    }

    fn toggle_theme(&self) {
        self.record("toggle_theme".to_string());
    }

    fn search(&self, query: &str) {
        self.record(format!("search {query:?}"));
    }

    fn slider_prev(&self, target: &str) {
        self.record(format!("slider_prev {target}"));
    }

    fn slider_next(&self, target: &str) {
        self.record(format!("slider_next {target}"));
    }

    fn slider_goto(&self, index: usize) {
        self.record(format!("slider_goto {index}"));
    }

    fn toggle_accordion(&self, id: &str) {
        self.record(format!("toggle_accordion {id}"));
    }

    fn toggle_dropdown(&self, id: &str) {
        self.record(format!("toggle_dropdown {id}"));
    }

    fn set_style(&self, target: &str, value: &Value) {
        self.record(format!("set_style {target} {value}"));
    }

    fn request_render(&self) {
        trace!("render_requested");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_in_order() {
        let host = ConsoleHost::default();
        host.toggle_drawer("cart_drawer");
        host.request_render();
        host.navigate("/shop", Navigation::Client);
        host.search("");
        assert_eq!(
            host.calls(),
            ["toggle_drawer cart_drawer", "navigate /shop (client)", "search \"\""]
        );
    }
}
