//! Progress indicator blocks tracking a named carousel.

use schema::{Block, Value};
use tracing::trace;

use crate::{
    binding::format_number,
    element::shell,
    node::Node,
    registry::DEFAULT_CAROUSEL_KEY,
    render::RenderCx,
    scope::Scope,
};

/// Fill percentage for slide `active` of `total`, clamped to 0..=100.
fn fill_percent(active: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    ((active + 1) as f64 / total as f64 * 100.0).min(100.0)
}

/// Positive slide total declared in the block's data.
fn declared_total(block: &Block) -> Option<usize> {
    match block.data.get("total_slides")? {
        Value::Number(n) => n.as_u64().map(|n| n as usize),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
    .filter(|n| *n > 0)
}

/// Render a progress bar for the carousel named by `data.swiper_target`.
///
/// The width reflects the carousel's active slide; with no carousel yet
/// the bar renders empty and the pass is told so.
pub(crate) fn render(cx: &mut dyn RenderCx, block: &Block, scope: &Scope<'_>) -> Node {
    let target = match block.data.get("swiper_target") {
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        _ => DEFAULT_CAROUSEL_KEY.to_string(),
    };
    let mut el = shell(cx, block, scope);
    let percent = match cx.shared().registry.find(&target) {
        Some(handle) => {
            let total = declared_total(block).unwrap_or_else(|| handle.slide_count().max(1));
            fill_percent(handle.active_index(), total)
        }
        None => {
            trace!(%target, "progress_target_missing");
            cx.progress_unresolved();
            0.0
        }
    };
    let percent = format_number(percent);
    el.style.set("width", format!("{percent}%"));
    el.set_attr("data-progress", percent);
    el.set_attr("data-swiper-target", target);
    el.into()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn percent_of_active_slide() {
        assert_eq!(fill_percent(0, 4), 25.0);
        assert_eq!(fill_percent(3, 4), 100.0);
        assert_eq!(fill_percent(5, 4), 100.0);
        assert_eq!(fill_percent(0, 0), 0.0);
    }

    #[test]
    fn declared_total_must_be_positive() {
        let block: Block =
            serde_json::from_value(json!({"type": "progress_bar", "data": {"total_slides": 0}}))
                .unwrap();
        assert_eq!(declared_total(&block), None);
        let block: Block =
            serde_json::from_value(json!({"type": "progress_bar", "data": {"total_slides": "5"}}))
                .unwrap();
        assert_eq!(declared_total(&block), Some(5));
    }
}
