//! Action dispatch: turning declared event descriptors into runnable handlers.
//!
//! Targets are resolved when the handler is wired (during the render pass)
//! so a handler closes over the item it was rendered for. Running a handler
//! mutates tree state and calls into the host.

use std::sync::Arc;

use schema::{Action, Value, is_binding_path};
use tracing::{debug, trace};

use crate::{
    binding::{display, resolve, resolve_str},
    carousel::CarouselHandle,
    host::{Host, classify_url},
    registry::DEFAULT_CAROUSEL_KEY,
    render::Shared,
    scope::Scope,
    visibility::MOBILE_MENU_ID,
};

/// Section id prefix whose arrows address the section's own carousel.
const HERO_SECTION_PREFIX: &str = "hero-";

/// A UI event delivered to [`crate::RenderTree::fire`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    /// Pointer click.
    Click,
    /// Pointer entered the element.
    MouseEnter,
    /// Pointer left the element.
    MouseLeave,
    /// Form submit.
    Submit,
    /// Text entry; carries the input's new value.
    Input(String),
    /// Key press; carries the key name (`"Enter"`).
    Key(String),
}

/// Slide movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SliderOp {
    /// One slide back.
    Prev,
    /// One slide forward.
    Next,
    /// To an index; `None` when the target was not a number.
    Goto(Option<usize>),
}

/// Which carousel a slider action drives.
#[derive(Debug, Clone)]
pub(crate) enum SliderRoute {
    /// The carousel the control was rendered inside.
    Local(CarouselHandle),
    /// A registry name looked up when the action runs.
    Named(String),
}

/// A wired handler, valid for one render pass.
#[derive(Debug, Clone)]
pub(crate) enum Handler {
    /// Close the mobile menu if open, then follow the URL.
    Navigate {
        /// Resolved URL; `None` when a bound target did not resolve.
        url: Option<String>,
    },
    /// Flip a drawer.
    ToggleDrawer(String),
    /// Flip an accordion.
    ToggleAccordion(String),
    /// Switch theme.
    ToggleTheme,
    /// Search with the current query.
    Search,
    /// Move a carousel.
    Slider {
        /// Movement.
        op: SliderOp,
        /// Addressed carousel.
        route: SliderRoute,
    },
    /// Open or close a dropdown.
    ToggleDropdown(String),
    /// Forward a style change to the host.
    SetStyle {
        /// Style target.
        target: String,
        /// Value to apply.
        value: Value,
    },
    /// Open the search surface with an empty query.
    OpenSearch,
    /// Debounced query update from a search input.
    SearchInput,
    /// Enter key on a search input.
    SearchKey,
    /// Submit on a search form or input.
    SearchSubmit,
    /// Pointer enter/leave on a carousel.
    CarouselHover {
        /// The carousel.
        carousel: CarouselHandle,
        /// Entering (`true`) or leaving.
        hovered: bool,
    },
}

/// Resolve an action target: binding-shaped targets go through the data
/// channels, everything else is literal. `None` for an unresolved binding.
pub(crate) fn resolve_target(target: &str, scope: &Scope<'_>) -> Option<String> {
    if is_binding_path(target) {
        resolve(target, scope.data, scope.context).and_then(display)
    } else {
        Some(target.to_string())
    }
}

/// URL behind a `navigate` target. Bound targets must resolve to a non-empty string.
pub(crate) fn navigate_url(target: &str, scope: &Scope<'_>) -> Option<String> {
    if is_binding_path(target) {
        resolve_str(target, scope.data, scope.context)
    } else if target.is_empty() {
        None
    } else {
        Some(target.to_string())
    }
}

/// Carousel name a slider control outside any carousel addresses.
///
/// Controls inside a `hero-*` section drive that section's carousel;
/// otherwise the declared target, defaulting to the sentinel key.
fn slider_name(target: &str, scope: &Scope<'_>) -> String {
    if let Some(section) = scope.section.filter(|s| s.starts_with(HERO_SECTION_PREFIX)) {
        return section.to_string();
    }
    match resolve_target(target, scope) {
        Some(name) if !name.is_empty() => name,
        _ => DEFAULT_CAROUSEL_KEY.to_string(),
    }
}

/// Route for a slider action rendered in `scope`.
fn slider_route(target: &str, scope: &Scope<'_>) -> SliderRoute {
    match scope.carousel {
        Some(local) => SliderRoute::Local(local.clone()),
        None => SliderRoute::Named(slider_name(target, scope)),
    }
}

/// Slide index named by a goto target.
fn goto_index(target: &str, scope: &Scope<'_>) -> Option<usize> {
    let resolved = if is_binding_path(target) {
        resolve(target, scope.data, scope.context)?.clone()
    } else {
        Value::String(target.to_string())
    };
    match resolved {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64))
            .map(|i| i as usize),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

impl Handler {
    /// Handler for a declared action, or `None` when the action cannot be wired
    /// (unknown verb, or a target binding that did not resolve).
    pub(crate) fn for_action(action: &Action, scope: &Scope<'_>) -> Option<Self> {
        Some(match action {
            Action::Navigate { target } => Self::Navigate {
                url: navigate_url(target, scope),
            },
            Action::ToggleDrawer { target } => Self::ToggleDrawer(resolve_target(target, scope)?),
            Action::ToggleAccordion { target } => {
                Self::ToggleAccordion(resolve_target(target, scope)?)
            }
            Action::ToggleTheme => Self::ToggleTheme,
            Action::Search { .. } => Self::Search,
            Action::SliderPrev { target } => Self::Slider {
                op: SliderOp::Prev,
                route: slider_route(target, scope),
            },
            Action::SliderNext { target } => Self::Slider {
                op: SliderOp::Next,
                route: slider_route(target, scope),
            },
            Action::SliderGoto { target } => Self::Slider {
                op: SliderOp::Goto(goto_index(target, scope)),
                route: slider_route("", scope),
            },
            Action::ToggleDropdown { target } => {
                Self::ToggleDropdown(resolve_target(target, scope)?)
            }
            Action::SetStyle { target, value } => Self::SetStyle {
                target: resolve_target(target, scope)?,
                value: value.clone(),
            },
            Action::Unknown { .. } => return None,
        })
    }

    /// Run the handler for `event`, then ask the host for a new render pass.
    pub(crate) fn run(&self, shared: &Shared, event: &UiEvent) {
        trace!(?event, handler = ?self, "handler_run");
        let host = shared.host.as_ref();
        match self {
            Self::Navigate { url } => {
                if shared.visibility.close_if_open(MOBILE_MENU_ID) {
                    host.toggle_drawer(MOBILE_MENU_ID);
                }
                if let Some(url) = url
                    && let Some(how) = classify_url(url)
                {
                    debug!(%url, %how, "navigate");
                    host.navigate(url, how);
                }
            }
            Self::ToggleDrawer(id) => {
                shared.visibility.toggle(id);
                host.toggle_drawer(id);
            }
            Self::ToggleAccordion(id) => {
                shared.visibility.toggle(id);
                host.toggle_accordion(id);
            }
            Self::ToggleTheme => host.toggle_theme(),
            Self::Search => {
                shared.search.cancel_pending();
                host.search(&shared.search.query());
            }
            Self::Slider { op, route } => run_slider(shared, *op, route),
            Self::ToggleDropdown(id) => host.toggle_dropdown(id),
            Self::SetStyle { target, value } => host.set_style(target, value),
            Self::OpenSearch => host.search(""),
            Self::SearchInput => {
                if let UiEvent::Input(text) = event {
                    let host = Arc::clone(&shared.host);
                    shared
                        .search
                        .set_query_debounced(text, move |query| host.search(&query));
                }
            }
            Self::SearchKey => {
                if matches!(event, UiEvent::Key(key) if key == "Enter") {
                    shared.search.commit_now(|query| host.search(query));
                }
            }
            Self::SearchSubmit => {
                shared.search.commit_now(|query| host.search(query));
            }
            Self::CarouselHover { carousel, hovered } => carousel.set_hovered(*hovered),
        }
        host.request_render();
    }
}

/// Move a carousel; fall back to the host when no instance is registered.
fn run_slider(shared: &Shared, op: SliderOp, route: &SliderRoute) {
    let (handle, name) = match route {
        SliderRoute::Local(handle) => (Some(handle.clone()), handle.id()),
        SliderRoute::Named(name) => (shared.registry.find(name), name.as_str()),
    };
    let host: &dyn Host = shared.host.as_ref();
    match (handle, op) {
        (Some(h), SliderOp::Prev) => {
            h.prev();
        }
        (Some(h), SliderOp::Next) => {
            h.next();
        }
        (Some(h), SliderOp::Goto(Some(index))) => {
            h.goto(index);
        }
        (_, SliderOp::Goto(None)) => trace!(name, "slider_goto_without_index"),
        (None, SliderOp::Prev) => host.slider_prev(name),
        (None, SliderOp::Next) => host.slider_next(name),
        (None, SliderOp::Goto(Some(index))) => host.slider_goto(index),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use schema::Map;

    use super::*;

    fn map(v: Value) -> Map {
        v.as_object().cloned().unwrap()
    }

    #[test]
    fn binding_targets_resolve_against_scope() {
        let data = map(json!({"product": {"url": "/p/1"}}));
        let ctx = map(json!({"item": {"slug": "/p/2", "pos": 2}}));
        let scope = Scope::root(&data, &ctx);
        assert_eq!(navigate_url("product.url", &scope).as_deref(), Some("/p/1"));
        assert_eq!(navigate_url("item.slug", &scope).as_deref(), Some("/p/2"));
        assert_eq!(navigate_url("item.missing", &scope), None);
        assert_eq!(navigate_url("/literal.html", &scope).as_deref(), Some("/literal.html"));
        assert_eq!(goto_index("item.pos", &scope), Some(2));
        assert_eq!(goto_index("3", &scope), Some(3));
        assert_eq!(goto_index("first", &scope), None);
    }

    #[test]
    fn slider_controls_prefer_hero_sections() {
        let empty = Map::new();
        let scope = Scope::root(&empty, &empty);
        assert_eq!(slider_name("", &scope), "swiper");
        assert_eq!(slider_name("reviews", &scope), "reviews");
        assert_eq!(slider_name("reviews", &scope.in_section("hero-2")), "hero-2");
        assert_eq!(slider_name("reviews", &scope.in_section("promo")), "reviews");
    }

    #[test]
    fn unknown_actions_are_not_wired() {
        let empty = Map::new();
        let scope = Scope::root(&empty, &empty);
        let action = Action::Unknown {
            action: "add_to_wishlist".into(),
        };
        assert!(Handler::for_action(&action, &scope).is_none());
    }
}
