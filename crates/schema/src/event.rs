//! Event wiring: which UI events a block listens to and what each one does.

use std::fmt;

use serde::Deserialize;

use crate::Value;

/// UI events a block may declare in its `events` map.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EventKind {
    /// `click` / `on_click`.
    Click,
    /// `on_hover` / `on_mouse_enter`.
    MouseEnter,
    /// `on_mouse_leave`.
    MouseLeave,
    /// `on_submit`.
    Submit,
    /// Text entry on an input (produced by the engine for search inputs).
    Input,
    /// Key press on an input (produced by the engine for search inputs).
    KeyDown,
    /// Any other declared name; never wired.
    Other(String),
}

impl EventKind {
    /// Map a declared event name onto an event kind.
    pub fn from_name(name: &str) -> Self {
        match name {
            "click" | "on_click" => Self::Click,
            "on_hover" | "on_mouse_enter" => Self::MouseEnter,
            "on_mouse_leave" => Self::MouseLeave,
            "on_submit" => Self::Submit,
            "on_input" | "on_change" => Self::Input,
            "on_key_down" => Self::KeyDown,
            other => Self::Other(other.to_string()),
        }
    }

    /// DOM event name used when serializing handler attributes.
    pub fn dom_name(&self) -> &str {
        match self {
            Self::Click => "click",
            Self::MouseEnter => "mouseenter",
            Self::MouseLeave => "mouseleave",
            Self::Submit => "submit",
            Self::Input => "input",
            Self::KeyDown => "keydown",
            Self::Other(name) => name,
        }
    }
}

/// One declared event: `{"action": "toggle_drawer", "target": "cart_drawer"}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "RawEvent")]
pub struct EventDescriptor {
    /// The action to perform, with its unresolved target.
    pub action: Action,
}

/// Wire shape of an event descriptor.
#[derive(Debug, Clone, Default, Deserialize)]
struct RawEvent {
    /// Verb name.
    #[serde(default)]
    action: String,
    /// Target id, URL or binding path.
    #[serde(default)]
    target: Option<Value>,
    /// Extra payload (`set_style`).
    #[serde(default)]
    value: Value,
}

/// The fixed verb set understood by the action dispatcher.
///
/// Targets are kept as written; the engine resolves binding-shaped targets
/// against the render data (see [`is_binding_path`]).
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Go to a URL (literal or bound).
    Navigate {
        /// URL or binding path.
        target: String,
    },
    /// Flip a drawer's visibility entry.
    ToggleDrawer {
        /// Drawer id.
        target: String,
    },
    /// Flip an accordion's visibility entry.
    ToggleAccordion {
        /// Accordion id.
        target: String,
    },
    /// Switch between light and dark theme.
    ToggleTheme,
    /// Run a search with the current committed query.
    Search {
        /// Declared target (unused by the dispatcher; kept for hosts).
        target: String,
    },
    /// Previous slide of the addressed carousel.
    SliderPrev {
        /// Carousel name.
        target: String,
    },
    /// Next slide of the addressed carousel.
    SliderNext {
        /// Carousel name.
        target: String,
    },
    /// Jump to a slide index.
    SliderGoto {
        /// Slide index, literal or bound.
        target: String,
    },
    /// Open or close a dropdown.
    ToggleDropdown {
        /// Dropdown id.
        target: String,
    },
    /// Ask the host to apply a style value to a target.
    SetStyle {
        /// Style target.
        target: String,
        /// Value to apply.
        value: Value,
    },
    /// A verb outside the fixed set. Ignored.
    Unknown {
        /// The declared verb.
        action: String,
    },
}

impl From<RawEvent> for EventDescriptor {
    fn from(raw: RawEvent) -> Self {
        let target = match raw.target {
            Some(Value::String(s)) => s,
            Some(Value::Null) | None => String::new(),
            Some(Value::Number(n)) => n.to_string(),
            Some(other) => other.to_string(),
        };
        let action = match raw.action.as_str() {
            "navigate" => Action::Navigate { target },
            "toggle_drawer" => Action::ToggleDrawer { target },
            "toggle_accordion" => Action::ToggleAccordion { target },
            "toggle_theme" => Action::ToggleTheme,
            "search" => Action::Search { target },
            "slider_prev" => Action::SliderPrev { target },
            "slider_next" => Action::SliderNext { target },
            "slider_goto" => Action::SliderGoto { target },
            "toggle_dropdown" => Action::ToggleDropdown { target },
            "set_style" => Action::SetStyle {
                target,
                value: raw.value,
            },
            _ => Action::Unknown { action: raw.action },
        };
        Self { action }
    }
}

impl Action {
    /// The verb as written in block JSON.
    pub fn name(&self) -> &str {
        match self {
            Self::Navigate { .. } => "navigate",
            Self::ToggleDrawer { .. } => "toggle_drawer",
            Self::ToggleAccordion { .. } => "toggle_accordion",
            Self::ToggleTheme => "toggle_theme",
            Self::Search { .. } => "search",
            Self::SliderPrev { .. } => "slider_prev",
            Self::SliderNext { .. } => "slider_next",
            Self::SliderGoto { .. } => "slider_goto",
            Self::ToggleDropdown { .. } => "toggle_dropdown",
            Self::SetStyle { .. } => "set_style",
            Self::Unknown { action } => action,
        }
    }

    /// The unresolved target, empty for verbs without one.
    pub fn target(&self) -> &str {
        match self {
            Self::Navigate { target }
            | Self::ToggleDrawer { target }
            | Self::ToggleAccordion { target }
            | Self::Search { target }
            | Self::SliderPrev { target }
            | Self::SliderNext { target }
            | Self::SliderGoto { target }
            | Self::ToggleDropdown { target }
            | Self::SetStyle { target, .. } => target,
            Self::ToggleTheme | Self::Unknown { .. } => "",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let target = self.target();
        if target.is_empty() {
            f.write_str(self.name())
        } else {
            write!(f, "{}({})", self.name(), target)
        }
    }
}

/// True when `target` should be resolved as a dotted binding path rather than used literally.
///
/// A binding contains `.` but no `/` and no protocol separator, so
/// `item.url` binds while `/products/5.html` and `https://shop.example` stay literal.
pub fn is_binding_path(target: &str) -> bool {
    target.contains('.') && !target.contains('/') && !target.contains("://")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binding_shaped_targets() {
        assert!(is_binding_path("item.url"));
        assert!(is_binding_path("product.slug"));
        assert!(!is_binding_path("checkout"));
        assert!(!is_binding_path("/products/5.html"));
        assert!(!is_binding_path("https://example.com"));
        assert!(!is_binding_path("//cdn.example.com"));
    }

    #[test]
    fn event_names_map_to_kinds() {
        assert_eq!(EventKind::from_name("on_click"), EventKind::Click);
        assert_eq!(EventKind::from_name("click"), EventKind::Click);
        assert_eq!(EventKind::from_name("on_hover"), EventKind::MouseEnter);
        assert_eq!(
            EventKind::from_name("on_drag"),
            EventKind::Other("on_drag".into())
        );
    }

    #[test]
    fn numeric_goto_target_is_stringified() {
        let ev: EventDescriptor =
            serde_json::from_str(r#"{"action": "slider_goto", "target": 2}"#).unwrap();
        assert_eq!(
            ev.action,
            Action::SliderGoto {
                target: "2".into()
            }
        );
    }
}
