//! Storefront Engine
//!
//! Renders a declarative block tree against render data into a node tree:
//! - resolves bindings, evaluates visibility conditions and merges block data
//! - expands repeaters and mounts carousels (with autoplay, arrows, pagination)
//! - wires event actions to handlers that mutate tree state and call the [`Host`]
//! - keeps tree-scoped UI state: drawer visibility, the debounced search query,
//!   and a registry addressing carousels by name
//!
//! The primary type is [`RenderTree`]: build it from blocks and a host, call
//! [`RenderTree::render`] with the page data, and feed UI events back through
//! [`RenderTree::fire`] using the handler ids found on rendered elements.
//!
//! Rendering never fails. Degraded input (unknown icons, empty collections,
//! unknown actions or operators) renders a fallback and is reported as a
//! [`Diagnostic`] on the [`RenderOutput`].

mod binding;
mod carousel;
mod condition;
mod control;
mod diagnostics;
mod dispatch;
mod element;
mod error;
mod host;
mod icons;
mod instances;
mod marquee;
mod node;
mod progress;
mod registry;
mod render;
mod repeater;
mod scope;
mod search;
mod slider;
mod style;
mod ticker;
mod visibility;
mod wrapper_cache;

pub use binding::{display, format_number, is_truthy, normalize_path, resolve, resolve_text};
pub use carousel::CarouselHandle;
pub use control::{
    CarouselControl, global_control, install_global_control, uninstall_global_control,
};
pub use diagnostics::{Diagnostic, DiagnosticKind};
pub use dispatch::UiEvent;
pub use error::{Error, Result};
pub use host::{Host, Navigation, NoopHost, classify_url, is_internal_url};
pub use icons::{
    DEFAULT_ICON_SIZE, available_icons, has_icon, lookup as icon_svg, normalize_icon_name,
};
pub use node::{Element, HandlerId, Node, Style, Wired};
pub use registry::{CarouselRegistry, DEFAULT_CAROUSEL_KEY, PAIRING_SEPARATOR};
pub use render::{RenderOutput, RenderTree};
pub use scope::DRAWER_KEY;
pub use search::SearchState;
pub use style::{css_property, css_value, evaluate_expression};
pub use visibility::{MOBILE_MENU_ID, VisibilityStore};
