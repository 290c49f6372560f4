//! The host-side handler set the engine calls into.

use std::fmt;

use schema::Value;

/// How a resolved URL should be followed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    /// A `#fragment`: scroll to the anchor on the current page.
    Anchor,
    /// Same-site path: client-side navigation.
    Client,
    /// `http://`, `https://` or protocol-relative: full page load.
    FullLoad,
}

impl fmt::Display for Navigation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Anchor => "anchor",
            Self::Client => "client",
            Self::FullLoad => "full-load",
        })
    }
}

/// Classify a resolved URL. `None` means navigation is a no-op (`""` or `"#"`).
///
/// ```
/// use storefront_engine::{Navigation, classify_url};
/// assert_eq!(classify_url("/products/5"), Some(Navigation::Client));
/// assert_eq!(classify_url("checkout"), Some(Navigation::Client));
/// assert_eq!(classify_url("https://example.com"), Some(Navigation::FullLoad));
/// assert_eq!(classify_url("//example.com"), Some(Navigation::FullLoad));
/// assert_eq!(classify_url("#reviews"), Some(Navigation::Anchor));
/// assert_eq!(classify_url("#"), None);
/// assert_eq!(classify_url(""), None);
/// ```
pub fn classify_url(url: &str) -> Option<Navigation> {
    if url.is_empty() || url == "#" {
        return None;
    }
    if url.starts_with('#') {
        return Some(Navigation::Anchor);
    }
    if url.starts_with("//") || url.contains("://") {
        return Some(Navigation::FullLoad);
    }
    Some(Navigation::Client)
}

/// True when `url` should use client-side navigation.
pub fn is_internal_url(url: &str) -> bool {
    classify_url(url) == Some(Navigation::Client)
}

/// Callbacks the engine invokes when wired events fire.
///
/// Every method has a no-op default: a host that does not implement an entry
/// turns the corresponding action into a no-op. Implementations must be
/// cheap and non-blocking; they run on whichever thread fired the event
/// (or on the runtime worker for debounced searches and autoplay).
pub trait Host: Send + Sync {
    /// Follow a resolved, non-empty URL.
    fn navigate(&self, _url: &str, _how: Navigation) {}

    /// A drawer's visibility entry was flipped.
    fn toggle_drawer(&self, _id: &str) {}

    /// Switch light/dark theme.
    fn toggle_theme(&self) {}

    /// Run a search. An empty query opens the search surface.
    fn search(&self, _query: &str) {}

    /// Previous slide of a carousel the engine could not find.
    fn slider_prev(&self, _target: &str) {}

    /// Next slide of a carousel the engine could not find.
    fn slider_next(&self, _target: &str) {}

    /// Jump to a slide of a carousel the engine could not find.
    fn slider_goto(&self, _index: usize) {}

    /// An accordion's visibility entry was flipped.
    fn toggle_accordion(&self, _id: &str) {}

    /// Open or close a dropdown.
    fn toggle_dropdown(&self, _id: &str) {}

    /// Apply a style value to a target.
    fn set_style(&self, _target: &str, _value: &Value) {}

    /// Shared state changed; the host should render the tree again.
    fn request_render(&self) {}
}

/// A host that ignores every callback.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopHost;

impl Host for NoopHost {}
