//! Parsing of `wrapper` strings such as `section#hero.container.mx-auto`.

use once_cell::sync::Lazy;
use regex::Regex;

/// Leading element tag.
static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^([a-zA-Z][a-zA-Z0-9]*)").unwrap());
/// First `#id` segment.
static ID_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"#([^.#]+)").unwrap());
/// Every `.class` segment.
static CLASS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\.([^.#]+)").unwrap());

/// Element tag, id and class list encoded by a block's `wrapper`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedWrapper {
    /// Lowercased element tag; `div` when the wrapper names none.
    pub tag: String,
    /// Id from the first `#id` segment.
    pub id: Option<String>,
    /// Classes from `.class` segments, in order.
    pub classes: Vec<String>,
}

impl Default for ParsedWrapper {
    fn default() -> Self {
        Self {
            tag: "div".to_string(),
            id: None,
            classes: Vec::new(),
        }
    }
}

/// Parse a wrapper string.
///
/// ```
/// let w = schema::parse_wrapper("section#hero.container");
/// assert_eq!(w.tag, "section");
/// assert_eq!(w.id.as_deref(), Some("hero"));
/// assert_eq!(w.classes, vec!["container".to_string()]);
/// ```
pub fn parse_wrapper(wrapper: &str) -> ParsedWrapper {
    let wrapper = wrapper.trim();
    if wrapper.is_empty() {
        return ParsedWrapper::default();
    }

    let tag = TAG_RE
        .captures(wrapper)
        .map(|c| c[1].to_ascii_lowercase())
        .unwrap_or_else(|| "div".to_string());
    let id = ID_RE.captures(wrapper).map(|c| c[1].to_string());
    let classes = CLASS_RE
        .captures_iter(wrapper)
        .map(|c| c[1].to_string())
        .collect();

    ParsedWrapper { tag, id, classes }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_tag() {
        let w = parse_wrapper("NAV");
        assert_eq!(w.tag, "nav");
        assert!(w.id.is_none());
        assert!(w.classes.is_empty());
    }

    #[test]
    fn id_with_dashes_and_classes() {
        let w = parse_wrapper("nav#navbar-1-123456.sticky.top-0");
        assert_eq!(w.tag, "nav");
        assert_eq!(w.id.as_deref(), Some("navbar-1-123456"));
        assert_eq!(w.classes, vec!["sticky", "top-0"]);
    }

    #[test]
    fn missing_tag_defaults_to_div() {
        let w = parse_wrapper("#drawer.fixed");
        assert_eq!(w.tag, "div");
        assert_eq!(w.id.as_deref(), Some("drawer"));
        assert_eq!(w.classes, vec!["fixed"]);
        assert_eq!(parse_wrapper(""), ParsedWrapper::default());
    }
}
