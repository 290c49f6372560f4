//! Icon name lookup and icon rendering.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::node::{Element, Style};

/// Default pixel size of an icon.
pub const DEFAULT_ICON_SIZE: f64 = 24.0;

/// Icon used when a block names none.
pub const FALLBACK_ICON: &str = "help";

/// Canonical name to glyph, grouped by purpose. Several names share a glyph.
const ICONS: &[(&str, &str)] = &[
    // navigation
    ("search", "search"),
    ("menu", "menu"),
    ("close", "x"),
    ("x", "x"),
    ("chevron_down", "chevron-down"),
    ("chevron_up", "chevron-up"),
    ("chevron_left", "chevron-left"),
    ("chevron_right", "chevron-right"),
    ("arrow_right", "arrow-right"),
    ("arrow_left", "arrow-left"),
    ("home", "home"),
    // commerce
    ("shopping_cart", "shopping-cart"),
    ("cart", "shopping-cart"),
    ("shopping_bag", "shopping-bag"),
    ("bag", "shopping-bag"),
    ("heart", "heart"),
    ("wishlist", "heart"),
    ("tag", "tag"),
    ("percent", "percent"),
    ("gift", "gift"),
    ("truck", "truck"),
    ("delivery", "truck"),
    ("credit_card", "credit-card"),
    ("payment", "credit-card"),
    ("shield", "shield"),
    ("secure", "shield"),
    // account
    ("user", "user"),
    ("account", "user"),
    ("profile", "user"),
    // theme
    ("moon", "moon"),
    ("dark_mode", "moon"),
    ("sun", "sun"),
    ("light_mode", "sun"),
    // contact
    ("phone", "phone"),
    ("call", "phone"),
    ("mail", "mail"),
    ("email", "mail"),
    ("map_pin", "map-pin"),
    ("location", "map-pin"),
    ("globe", "globe"),
    ("language", "globe"),
    // social
    ("facebook", "facebook"),
    ("instagram", "instagram"),
    ("twitter", "twitter"),
    ("youtube", "youtube"),
    ("linkedin", "linkedin"),
    ("github", "github"),
    // media
    ("play", "play"),
    ("pause", "pause"),
    ("volume", "volume-2"),
    ("volume_mute", "volume-x"),
    ("eye", "eye"),
    ("eye_off", "eye-off"),
    // actions
    ("check", "check"),
    ("checkmark", "check"),
    ("plus", "plus"),
    ("add", "plus"),
    ("minus", "minus"),
    ("remove", "minus"),
    ("edit", "edit"),
    ("pencil", "edit"),
    ("trash", "trash-2"),
    ("delete", "trash-2"),
    ("copy", "copy"),
    ("share", "share-2"),
    ("share2", "share-2"),
    ("send", "send"),
    ("download", "download"),
    ("upload", "upload"),
    ("refresh", "refresh-cw"),
    ("reload", "refresh-cw"),
    ("settings", "settings"),
    ("filter", "filter"),
    // rating
    ("star", "star"),
    ("rating", "star"),
    // time
    ("clock", "clock"),
    ("time", "clock"),
    ("calendar", "calendar"),
    ("date", "calendar"),
    // status
    ("alert", "alert-circle"),
    ("warning", "alert-circle"),
    ("info", "info"),
    ("help", "help-circle"),
    ("question", "help-circle"),
    // layout
    ("grid", "grid"),
    ("grid_view", "layout-grid"),
    ("list", "list"),
    ("list_view", "list"),
    // trust badges
    ("rotate_ccw", "rotate-ccw"),
    ("return", "rotate-ccw"),
    ("refund", "rotate-ccw"),
    ("money_back", "rotate-ccw"),
    ("messages_square", "messages-square"),
    ("chat", "messages-square"),
    ("support", "messages-square"),
    ("customer_support", "messages-square"),
    ("badge_check", "badge-check"),
    ("verified", "badge-check"),
    ("quality", "badge-check"),
    ("shield_check", "shield-check"),
    ("warranty", "shield-check"),
    ("protection", "shield-check"),
    ("headphones", "headphones"),
    ("customer_service", "headphones"),
];

/// Name to glyph index.
static INDEX: Lazy<HashMap<&'static str, &'static str>> =
    Lazy::new(|| ICONS.iter().copied().collect());

/// Lowercase, with `-` replaced by `_`.
pub fn normalize_icon_name(name: &str) -> String {
    name.trim().to_lowercase().replace('-', "_")
}

/// Glyph for an icon name, after normalization.
pub fn lookup(name: &str) -> Option<&'static str> {
    INDEX.get(normalize_icon_name(name).as_str()).copied()
}

/// Whether `name` resolves to a glyph.
pub fn has_icon(name: &str) -> bool {
    lookup(name).is_some()
}

/// Every canonical icon name, in table order.
pub fn available_icons() -> Vec<&'static str> {
    ICONS.iter().map(|(name, _)| *name).collect()
}

/// Render an icon. Unknown names render an empty `span` with the same class and style.
///
/// Returns the element and whether the name was known.
pub(crate) fn render(name: &str, class: Option<&str>, style: Style, size: Option<f64>) -> (Element, bool) {
    let Some(glyph) = lookup(name) else {
        let mut span = Element::new("span");
        if let Some(class) = class {
            span.add_classes(class);
        }
        span.style = style;
        return (span, false);
    };

    let size = size.unwrap_or(DEFAULT_ICON_SIZE).to_string();
    let mut svg = Element::new("svg");
    if let Some(class) = class {
        svg.add_classes(class);
    }
    svg.style = style;
    svg.set_attr("data-icon", glyph);
    svg.set_attr("width", size.clone());
    svg.set_attr("height", size);
    svg.set_attr("viewBox", "0 0 24 24");
    svg.set_attr("fill", "none");
    svg.set_attr("stroke", "currentColor");
    svg.set_attr("stroke-width", "2");
    svg.set_attr("aria-hidden", "true");
    (svg, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalization() {
        assert_eq!(lookup("Shopping-Cart"), Some("shopping-cart"));
        assert_eq!(lookup("chevron-right"), Some("chevron-right"));
        assert!(has_icon("CART"));
        assert!(!has_icon("unicorn"));
    }

    #[test]
    fn every_name_is_canonical() {
        for name in available_icons() {
            assert_eq!(normalize_icon_name(name), name);
            assert!(has_icon(name));
        }
    }

    #[test]
    fn unknown_icon_renders_span() {
        let (el, known) = render("unicorn", Some("w-4"), Style::new(), None);
        assert!(!known);
        assert_eq!(el.tag, "span");
        assert!(el.has_class("w-4"));
        let (el, known) = render("search", None, Style::new(), Some(18.0));
        assert!(known);
        assert_eq!(el.attr("width"), Some("18"));
    }
}
