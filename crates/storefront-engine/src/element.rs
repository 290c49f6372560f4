//! The default element renderer and the icon renderer.
//!
//! Every block without a specialized kind lands here: wrapper tag, id and
//! classes, computed style, bound attributes, event wiring, and the two
//! header heuristics (search trigger, cart toggle badge).

use schema::{Action, Block, CART_COUNT_KEY, EventKind, Value};
use tracing::trace;

use crate::{
    binding::{display, format_number, resolve, resolve_str, resolve_text},
    diagnostics::DiagnosticKind,
    dispatch::{Handler, navigate_url},
    host::is_internal_url,
    icons::{self, FALLBACK_ICON},
    node::{Element, Node},
    render::RenderCx,
    scope::Scope,
    style,
};

/// Icon name fragments marking a cart button.
const CART_ICON_WORDS: &[&str] = &["cart", "shopping", "bag", "basket"];

/// Classes added to a cart toggle so the badge can overflow it.
const CART_BUTTON_CLASSES: &str = "relative overflow-visible";

/// Classes of the cart count badge.
const CART_BADGE_CLASSES: &str = "absolute -top-1 -right-1 min-w-4.5 h-4.5 px-1 flex items-center \
     justify-center bg-red-500 text-white text-[10px] font-bold rounded-full z-50";

/// Placeholder fragments marking a search input.
const SEARCH_PLACEHOLDER_WORDS: &[&str] = &["search", "find", "discover"];

/// Case-insensitive substring test on an optional string.
fn mentions(haystack: Option<&str>, needle: &str) -> bool {
    haystack.is_some_and(|s| s.to_ascii_lowercase().contains(needle))
}

/// Non-empty string field.
fn non_empty(field: Option<&String>) -> Option<String> {
    field.filter(|s| !s.is_empty()).cloned()
}

/// Bound value as text, falling back to the static field.
fn bound_or_static(
    bind: Option<&String>,
    fallback: Option<&String>,
    scope: &Scope<'_>,
) -> Option<String> {
    bind.and_then(|path| resolve_text(path, scope.data, scope.context))
        .or_else(|| non_empty(fallback))
}

/// Tag, id, classes and style derived from a block's wrapper and presentation fields.
///
/// Classes are the wrapper's, then `class`, then the resolved `bind_class`.
/// The id is the wrapper's `#id`, else `id`; a resolving `bind_id` replaces it.
pub(crate) fn shell(cx: &dyn RenderCx, block: &Block, scope: &Scope<'_>) -> Element {
    let parsed = cx
        .shared()
        .wrappers
        .get_or_parse(block.wrapper.as_deref().unwrap_or("div"));
    let mut el = Element::new(parsed.tag.clone());
    el.id = parsed.id.clone().or_else(|| non_empty(block.id.as_ref()));
    if let Some(path) = &block.bind_id
        && let Some(id) = resolve(path, scope.data, scope.context).and_then(display)
    {
        el.id = Some(id);
    }
    for class in &parsed.classes {
        el.add_classes(class);
    }
    if let Some(class) = &block.class {
        el.add_classes(class);
    }
    if let Some(path) = &block.bind_class
        && let Some(class) = resolve_text(path, scope.data, scope.context)
    {
        el.add_classes(&class);
    }
    el.style = style::compute(block, scope.data, scope.context);
    el
}

/// Render an icon block. Unknown names render an empty placeholder and a diagnostic.
pub(crate) fn render_icon(cx: &mut dyn RenderCx, block: &Block, scope: &Scope<'_>) -> Node {
    let name = bound_or_static(block.bind_icon.as_ref(), block.icon.as_ref(), scope)
        .unwrap_or_else(|| FALLBACK_ICON.to_string());
    let style = style::compute(block, scope.data, scope.context);
    let (el, known) = icons::render(&name, block.class.as_deref(), style, block.icon_size);
    if !known {
        cx.diag(DiagnosticKind::UnknownIcon, format!("unknown icon `{name}`"));
    }
    el.into()
}

/// Render a plain block. Returns `None` only for an image without a source.
pub(crate) fn render(cx: &mut dyn RenderCx, block: &Block, scope: Scope<'_>) -> Option<Node> {
    let mut el = shell(cx, block, &scope);
    apply_visibility(cx, block, &mut el);

    let content = match &block.bind_content {
        Some(path) => resolve(path, scope.data, scope.context)
            .and_then(display)
            .or_else(|| block.content.clone()),
        None => block.content.clone(),
    };

    let mut search_input = false;
    match el.tag.as_str() {
        "img" => {
            let src = bound_or_static(block.bind_src.as_ref(), block.src.as_ref(), &scope)?;
            let alt = bound_or_static(block.bind_alt.as_ref(), block.alt.as_ref(), &scope);
            el.set_attr("src", src);
            el.set_attr("alt", alt.unwrap_or_default());
            if is_priority_image(block, &el) {
                el.set_attr("loading", "eager");
                el.set_attr("fetchpriority", "high");
            } else {
                el.set_attr("loading", "lazy");
            }
        }
        "a" => {
            let href = link_href(block, &scope);
            el.set_attr("href", href);
        }
        "input" => search_input = apply_input(block, &scope, &mut el),
        _ => {}
    }

    apply_aria_label(block, &mut el);
    wire_events(cx, block, &scope, &mut el);
    if search_input {
        let query = cx.shared().search.query();
        el.set_attr("value", query);
        let on_input = cx.wire(Handler::SearchInput);
        el.on(&EventKind::Input, on_input);
        let on_key = cx.wire(Handler::SearchKey);
        el.on(&EventKind::KeyDown, on_key);
    }
    if block.click_event().is_some() {
        el.style.set("cursor", "pointer");
    }

    if !el.is_void() {
        let section = (el.tag == "section").then(|| el.id.clone()).flatten();
        let child_scope = match section.as_deref() {
            Some(id) => scope.in_section(id),
            None => scope,
        };
        if block.children.is_empty() {
            if let Some(text) = content {
                el.push(Node::text(text));
            }
        } else {
            el.children = cx.render_children(&block.children, child_scope);
        }
    }
    if el.is_void() {
        return Some(el.into());
    }

    if el.tag == "a" {
        if let Some(href) = el.attr("href").filter(|h| is_internal_url(h)).map(str::to_string) {
            el.set_attr("data-link", "client");
            let handler = cx.wire(Handler::Navigate { url: Some(href) });
            el.on(&EventKind::Click, handler);
        }
        return Some(el.into());
    }

    // A navigate click links out even when the element also reads as a search trigger.
    if let Some(url) = navigate_wrapper_url(block, &scope) {
        return Some(wrap_in_link(cx, el, url));
    }

    if is_search_trigger(block, el.id.as_deref()) {
        trace!(id = ?el.id, "search_trigger");
        let handler = cx.wire(Handler::OpenSearch);
        el.on(&EventKind::Click, handler);
        return Some(el.into());
    }

    if is_cart_toggle(block) {
        el.add_classes(CART_BUTTON_CLASSES);
        el.style.set("overflow", "visible");
        if let Some(text) = cart_badge_text(scope.data.get(CART_COUNT_KEY)) {
            el.push(
                Element::new("span")
                    .with_classes(CART_BADGE_CLASSES)
                    .with_child(Node::text(text))
                    .into(),
            );
        }
    }
    Some(el.into())
}

/// Hide a block with declared state while its visibility entry is false.
fn apply_visibility(cx: &dyn RenderCx, block: &Block, el: &mut Element) {
    if block.state.is_none() {
        return;
    }
    let id = el.id.clone().or_else(|| block.declared_id());
    let store = &cx.shared().visibility;
    let visible = match (id.as_deref(), block.declared_visibility()) {
        (Some(id), declared) => match store.entry(id) {
            Some(visible) => visible,
            None => {
                let visible = declared.unwrap_or(true);
                if declared.is_some() {
                    store.declare(id, visible);
                }
                visible
            }
        },
        (None, declared) => declared.unwrap_or(true),
    };
    if !visible {
        el.style.set("display", "none");
    }
}

/// Hero and banner images load eagerly.
fn is_priority_image(block: &Block, el: &Element) -> bool {
    let classes = el.class_string();
    block.priority
        || block.data.get("priority") == Some(&Value::Bool(true))
        || ["hero", "banner", "swiper-slide"]
            .iter()
            .any(|w| classes.contains(w))
        || mentions(block.id.as_deref(), "hero")
        || mentions(block.id.as_deref(), "banner")
}

/// Link target: `bind_href`, `bind_url`, `href`, `url`, then a `navigate` click target; else `#`.
fn link_href(block: &Block, scope: &Scope<'_>) -> String {
    let bound = |path: &Option<String>| {
        path.as_deref()
            .and_then(|p| resolve_str(p, scope.data, scope.context))
    };
    bound(&block.bind_href)
        .or_else(|| bound(&block.bind_url))
        .or_else(|| non_empty(block.href.as_ref()))
        .or_else(|| non_empty(block.url.as_ref()))
        .or_else(|| match block.click_action() {
            Some(Action::Navigate { target }) => navigate_url(target, scope),
            _ => None,
        })
        .unwrap_or_else(|| "#".to_string())
}

/// Internal URL a non-link element with a `navigate` click should be wrapped in.
fn navigate_wrapper_url(block: &Block, scope: &Scope<'_>) -> Option<String> {
    let Some(Action::Navigate { target }) = block.click_action() else {
        return None;
    };
    if target.is_empty() {
        return None;
    }
    navigate_url(target, scope)
        .or_else(|| {
            block
                .bind_url
                .as_deref()
                .and_then(|p| resolve_str(p, scope.data, scope.context))
        })
        .or_else(|| non_empty(block.url.as_ref()))
        .filter(|url| is_internal_url(url))
}

/// Wrap `inner` in a client-side link. The link carries the navigation; the
/// inner element keeps its presentation and children but no handlers.
fn wrap_in_link(cx: &mut dyn RenderCx, mut inner: Element, url: String) -> Node {
    inner.handlers.clear();
    let mut link = Element::new("a")
        .with_attr("href", url.clone())
        .with_attr("data-link", "client");
    let handler = cx.wire(Handler::Navigate { url: Some(url) });
    link.on(&EventKind::Click, handler);
    link.push(inner.into());
    link.into()
}

/// Placeholder and type of an input. Returns whether it is a search input.
fn apply_input(block: &Block, scope: &Scope<'_>, el: &mut Element) -> bool {
    let placeholder = bound_or_static(
        block.bind_placeholder.as_ref(),
        block.placeholder.as_ref(),
        scope,
    )
    .unwrap_or_default();
    let kind = match block.type_name.as_deref() {
        Some("text_input") | None => "text",
        Some(other) => other,
    };
    el.set_attr("placeholder", placeholder.clone());
    el.set_attr("type", kind);

    let submits_search = block
        .events
        .get("on_submit")
        .is_some_and(|e| matches!(e.action, Action::Search { .. }));
    let lower = placeholder.to_ascii_lowercase();
    submits_search
        || SEARCH_PLACEHOLDER_WORDS.iter().any(|w| lower.contains(w))
        || mentions(block.id.as_deref(), "search")
        || mentions(block.class.as_deref(), "search")
        || mentions(block.bind_placeholder.as_deref(), "search")
}

/// Label for a button without text, from its class names.
fn auto_aria_label(classes: &str) -> &'static str {
    let has = |words: &[&str]| words.iter().any(|w| classes.contains(w));
    if has(&["left", "prev"]) {
        "Previous"
    } else if has(&["right", "next"]) {
        "Next"
    } else if has(&["close", "dismiss"]) {
        "Close"
    } else if has(&["menu", "hamburger"]) {
        "Menu"
    } else if has(&["search"]) {
        "Search"
    } else if has(&["cart"]) {
        "Cart"
    } else if has(&["slider", "swiper"]) {
        "Slide navigation"
    } else {
        "Button"
    }
}

/// Explicit `aria_label`, or a derived one for text-less buttons.
fn apply_aria_label(block: &Block, el: &mut Element) {
    if let Some(label) = non_empty(block.aria_label.as_ref()) {
        el.set_attr("aria-label", label);
    } else if el.tag == "button" && non_empty(block.content.as_ref()).is_none() {
        let label = auto_aria_label(&el.class_string());
        el.set_attr("aria-label", label);
    }
}

/// Wire declared events. Later declarations of the same DOM event win.
fn wire_events(cx: &mut dyn RenderCx, block: &Block, scope: &Scope<'_>, el: &mut Element) {
    for (name, descriptor) in &block.events {
        let kind = EventKind::from_name(name);
        if let EventKind::Other(other) = &kind {
            trace!(event = %other, "event_not_wired");
            continue;
        }
        let handler = match (&kind, &descriptor.action) {
            (_, Action::Unknown { action }) => {
                cx.diag(
                    DiagnosticKind::UnknownAction,
                    format!("unknown action `{action}` on event `{name}`"),
                );
                continue;
            }
            (EventKind::Submit, Action::Search { .. }) => Handler::SearchSubmit,
            (_, action) => match Handler::for_action(action, scope) {
                Some(handler) => handler,
                None => {
                    trace!(%action, "action_target_unresolved");
                    continue;
                }
            },
        };
        let id = cx.wire(handler);
        el.on(&kind, id);
    }
}

/// Whether `name` names the search icon.
fn is_search_icon(name: Option<&str>) -> bool {
    name.is_some_and(|n| n.eq_ignore_ascii_case("search"))
}

/// A clickable, placeholder-less element identified as a search trigger by
/// its icon, its id or class, or a search icon anywhere below it.
fn is_search_trigger(block: &Block, element_id: Option<&str>) -> bool {
    let identified = is_search_icon(block.icon.as_deref())
        || mentions(block.id.as_deref(), "search")
        || mentions(block.class.as_deref(), "search")
        || mentions(element_id, "search")
        || block
            .walk()
            .skip(1)
            .any(|b| is_search_icon(b.icon.as_deref()));
    identified
        && block.click_event().is_some()
        && non_empty(block.placeholder.as_ref()).is_none()
}

/// Whether an icon name looks like a cart.
fn is_cart_icon(name: Option<&str>) -> bool {
    name.is_some_and(|n| {
        let lower = n.to_ascii_lowercase();
        CART_ICON_WORDS.iter().any(|w| lower.contains(w))
    })
}

/// Carries a cart icon (directly or through a descendant icon block) and
/// toggles a drawer whose id names a cart.
fn is_cart_toggle(block: &Block) -> bool {
    let has_icon = is_cart_icon(block.icon.as_deref())
        || block
            .walk()
            .skip(1)
            .any(|b| b.is_icon() && is_cart_icon(b.icon.as_deref()));
    let toggles_cart = matches!(
        block.click_action(),
        Some(Action::ToggleDrawer { target }) if target.to_ascii_lowercase().contains("cart")
    );
    has_icon && toggles_cart
}

/// Badge text for a cart count: none for missing or non-positive counts,
/// the count itself up to 99, `99+` above.
pub(crate) fn cart_badge_text(count: Option<&Value>) -> Option<String> {
    let n = match count? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    if n.is_nan() || n <= 0.0 {
        None
    } else if n > 99.0 {
        Some("99+".to_string())
    } else {
        Some(format_number(n))
    }
}
