mod common;

use common::{RecordingHost, by_id, data, text, tree};
use schema::{EngineSettings, Map};
use serde_json::json;
use storefront_engine::{DiagnosticKind, RenderTree, UiEvent};

#[test]
fn false_condition_prunes_subtree_state() {
    let host = RecordingHost::new();
    let t = tree(
        json!({
            "wrapper": "main",
            "blocks": [{
                "wrapper": "div#promo-area",
                "condition": {"field": "show_promo", "op": "equals", "value": true},
                "blocks": [
                    {"wrapper": "aside#promo-drawer", "state": {"visible": false}},
                    {"type": "swiper", "id": "promo", "blocks": [{"content": "a"}, {"content": "b"}]}
                ]
            }]
        }),
        &host,
    );
    let out = t.render(&data(json!({"show_promo": false})));
    assert_eq!(out.to_html(), "<main></main>");
    assert_eq!(t.visibility().entry("promo-drawer"), None);
    assert!(t.registry().is_empty());
    assert_eq!(t.handler_count(), 0);
}

#[test]
fn local_data_overrides_except_cart_aggregates() {
    let host = RecordingHost::new();
    let t = tree(
        json!({
            "wrapper": "div",
            "data": {"cart_count": 3, "title": "Parent"},
            "blocks": [{
                "wrapper": "div",
                "data": {"cart_count": 0, "title": "Child"},
                "blocks": [
                    {"wrapper": "span#count", "bind_content": "cart_count"},
                    {"wrapper": "span#title", "bind_content": "title"}
                ]
            }]
        }),
        &host,
    );
    let out = t.render(&Map::new());
    assert_eq!(text(by_id(&out, "count")), "3");
    assert_eq!(text(by_id(&out, "title")), "Child");
}

#[test]
fn repeater_renders_one_keyed_instance_per_element() {
    let host = RecordingHost::new();
    let t = tree(
        json!({
            "wrapper": "ul#list",
            "blocks": [{
                "type": "repeater",
                "source": "products",
                "iterator": "product",
                "index": "i",
                "template": {
                    "wrapper": "li.item",
                    "bind_content": "product.name",
                    "bind_id": "product.slug"
                }
            }]
        }),
        &host,
    );
    let out = t.render(&data(json!({
        "products": [
            {"id": 1, "name": "Shirt", "slug": "shirt"},
            {"id": 2, "name": "Shoes", "slug": "shoes"},
            {"id": 3, "name": "Hat", "slug": "hat"}
        ]
    })));
    let items = out.find_by_class("item");
    assert_eq!(items.len(), 3);
    let keys: Vec<_> = items.iter().map(|el| el.key.clone().unwrap()).collect();
    assert_eq!(keys, ["product-1", "product-2", "product-3"]);
    assert_eq!(text(by_id(&out, "shoes")), "Shoes");
    assert!(out.diagnostics.is_empty());

    let out = t.render(&data(json!({"products": []})));
    assert!(out.find_by_class("item").is_empty());
    assert_eq!(text(by_id(&out, "list")), "");
    assert_eq!(out.diagnostics.len(), 1);
    assert_eq!(out.diagnostics[0].kind, DiagnosticKind::EmptySource);
}

#[test]
fn repeater_without_template_is_diagnosed() {
    let host = RecordingHost::new();
    let t = tree(
        json!({"wrapper": "div", "blocks": [{"type": "repeater", "source": "items"}]}),
        &host,
    );
    let out = t.render(&data(json!({"items": [1, 2]})));
    assert_eq!(out.to_html(), "<div></div>");
    assert_eq!(out.diagnostics[0].kind, DiagnosticKind::MissingTemplate);
}

fn cart_button() -> serde_json::Value {
    json!({
        "wrapper": "button#cart-toggle",
        "events": {"on_click": {"action": "toggle_drawer", "target": "cart_drawer"}},
        "blocks": [{"type": "icon", "icon": "shopping-cart"}]
    })
}

#[test]
fn cart_badge_thresholds() {
    let host = RecordingHost::new();
    let t = tree(cart_button(), &host);

    let out = t.render(&data(json!({"cart_count": 0})));
    assert!(out.find_by_class("bg-red-500").is_empty());

    let out = t.render(&data(json!({"cart_count": 42})));
    let badge = out.find_by_class("bg-red-500");
    assert_eq!(badge.len(), 1);
    assert_eq!(text(badge[0]), "42");
    assert!(by_id(&out, "cart-toggle").has_class("relative"));

    let out = t.render(&data(json!({"cart_count": 150})));
    assert_eq!(text(out.find_by_class("bg-red-500")[0]), "99+");
}

#[test]
fn images_without_source_are_omitted() {
    let host = RecordingHost::new();
    let t = tree(
        json!({
            "wrapper": "div",
            "blocks": [
                {"wrapper": "img.hero-image", "bind_src": "banner.image", "alt": "Banner"},
                {"wrapper": "img.thumb", "src": "/t.png"}
            ]
        }),
        &host,
    );
    let out = t.render(&data(json!({"banner": {"image": ""}})));
    assert_eq!(out.elements().iter().filter(|e| e.tag == "img").count(), 1);
    let thumb = out.find_by_class("thumb")[0];
    assert_eq!(thumb.attr("loading"), Some("lazy"));
    assert_eq!(thumb.attr("alt"), Some(""));

    let out = t.render(&data(json!({"banner": {"image": "/hero.jpg"}})));
    let hero = out.find_by_class("hero-image")[0];
    assert_eq!(hero.attr("src"), Some("/hero.jpg"));
    assert_eq!(hero.attr("alt"), Some("Banner"));
    assert_eq!(hero.attr("loading"), Some("eager"));
    assert_eq!(hero.attr("fetchpriority"), Some("high"));
}

#[test]
fn links_classify_their_targets() {
    let host = RecordingHost::new();
    let t = tree(
        json!({
            "wrapper": "nav",
            "blocks": [
                {"wrapper": "a#internal", "href": "/products/5", "content": "Product"},
                {"wrapper": "a#external", "href": "https://example.com", "content": "Out"},
                {"wrapper": "a#unbound", "bind_href": "product.url", "content": "?"}
            ]
        }),
        &host,
    );
    let out = t.render(&Map::new());
    let internal = by_id(&out, "internal");
    assert_eq!(internal.attr("data-link"), Some("client"));
    assert!(internal.handler("click").is_some());

    let external = by_id(&out, "external");
    assert_eq!(external.attr("href"), Some("https://example.com"));
    assert_eq!(external.attr("data-link"), None);
    assert!(external.handler("click").is_none());

    assert_eq!(by_id(&out, "unbound").attr("href"), Some("#"));
}

#[test]
fn navigating_cards_are_wrapped_in_client_links() {
    let host = RecordingHost::new();
    let t = tree(
        json!({
            "wrapper": "div.card#card",
            "events": {"on_click": {"action": "navigate", "target": "product.url"}},
            "content": "Card"
        }),
        &host,
    );
    let out = t.render(&data(json!({"product": {"url": "/p/9"}})));
    let link = out.nodes[0].as_element().unwrap();
    assert_eq!(link.tag, "a");
    assert_eq!(link.attr("href"), Some("/p/9"));
    assert_eq!(link.attr("data-link"), Some("client"));
    let card = by_id(&out, "card");
    assert!(card.handlers.is_empty());
    assert_eq!(card.style.get("cursor"), Some("pointer"));
}

#[test]
fn marquee_keyframes_once_per_pass() {
    let host = RecordingHost::new();
    let t = tree(
        json!({
            "wrapper": "div",
            "blocks": [
                {"type": "marquee", "wrapper": "div.ticker", "content": "a",
                 "blocks": [{"wrapper": "span", "content": "Free shipping"}]},
                {"type": "marquee", "wrapper": "div.ticker",
                 "animation": {"direction": "right", "duration": 20},
                 "blocks": [{"wrapper": "span", "content": "New arrivals"}]}
            ]
        }),
        &host,
    );
    for _ in 0..2 {
        let out = t.render(&Map::new());
        let styles = out.elements().iter().filter(|e| e.tag == "style").count();
        assert_eq!(styles, 1);
        let tickers = out.find_by_class("ticker");
        assert_eq!(
            tickers[0].style.get("animation"),
            Some("marquee-left 8s linear infinite")
        );
        assert_eq!(
            tickers[1].style.get("animation"),
            Some("marquee-right 20s linear infinite")
        );
        assert!(out.text_content().contains("Free shipping"));
    }
}

#[test]
fn progress_bar_tracks_carousel_rendered_after_it() {
    let host = RecordingHost::new();
    let t = tree(
        json!({
            "wrapper": "div",
            "blocks": [
                {"type": "progress_bar", "id": "bar", "data": {"swiper_target": "hero"}},
                {"type": "swiper", "id": "hero", "blocks": [
                    {"content": "1"}, {"content": "2"}, {"content": "3"}, {"content": "4"}
                ]}
            ]
        }),
        &host,
    );
    let out = t.render(&Map::new());
    let bar = by_id(&out, "bar");
    assert_eq!(bar.style.get("width"), Some("25%"));
    assert_eq!(bar.attr("data-swiper-target"), Some("hero"));

    t.control().next(Some("hero"));
    let out = t.render(&Map::new());
    assert_eq!(by_id(&out, "bar").style.get("width"), Some("50%"));
}

#[test]
fn degraded_input_is_diagnosed_not_fatal() {
    let host = RecordingHost::new();
    let t = tree(
        json!({
            "wrapper": "div",
            "blocks": [
                {"type": "icon", "icon": "definitely-not-an-icon"},
                {"wrapper": "button", "content": "Wish",
                 "events": {"on_click": {"action": "add_to_wishlist"}}},
                {"wrapper": "p", "condition": {"field": "x", "op": "between", "value": 1}}
            ]
        }),
        &host,
    );
    let out = t.render(&Map::new());
    let kinds: Vec<_> = out.diagnostics.iter().map(|d| d.kind).collect();
    assert_eq!(
        kinds,
        [
            DiagnosticKind::UnknownIcon,
            DiagnosticKind::UnknownAction,
            DiagnosticKind::UnknownOperator
        ]
    );
    assert!(out.elements().iter().all(|e| e.tag != "p"));
    assert_eq!(t.handler_count(), 0);
}

#[test]
fn diagnostics_can_be_disabled() {
    let host = RecordingHost::new();
    let settings = EngineSettings {
        diagnostics: false,
        ..EngineSettings::default()
    };
    let t = RenderTree::with_options(
        vec![common::block(json!({"type": "icon", "icon": "nope"}))],
        host,
        settings,
        None,
    );
    assert!(t.render(&Map::new()).diagnostics.is_empty());
}

#[test]
fn declared_state_hides_until_toggled() {
    let host = RecordingHost::new();
    let t = tree(
        json!({
            "wrapper": "div",
            "blocks": [
                {"wrapper": "button#open", "content": "Menu",
                 "events": {"on_click": {"action": "toggle_drawer", "target": "mobile_menu"}}},
                {"wrapper": "nav#mobile_menu", "state": {"visible": false}, "content": "links"}
            ]
        }),
        &host,
    );
    let out = t.render(&Map::new());
    assert_eq!(by_id(&out, "mobile_menu").style.get("display"), Some("none"));
    let open = by_id(&out, "open").handler("click").unwrap();
    assert!(t.fire(open, UiEvent::Click));
    let out = t.render(&Map::new());
    assert_eq!(by_id(&out, "mobile_menu").style.get("display"), None);
}

#[test]
fn drawer_first_rendered_after_seeding_opens_on_first_toggle() {
    let host = RecordingHost::new();
    let t = tree(
        json!({
            "wrapper": "div",
            "blocks": [
                {"wrapper": "button#cart-open", "content": "Cart",
                 "events": {"on_click": {"action": "toggle_drawer", "target": "cart_drawer"}}},
                {"wrapper": "div#cart_drawer", "state": {"visible": false},
                 "condition": {"field": "ready", "op": "equals", "value": true},
                 "content": "items"}
            ]
        }),
        &host,
    );
    let out = t.render(&data(json!({"ready": false})));
    assert!(out.find_by_id("cart_drawer").is_none());
    assert_eq!(t.visibility().entry("cart_drawer"), None);

    let out = t.render(&data(json!({"ready": true})));
    assert_eq!(by_id(&out, "cart_drawer").style.get("display"), Some("none"));
    assert_eq!(t.visibility().entry("cart_drawer"), Some(false));

    let open = by_id(&out, "cart-open").handler("click").unwrap();
    assert!(t.fire(open, UiEvent::Click));
    let out = t.render(&data(json!({"ready": true})));
    assert_eq!(by_id(&out, "cart_drawer").style.get("display"), None);
    assert!(t.visibility().get("cart_drawer"));
}

#[test]
fn html_output_for_a_small_tree() {
    let host = RecordingHost::new();
    let t = tree(
        json!({
            "wrapper": "section#intro.container",
            "style": {"padding_top": 12, "line_height": 1.5},
            "blocks": [
                {"wrapper": "h1", "bind_content": "shop.name"},
                {"wrapper": "p", "content": "Fish & chips"}
            ]
        }),
        &host,
    );
    let out = t.render(&data(json!({"shop": {"name": "Harbour"}})));
    assert_eq!(
        out.to_html(),
        "<section id=\"intro\" class=\"container\" style=\"line-height: 1.5; padding-top: 12px\">\
         <h1>Harbour</h1><p>Fish &amp; chips</p></section>"
    );
}
