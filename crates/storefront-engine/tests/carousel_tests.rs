mod common;

use std::time::Duration;

use common::{Call, RecordingHost, by_id, data, live_tree, text, tree};
use schema::Map;
use serde_json::{Value, json};
use storefront_engine::{
    DEFAULT_CAROUSEL_KEY, DiagnosticKind, RenderOutput, UiEvent, global_control,
    install_global_control, uninstall_global_control,
};
use tokio::{task, time};

fn deals(config: Value) -> Value {
    json!({
        "type": "swiper",
        "id": "deals",
        "config": config,
        "blocks": [
            {"wrapper": "p", "content": "One"},
            {"wrapper": "p", "content": "Two"},
            {"wrapper": "p", "content": "Three"}
        ]
    })
}

fn active_slide(out: &RenderOutput) -> usize {
    out.find_by_class("swiper-slide")
        .iter()
        .position(|s| s.has_class("swiper-slide-active"))
        .expect("an active slide")
}

#[test]
fn renders_slides_arrows_and_bullets() {
    let host = RecordingHost::new();
    let t = tree(deals(json!({"navigation": true, "pagination": true})), &host);
    let out = t.render(&Map::new());

    let outer = by_id(&out, "deals");
    assert_eq!(outer.tag, "div");
    assert_eq!(outer.attr("data-carousel"), Some("deals"));
    assert_eq!(out.find_by_class("swiper-slide").len(), 3);
    assert_eq!(active_slide(&out), 0);
    assert_eq!(out.find_by_class("swiper-pagination-bullet").len(), 3);
    assert_eq!(
        out.find_by_class("swiper-wrapper")[0].style.get("transform"),
        Some("translate3d(0%, 0, 0)")
    );

    let next = out.find_by_class("swiper-button-next")[0]
        .handler("click")
        .unwrap();
    assert!(t.fire(next, UiEvent::Click));
    let out = t.render(&Map::new());
    assert_eq!(active_slide(&out), 1);
    assert_eq!(
        out.find_by_class("swiper-wrapper")[0].style.get("transform"),
        Some("translate3d(-100%, 0, 0)")
    );

    let third = out.find_by_class("swiper-pagination-bullet")[2]
        .handler("click")
        .unwrap();
    t.fire(third, UiEvent::Click);
    assert_eq!(t.carousel("deals").unwrap().active_index(), 2);
    assert!(host.calls().contains(&Call::RequestRender));
}

#[test]
fn loop_wraps_and_clamp_stops() {
    let host = RecordingHost::new();
    let t = tree(deals(json!({"loop": true, "navigation": true})), &host);
    let out = t.render(&Map::new());
    let prev = out.find_by_class("swiper-button-prev")[0]
        .handler("click")
        .unwrap();
    t.fire(prev, UiEvent::Click);
    assert_eq!(t.carousel("deals").unwrap().active_index(), 2);

    let host = RecordingHost::new();
    let t = tree(deals(json!({"navigation": true})), &host);
    let out = t.render(&Map::new());
    let prev = out.find_by_class("swiper-button-prev")[0]
        .handler("click")
        .unwrap();
    t.fire(prev, UiEvent::Click);
    assert_eq!(t.carousel("deals").unwrap().active_index(), 0);
}

#[test]
fn fraction_pagination_and_breakpoints() {
    let host = RecordingHost::new();
    let t = tree(
        deals(json!({
            "slides_per_view": 1,
            "breakpoints": {"768": {"slides_per_view": 3, "space_between": 24}},
            "pagination": {"type": "fraction"}
        })),
        &host,
    );
    let out = t.render(&Map::new());
    assert_eq!(
        text(out.find_by_class("swiper-pagination")[0]),
        "1 / 3"
    );
    assert_eq!(by_id(&out, "deals").attr("data-slides-per-view"), Some("1"));

    t.set_viewport(Some(1024));
    let out = t.render(&Map::new());
    let outer = by_id(&out, "deals");
    assert_eq!(outer.attr("data-slides-per-view"), Some("3"));
    assert_eq!(outer.attr("data-space-between"), Some("24"));
}

#[test]
fn repeater_fed_slides() {
    let host = RecordingHost::new();
    let t = tree(
        json!({
            "type": "swiper",
            "id": "reviews",
            "blocks": [{
                "type": "repeater",
                "source": "reviews",
                "iterator": "review",
                "template": {"wrapper": "blockquote", "bind_content": "review.text"}
            }]
        }),
        &host,
    );
    let out = t.render(&data(json!({
        "reviews": [{"id": "r1", "text": "Great"}, {"id": "r2", "text": "Fine"}]
    })));
    let slides = out.find_by_class("swiper-slide");
    assert_eq!(slides.len(), 2);
    assert_eq!(slides[0].key.as_deref(), Some("slide-review-r1"));
    assert_eq!(text(slides[1]), "Fine");
    assert_eq!(t.carousel("reviews").unwrap().slide_count(), 2);

    let out = t.render(&data(json!({"reviews": []})));
    assert!(out.nodes.is_empty());
    assert_eq!(out.diagnostics[0].kind, DiagnosticKind::EmptySource);
    assert!(t.carousel("reviews").is_none());
}

#[test]
fn carousels_unmount_when_no_longer_rendered() {
    let host = RecordingHost::new();
    let mut root = deals(json!({}));
    root["condition"] = json!({"field": "show", "op": "equals", "value": true});
    let t = tree(json!({"wrapper": "div", "blocks": [root]}), &host);

    t.render(&data(json!({"show": true})));
    let first = t.carousel("deals").unwrap();
    assert!(t.carousel(DEFAULT_CAROUSEL_KEY).unwrap().ptr_eq(&first));

    t.render(&data(json!({"show": false})));
    assert!(t.registry().is_empty());

    t.render(&data(json!({"show": true})));
    assert!(!t.carousel("deals").unwrap().ptr_eq(&first));
}

#[test]
fn exact_match_beats_shared_prefix() {
    let host = RecordingHost::new();
    let t = tree(
        json!({
            "wrapper": "div",
            "blocks": [
                {"type": "swiper", "id": "hero-1-swiper-a", "blocks": [{"content": "x"}]},
                {"type": "swiper", "id": "hero-1-swiper-b", "blocks": [{"content": "y"}]}
            ]
        }),
        &host,
    );
    t.render(&Map::new());
    let x = t.carousel("hero-1-swiper-a").unwrap();
    let y = t.carousel("hero-1-swiper-b").unwrap();
    assert!(t.registry().find("hero-1-swiper-a").unwrap().ptr_eq(&x));
    assert!(t.registry().find("hero-1-swiper-b").unwrap().ptr_eq(&y));
    assert!(t.registry().find("hero-1").unwrap().ptr_eq(&x));
    assert!(t.registry().find("hero-1-swiper-c").unwrap().ptr_eq(&x));
}

#[test]
fn section_controls_drive_the_section_carousel() {
    let host = RecordingHost::new();
    let t = tree(
        json!({
            "wrapper": "section#hero-2",
            "blocks": [
                {"type": "swiper", "wrapper": "div#hero-2-swiper-main", "blocks": [
                    {"content": "a"}, {"content": "b"}, {"content": "c"}
                ]},
                {"wrapper": "button#hero-next", "content": "Next",
                 "events": {"on_click": {"action": "slider_next", "target": "other"}}}
            ]
        }),
        &host,
    );
    let out = t.render(&Map::new());
    let next = by_id(&out, "hero-next").handler("click").unwrap();
    t.fire(next, UiEvent::Click);
    t.fire(next, UiEvent::Click);
    assert_eq!(t.carousel("hero-2").unwrap().active_index(), 2);
    assert!(host.actions().is_empty());
}

#[test]
fn controls_inside_slides_drive_their_own_carousel() {
    let host = RecordingHost::new();
    let t = tree(
        json!({
            "wrapper": "div",
            "blocks": [
                {"type": "swiper", "id": "first", "blocks": [{"content": "a"}, {"content": "b"}]},
                {"type": "swiper", "id": "second", "blocks": [
                    {"wrapper": "button#inner-next", "content": "Next",
                     "events": {"on_click": {"action": "slider_next", "target": "first"}}},
                    {"content": "b"}
                ]}
            ]
        }),
        &host,
    );
    let out = t.render(&Map::new());
    let next = by_id(&out, "inner-next").handler("click").unwrap();
    t.fire(next, UiEvent::Click);
    assert_eq!(t.carousel("second").unwrap().active_index(), 1);
    assert_eq!(t.carousel("first").unwrap().active_index(), 0);
}

#[test]
fn external_control_is_explicit() {
    let host = RecordingHost::new();
    let t = tree(deals(json!({})), &host);
    t.render(&Map::new());
    assert!(global_control().is_none());
    host.clear();

    install_global_control(t.control());
    let control = global_control().unwrap();
    assert_eq!(control.prev(Some("deals")), Some(0));
    assert!(host.calls().is_empty());
    assert_eq!(control.next(Some("deals")), Some(1));
    assert_eq!(host.calls(), vec![Call::RequestRender]);
    assert_eq!(control.goto(9, None), Some(2));
    assert_eq!(control.prev(Some("deals")), Some(1));
    assert!(control.get("deals").is_some());
    assert!(uninstall_global_control().is_some());
}

#[test]
fn autoplay_without_runtime_is_diagnosed() {
    let host = RecordingHost::new();
    let t = tree(deals(json!({"autoplay": true})), &host);
    let out = t.render(&Map::new());
    assert_eq!(out.diagnostics.len(), 1);
    assert_eq!(out.diagnostics[0].kind, DiagnosticKind::NoRuntime);
    assert_eq!(by_id(&out, "deals").attr("data-autoplay"), Some("3000"));
}

#[tokio::test(start_paused = true)]
async fn autoplay_advances_pauses_on_hover_and_stops_on_shutdown() {
    let host = RecordingHost::new();
    let t = live_tree(deals(json!({"autoplay": {"delay": 1000}, "loop": true})), &host);
    let out = t.render(&Map::new());
    let carousel = t.carousel("deals").unwrap();

    time::sleep(Duration::from_millis(1050)).await;
    task::yield_now().await;
    assert_eq!(carousel.active_index(), 1);
    assert!(host.calls().contains(&Call::RequestRender));

    let outer = by_id(&out, "deals");
    t.fire(outer.handler("mouseenter").unwrap(), UiEvent::MouseEnter);
    time::sleep(Duration::from_millis(2000)).await;
    task::yield_now().await;
    assert_eq!(carousel.active_index(), 1);

    t.fire(outer.handler("mouseleave").unwrap(), UiEvent::MouseLeave);
    time::sleep(Duration::from_millis(1000)).await;
    task::yield_now().await;
    assert_eq!(carousel.active_index(), 2);

    t.shutdown_async().await;
    time::sleep(Duration::from_millis(3000)).await;
    task::yield_now().await;
    assert_eq!(carousel.active_index(), 2);
    assert!(t.registry().is_empty());
}

#[tokio::test(start_paused = true)]
async fn interaction_stops_autoplay_when_configured() {
    let host = RecordingHost::new();
    let t = live_tree(
        deals(json!({
            "autoplay": {"delay": 500, "disable_on_interaction": true},
            "navigation": true
        })),
        &host,
    );
    let out = t.render(&Map::new());
    let carousel = t.carousel("deals").unwrap();
    let next = out.find_by_class("swiper-button-next")[0]
        .handler("click")
        .unwrap();
    t.fire(next, UiEvent::Click);
    assert_eq!(carousel.active_index(), 1);
    time::sleep(Duration::from_millis(2000)).await;
    task::yield_now().await;
    assert_eq!(carousel.active_index(), 1);
    assert!(carousel.autoplay_stopped());
}
