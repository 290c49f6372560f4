//! Carousel blocks: slide population, instance mounting, arrows and pagination.

use schema::{Block, BlockKind, CarouselConfig, Effect, EventKind, PaginationKind, RepeaterSpec, Value};

use crate::{
    binding::format_number,
    carousel::CarouselHandle,
    dispatch::{Handler, SliderOp, SliderRoute},
    element::shell,
    node::{Element, Node},
    render::{RenderCx, child_key},
    repeater::{self, item_key},
    scope::{Scope, child_path},
};

/// Prefix of generated instance keys for carousels without an id.
const GENERATED_KEY_PREFIX: &str = "swiper-";

/// Where the slides come from.
enum Slides<'a> {
    /// Each child block is one slide.
    Children(&'a [Block]),
    /// A leading repeater: one slide per collection element.
    Repeated {
        /// The repeater.
        spec: &'a RepeaterSpec,
        /// Its template.
        template: &'a Block,
        /// The collection.
        items: &'a [Value],
    },
}

impl Slides<'_> {
    /// Number of slides.
    fn len(&self) -> usize {
        match self {
            Self::Children(children) => children.len(),
            Self::Repeated { items, .. } => items.len(),
        }
    }
}

/// Instance key: wrapper id, else block id, else one derived from the tree position.
fn instance_key(el: &Element, block: &Block, scope: &Scope<'_>) -> String {
    el.id
        .clone()
        .or_else(|| block.id.clone().filter(|s| !s.is_empty()))
        .unwrap_or_else(|| {
            let path = if scope.path.is_empty() { "root" } else { scope.path };
            format!("{GENERATED_KEY_PREFIX}{path}")
        })
}

/// Key of a repeated slide.
fn slide_key(item: &Value, index: usize, iterator: &str) -> String {
    format!("slide-{}", item_key(item, index, iterator))
}

/// Render a carousel block.
///
/// A leading repeater child supplies the slides from its collection; a
/// missing or empty collection renders nothing. Otherwise the children are
/// the slides.
pub(crate) fn render(
    cx: &mut dyn RenderCx,
    block: &Block,
    config: &CarouselConfig,
    scope: Scope<'_>,
) -> Option<Node> {
    let mut outer = shell(cx, block, &scope);
    outer.tag = "div".to_string();
    let key = instance_key(&outer, block, &scope);

    let slides = match block.children.first().map(|b| &b.kind) {
        Some(BlockKind::Repeater(spec)) => {
            let (template, items) = repeater::collection(cx, spec, &scope)?;
            Slides::Repeated {
                spec,
                template,
                items,
            }
        }
        _ => Slides::Children(&block.children),
    };

    let shared = cx.shared();
    let options = config.resolve(shared.settings.autoplay_delay_ms);
    let (per_view, space) = match shared.viewport() {
        Some(width) => options.at_width(width),
        None => (options.slides_per_view, options.space_between),
    };
    let count = slides.len();
    let handle = cx.mount_carousel(&key, &options, count, scope.section);
    let active = handle.active_index();

    outer.set_attr("data-carousel", key.clone());
    outer.set_attr("data-slides-per-view", format_number(per_view));
    outer.set_attr("data-space-between", format_number(space));
    if options.effect != Effect::Slide {
        outer.set_attr("data-effect", options.effect.as_str());
    }
    if options.looped {
        outer.set_attr("data-loop", "true");
    }
    if options.centered {
        outer.set_attr("data-centered", "true");
    }
    if let Some(autoplay) = options.autoplay {
        outer.set_attr("data-autoplay", autoplay.delay_ms.to_string());
        if autoplay.pause_on_hover {
            let enter = cx.wire(Handler::CarouselHover {
                carousel: handle.clone(),
                hovered: true,
            });
            outer.on(&EventKind::MouseEnter, enter);
            let leave = cx.wire(Handler::CarouselHover {
                carousel: handle.clone(),
                hovered: false,
            });
            outer.on(&EventKind::MouseLeave, leave);
        }
    }

    let slide_scope = scope.in_carousel(&handle);
    let mut wrapper = Element::new("div").with_classes("swiper-wrapper");
    if options.effect != Effect::Fade && per_view > 0.0 {
        let offset = active as f64 * 100.0 / per_view;
        let shift = if offset > 0.0 {
            format!("-{}%", format_number(offset))
        } else {
            "0%".to_string()
        };
        wrapper
            .style
            .set("transform", format!("translate3d({shift}, 0, 0)"));
    }
    wrapper.children = render_slides(cx, &slides, slide_scope, active, per_view, space);

    let mut swiper = Element::new("div").with_classes("swiper").with_child(wrapper.into());
    if options.navigation {
        swiper.push(arrow(cx, &handle, SliderOp::Prev));
        swiper.push(arrow(cx, &handle, SliderOp::Next));
    }
    if let Some(pagination) = options.pagination {
        swiper.push(pagination_node(
            cx,
            &handle,
            pagination.kind,
            pagination.clickable,
            active,
            count,
        ));
    }
    outer.push(swiper.into());
    Some(outer.into())
}

/// One `swiper-slide` element per slide, the active one marked.
fn render_slides(
    cx: &mut dyn RenderCx,
    slides: &Slides<'_>,
    scope: Scope<'_>,
    active: usize,
    per_view: f64,
    space: f64,
) -> Vec<Node> {
    let slide_shell = |index: usize| {
        let mut slide = Element::new("div").with_classes("swiper-slide");
        if index == active {
            slide.add_classes("swiper-slide-active");
        }
        if per_view > 0.0 && (per_view - 1.0).abs() > f64::EPSILON {
            slide
                .style
                .set("width", format!("{}%", format_number(100.0 / per_view)));
        }
        if space > 0.0 {
            slide
                .style
                .set("margin-right", format!("{}px", format_number(space)));
        }
        slide
    };

    let mut out = Vec::with_capacity(slides.len());
    match slides {
        Slides::Children(children) => {
            for (index, child) in children.iter().enumerate() {
                let path = child_path(scope.path, index);
                let mut slide = slide_shell(index);
                slide.key = Some(child_key(child, index));
                if let Some(node) = cx.render_block(child, scope.at(&path)) {
                    slide.push(node);
                }
                out.push(slide.into());
            }
        }
        Slides::Repeated {
            spec,
            template,
            items,
        } => {
            for (index, item) in items.iter().enumerate() {
                let ctx = repeater::item_context(scope.context, spec, item, index);
                let path = child_path(scope.path, index);
                let mut slide = slide_shell(index);
                slide.key = Some(slide_key(item, index, &spec.iterator));
                if let Some(node) = cx.render_block(template, scope.with_context(&ctx).at(&path)) {
                    slide.push(node);
                }
                out.push(slide.into());
            }
        }
    }
    out
}

/// Previous/next arrow bound to this instance.
fn arrow(cx: &mut dyn RenderCx, handle: &CarouselHandle, op: SliderOp) -> Node {
    let (class, label) = match op {
        SliderOp::Prev => ("swiper-button-prev", "Previous slide"),
        _ => ("swiper-button-next", "Next slide"),
    };
    let id = cx.wire(Handler::Slider {
        op,
        route: SliderRoute::Local(handle.clone()),
    });
    let mut button = Element::new("button")
        .with_classes(class)
        .with_attr("type", "button")
        .with_attr("aria-label", label);
    button.on(&EventKind::Click, id);
    button.into()
}

/// Pagination per kind: bullets, `n / total` fraction, or a progress fill.
fn pagination_node(
    cx: &mut dyn RenderCx,
    handle: &CarouselHandle,
    kind: PaginationKind,
    clickable: bool,
    active: usize,
    count: usize,
) -> Node {
    let mut el = Element::new("div").with_classes("swiper-pagination");
    match kind {
        PaginationKind::Bullets => {
            el.add_classes("swiper-pagination-bullets");
            for index in 0..count {
                let mut bullet = Element::new("span").with_classes("swiper-pagination-bullet");
                if index == active {
                    bullet.add_classes("swiper-pagination-bullet-active");
                }
                if clickable {
                    let id = cx.wire(Handler::Slider {
                        op: SliderOp::Goto(Some(index)),
                        route: SliderRoute::Local(handle.clone()),
                    });
                    bullet.on(&EventKind::Click, id);
                    bullet.set_attr("aria-label", format!("Go to slide {}", index + 1));
                }
                el.push(bullet.into());
            }
        }
        PaginationKind::Fraction => {
            el.add_classes("swiper-pagination-fraction");
            let current = if count == 0 { 0 } else { active + 1 };
            el.push(
                Element::new("span")
                    .with_classes("swiper-pagination-current")
                    .with_child(Node::text(current.to_string()))
                    .into(),
            );
            el.push(Node::text(" / "));
            el.push(
                Element::new("span")
                    .with_classes("swiper-pagination-total")
                    .with_child(Node::text(count.to_string()))
                    .into(),
            );
        }
        PaginationKind::ProgressBar => {
            el.add_classes("swiper-pagination-progressbar");
            let mut fill = Element::new("span").with_classes("swiper-pagination-progressbar-fill");
            let pct = if count == 0 {
                0.0
            } else {
                (active + 1) as f64 / count as f64 * 100.0
            };
            fill.style.set("width", format!("{}%", format_number(pct)));
            el.push(fill.into());
        }
    }
    el.into()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn slide_keys() {
        assert_eq!(slide_key(&json!({"id": "a"}), 0, "slide"), "slide-slide-a");
        assert_eq!(slide_key(&json!({"name": "n"}), 1, "item"), "slide-item-n-1");
        assert_eq!(slide_key(&json!(5), 2, "item"), "slide-item-2");
    }
}
