//! Marquee blocks: a wrapper animated by one of two shared keyframes.

use schema::{Animation, Block};

use crate::{
    binding::format_number,
    element::shell,
    node::{Element, Node},
    render::RenderCx,
    scope::Scope,
};

/// Keyframes for both directions, emitted once per render pass.
const KEYFRAMES: &str = "@keyframes marquee-left { from { transform: translateX(0); } \
     to { transform: translateX(-50%); } } \
     @keyframes marquee-right { from { transform: translateX(-50%); } \
     to { transform: translateX(0); } }";

/// CSS `animation` shorthand.
fn animation_css(animation: &Animation) -> String {
    format!(
        "{} {}s linear {}",
        animation.direction.keyframes(),
        format_number(animation.duration),
        animation.repeat
    )
}

/// Render a marquee. The first marquee of a pass is preceded by the stylesheet.
pub(crate) fn render(
    cx: &mut dyn RenderCx,
    block: &Block,
    animation: &Animation,
    scope: Scope<'_>,
) -> Node {
    let mut el = shell(cx, block, &scope);
    el.style.set("animation", animation_css(animation));
    el.children = cx.render_children(&block.children, scope);
    if cx.first_keyframes() {
        let style = Node::Element(
            Element::new("style").with_child(Node::Raw {
                html: KEYFRAMES.to_string(),
            }),
        );
        Node::Fragment {
            children: vec![style, el.into()],
        }
    } else {
        el.into()
    }
}
