//! The declarative block node and its kind discriminator.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::{
    Map, Value,
    carousel::CarouselConfig,
    condition::Condition,
    event::{Action, EventDescriptor},
    wrapper::parse_wrapper,
};

/// Iterator name used when a repeater does not declare one.
pub const DEFAULT_ITERATOR: &str = "item";

/// One node of a page description.
///
/// Blocks are immutable input: the engine walks the same tree on every
/// render pass. Every `bind_*` field takes precedence over its plain
/// counterpart when it resolves; the plain field is the static fallback.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "RawBlock")]
pub struct Block {
    /// Tag, id and classes in one string (`section#hero.container`).
    pub wrapper: Option<String>,
    /// The declared `type`, kept verbatim (also used as an `input` type).
    pub type_name: Option<String>,
    /// Specialized renderer selection.
    pub kind: BlockKind,
    /// Static class list.
    pub class: Option<String>,
    /// Static style entries; binding-shaped values are resolved at render time.
    pub style: Map,
    /// Dynamic style entries (gradients, expressions, field transforms, bindings).
    pub bind_style: Map,
    /// Explicit id.
    pub id: Option<String>,
    /// Local data overrides for this subtree.
    pub data: Map,
    /// Child blocks in render order (`blocks` in JSON).
    pub children: Vec<Block>,
    /// Visibility predicate.
    pub condition: Option<Condition>,
    /// Event name to action descriptor, sorted by name.
    pub events: BTreeMap<String, EventDescriptor>,
    /// Declared initial visibility.
    pub state: Option<BlockState>,
    /// Static text content.
    pub content: Option<String>,
    /// Binding for text content.
    pub bind_content: Option<String>,
    /// Static image source.
    pub src: Option<String>,
    /// Binding for the image source.
    pub bind_src: Option<String>,
    /// Static image alt text.
    pub alt: Option<String>,
    /// Binding for the image alt text.
    pub bind_alt: Option<String>,
    /// Static link target.
    pub href: Option<String>,
    /// Binding for the link target.
    pub bind_href: Option<String>,
    /// Secondary static link target.
    pub url: Option<String>,
    /// Secondary binding for the link target.
    pub bind_url: Option<String>,
    /// Static icon name.
    pub icon: Option<String>,
    /// Binding for the icon name.
    pub bind_icon: Option<String>,
    /// Static input placeholder.
    pub placeholder: Option<String>,
    /// Binding for the input placeholder.
    pub bind_placeholder: Option<String>,
    /// Binding for the element id.
    pub bind_id: Option<String>,
    /// Binding for extra classes.
    pub bind_class: Option<String>,
    /// Explicit accessible label.
    pub aria_label: Option<String>,
    /// Icon size in pixels (`icon_size`, else `size`).
    pub icon_size: Option<f64>,
    /// Load this image eagerly.
    pub priority: bool,
}

/// Declared initial visibility (`"state": {"visible": false}`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BlockState {
    /// Initial value of this block's visibility entry.
    pub visible: Option<bool>,
}

/// Specialized renderer selected by a block's `type`.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum BlockKind {
    /// The default element renderer.
    #[default]
    Plain,
    /// A named icon glyph.
    Icon,
    /// One template expanded per collection element.
    Repeater(RepeaterSpec),
    /// A carousel (`swiper` or `carousel`).
    Carousel(CarouselConfig),
    /// A scrolling marquee.
    Marquee(Animation),
    /// A fill bar tracking a named carousel.
    ProgressBar,
}

impl BlockKind {
    /// Short name for diagnostics and summaries.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Plain => "element",
            Self::Icon => "icon",
            Self::Repeater(_) => "repeater",
            Self::Carousel(_) => "swiper",
            Self::Marquee(_) => "marquee",
            Self::ProgressBar => "progress_bar",
        }
    }
}

/// Repeater fields.
#[derive(Debug, Clone, PartialEq)]
pub struct RepeaterSpec {
    /// Binding path of the collection.
    pub source: Option<String>,
    /// Context name each element is injected under.
    pub iterator: String,
    /// Optional context name for the element position.
    pub index: Option<String>,
    /// Block rendered once per element.
    pub template: Option<Box<Block>>,
}

/// Marquee scroll direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarqueeDirection {
    /// Content travels right to left.
    #[default]
    Left,
    /// Content travels left to right.
    Right,
}

impl MarqueeDirection {
    /// Keyframes name driving this direction.
    pub fn keyframes(self) -> &'static str {
        match self {
            Self::Left => "marquee-left",
            Self::Right => "marquee-right",
        }
    }
}

/// Marquee animation settings.
#[derive(Debug, Clone, PartialEq)]
pub struct Animation {
    /// Scroll direction.
    pub direction: MarqueeDirection,
    /// Seconds per cycle.
    pub duration: f64,
    /// CSS iteration count.
    pub repeat: String,
}

impl Default for Animation {
    fn default() -> Self {
        Self {
            direction: MarqueeDirection::Left,
            duration: 8.0,
            repeat: "infinite".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct RawAnimation {
    #[serde(rename = "type")]
    kind: Option<String>,
    direction: Option<MarqueeDirection>,
    duration: Option<f64>,
    repeat: Option<Value>,
}

impl From<RawAnimation> for Animation {
    fn from(raw: RawAnimation) -> Self {
        let def = Self::default();
        Self {
            direction: raw.direction.unwrap_or(def.direction),
            duration: raw.duration.filter(|d| *d > 0.0).unwrap_or(def.duration),
            repeat: raw.repeat.and_then(|v| lenient_string(&v)).unwrap_or(def.repeat),
        }
    }
}

/// Wire shape of a block; converted into [`Block`] after deserialization.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct RawBlock {
    wrapper: Option<String>,
    #[serde(rename = "type")]
    type_name: Option<String>,
    class: Option<String>,
    style: Map,
    bind_style: Map,
    id: Option<String>,
    data: Map,
    #[serde(alias = "children")]
    blocks: Vec<Block>,
    condition: Option<Condition>,
    events: BTreeMap<String, EventDescriptor>,
    state: Option<BlockState>,
    content: Option<Value>,
    bind_content: Option<String>,
    src: Option<String>,
    bind_src: Option<String>,
    alt: Option<String>,
    bind_alt: Option<String>,
    href: Option<String>,
    bind_href: Option<String>,
    url: Option<String>,
    bind_url: Option<String>,
    icon: Option<String>,
    bind_icon: Option<String>,
    placeholder: Option<String>,
    bind_placeholder: Option<String>,
    bind_id: Option<String>,
    bind_class: Option<String>,
    aria_label: Option<String>,
    icon_size: Option<Value>,
    size: Option<Value>,
    priority: Option<bool>,
    source: Option<String>,
    iterator: Option<String>,
    index: Option<String>,
    template: Option<Box<Block>>,
    config: Option<CarouselConfig>,
    animation: Option<RawAnimation>,
}

/// Strings stay as they are; numbers and booleans are stringified; anything else is dropped.
fn lenient_string(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

impl From<RawBlock> for Block {
    fn from(raw: RawBlock) -> Self {
        let marquee_animation = raw
            .animation
            .as_ref()
            .and_then(|a| a.kind.as_deref())
            .is_some_and(|k| k == "marquee");

        let kind = match raw.type_name.as_deref() {
            Some("repeater") => BlockKind::Repeater(RepeaterSpec {
                source: raw.source.clone(),
                iterator: raw
                    .iterator
                    .clone()
                    .filter(|s| !s.is_empty())
                    .unwrap_or_else(|| DEFAULT_ITERATOR.to_string()),
                index: raw.index.clone(),
                template: raw.template.clone(),
            }),
            Some("swiper" | "carousel") => {
                BlockKind::Carousel(raw.config.clone().unwrap_or_default())
            }
            Some("marquee") => {
                BlockKind::Marquee(raw.animation.clone().map(Animation::from).unwrap_or_default())
            }
            Some("progress_bar") => BlockKind::ProgressBar,
            Some("icon") => BlockKind::Icon,
            _ if marquee_animation => {
                BlockKind::Marquee(raw.animation.clone().map(Animation::from).unwrap_or_default())
            }
            _ => BlockKind::Plain,
        };

        let icon_size = raw
            .icon_size
            .as_ref()
            .and_then(Value::as_f64)
            .or_else(|| raw.size.as_ref().and_then(Value::as_f64))
            .filter(|s| *s > 0.0);

        Self {
            wrapper: raw.wrapper,
            type_name: raw.type_name,
            kind,
            class: raw.class,
            style: raw.style,
            bind_style: raw.bind_style,
            id: raw.id,
            data: raw.data,
            children: raw.blocks,
            condition: raw.condition,
            events: raw.events,
            state: raw.state,
            content: raw.content.as_ref().and_then(lenient_string),
            bind_content: raw.bind_content,
            src: raw.src,
            bind_src: raw.bind_src,
            alt: raw.alt,
            bind_alt: raw.bind_alt,
            href: raw.href,
            bind_href: raw.bind_href,
            url: raw.url,
            bind_url: raw.bind_url,
            icon: raw.icon,
            bind_icon: raw.bind_icon,
            placeholder: raw.placeholder,
            bind_placeholder: raw.bind_placeholder,
            bind_id: raw.bind_id,
            bind_class: raw.bind_class,
            aria_label: raw.aria_label,
            icon_size,
            priority: raw.priority.unwrap_or(false),
        }
    }
}

impl Block {
    /// The statically declared id: `id`, else the wrapper's `#id`.
    pub fn declared_id(&self) -> Option<String> {
        self.id
            .clone()
            .filter(|s| !s.is_empty())
            .or_else(|| self.wrapper.as_deref().and_then(|w| parse_wrapper(w).id))
    }

    /// The click descriptor (`on_click`, else `click`).
    pub fn click_event(&self) -> Option<&EventDescriptor> {
        self.events
            .get("on_click")
            .or_else(|| self.events.get("click"))
    }

    /// The click action, if any.
    pub fn click_action(&self) -> Option<&Action> {
        self.click_event().map(|e| &e.action)
    }

    /// Initial visibility when declared through `state.visible`.
    pub fn declared_visibility(&self) -> Option<bool> {
        self.state.and_then(|s| s.visible)
    }

    /// Whether this block is an icon block.
    pub fn is_icon(&self) -> bool {
        matches!(self.kind, BlockKind::Icon)
    }

    /// Depth-first, pre-order walk over this block and its `blocks` descendants.
    ///
    /// Repeater templates are not descended into; they render only under an item context.
    pub fn walk(&self) -> Walk<'_> {
        Walk { stack: vec![self] }
    }
}

/// Iterator returned by [`Block::walk`].
#[derive(Debug)]
pub struct Walk<'a> {
    /// Pending blocks, top of stack visited next.
    stack: Vec<&'a Block>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = &'a Block;

    fn next(&mut self) -> Option<Self::Item> {
        let next = self.stack.pop()?;
        self.stack.extend(next.children.iter().rev());
        Some(next)
    }
}
