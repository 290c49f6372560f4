//! Rendered output: a small element tree with HTML serialization.

use std::fmt::{self, Write as _};

use schema::EventKind;
use serde::{Serialize, Serializer, ser::SerializeMap};

/// Elements rendered without children or a closing tag.
const VOID_TAGS: &[&str] = &["input", "img", "br", "hr", "meta", "link"];

/// Identifies a wired event handler within the most recent render pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct HandlerId(pub u32);

impl fmt::Display for HandlerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "h{}", self.0)
    }
}

/// Ordered CSS declarations; setting an existing property replaces it in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Style(Vec<(String, String)>);

impl Style {
    /// Empty style.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `property` to `value`.
    pub fn set(&mut self, property: impl Into<String>, value: impl Into<String>) {
        let property = property.into();
        let value = value.into();
        match self.0.iter_mut().find(|(p, _)| *p == property) {
            Some(slot) => slot.1 = value,
            None => self.0.push((property, value)),
        }
    }

    /// Value of `property`.
    pub fn get(&self, property: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(p, _)| p == property)
            .map(|(_, v)| v.as_str())
    }

    /// No declarations.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Declarations in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(p, v)| (p.as_str(), v.as_str()))
    }

    /// `prop: value; prop: value` text.
    pub fn to_css(&self) -> String {
        self.0
            .iter()
            .map(|(p, v)| format!("{p}: {v}"))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

impl Serialize for Style {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (p, v) in &self.0 {
            map.serialize_entry(p, v)?;
        }
        map.end()
    }
}

/// An event wired to a handler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Wired {
    /// DOM event name.
    pub event: String,
    /// Handler to fire.
    pub handler: HandlerId,
}

/// A rendered element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Element {
    /// Lowercase tag name.
    pub tag: String,
    /// Element id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Class list.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub classes: Vec<String>,
    /// Inline style.
    #[serde(skip_serializing_if = "Style::is_empty")]
    pub style: Style,
    /// Other attributes in insertion order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attrs: Vec<(String, String)>,
    /// Wired handlers.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub handlers: Vec<Wired>,
    /// Stable sibling key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    /// Child nodes.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,
}

impl Element {
    /// New element with `tag`.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    /// Append classes from a whitespace-separated list, skipping duplicates.
    pub fn add_classes(&mut self, list: &str) {
        for class in list.split_whitespace() {
            if !self.classes.iter().any(|c| c == class) {
                self.classes.push(class.to_string());
            }
        }
    }

    /// Builder form of [`Self::add_classes`].
    pub fn with_classes(mut self, list: &str) -> Self {
        self.add_classes(list);
        self
    }

    /// Whether `class` is present.
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// Class list joined by spaces.
    pub fn class_string(&self) -> String {
        self.classes.join(" ")
    }

    /// Set an attribute, replacing an existing value.
    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attrs.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.attrs.push((name, value)),
        }
    }

    /// Builder form of [`Self::set_attr`].
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    /// Attribute value.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Wire `event` to `handler`, replacing an earlier handler for the same event.
    pub fn on(&mut self, event: &EventKind, handler: HandlerId) {
        let name = event.dom_name();
        match self.handlers.iter_mut().find(|w| w.event == name) {
            Some(slot) => slot.handler = handler,
            None => self.handlers.push(Wired {
                event: name.to_string(),
                handler,
            }),
        }
    }

    /// Handler wired for a DOM event name.
    pub fn handler(&self, event: &str) -> Option<HandlerId> {
        self.handlers
            .iter()
            .find(|w| w.event == event)
            .map(|w| w.handler)
    }

    /// Append a child node.
    pub fn push(&mut self, child: Node) {
        self.children.push(child);
    }

    /// Builder form of [`Self::push`].
    pub fn with_child(mut self, child: Node) -> Self {
        self.push(child);
        self
    }

    /// Whether this tag never has children.
    pub fn is_void(&self) -> bool {
        VOID_TAGS.contains(&self.tag.as_str())
    }
}

/// A rendered node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "node", rename_all = "snake_case")]
pub enum Node {
    /// An element.
    Element(Element),
    /// Escaped text.
    Text {
        /// Text content.
        text: String,
    },
    /// Pre-formatted markup emitted verbatim (stylesheet bodies).
    Raw {
        /// Markup.
        html: String,
    },
    /// Siblings without a wrapper.
    Fragment {
        /// Child nodes.
        children: Vec<Node>,
    },
}

impl From<Element> for Node {
    fn from(el: Element) -> Self {
        Self::Element(el)
    }
}

/// Escape text content.
fn escape_text(s: &str, out: &mut String) {
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
}

/// Escape a double-quoted attribute value.
fn escape_attr(s: &str, out: &mut String) {
    for c in s.chars() {
        match c {
            '"' => out.push_str("&quot;"),
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
}

/// Append ` name="value"`.
fn push_attr(out: &mut String, name: &str, value: &str) {
    let _ignored = write!(out, " {name}=\"");
    escape_attr(value, out);
    out.push('"');
}

impl Node {
    /// A text node.
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    /// The element, if this node is one.
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Self::Element(el) => Some(el),
            _ => None,
        }
    }

    /// Mutable access to the element, if this node is one.
    pub fn as_element_mut(&mut self) -> Option<&mut Element> {
        match self {
            Self::Element(el) => Some(el),
            _ => None,
        }
    }

    /// Direct children.
    pub fn children(&self) -> &[Self] {
        match self {
            Self::Element(el) => &el.children,
            Self::Fragment { children } => children,
            Self::Text { .. } | Self::Raw { .. } => &[],
        }
    }

    /// Pre-order walk over this node and every descendant.
    pub fn descendants(&self) -> Vec<&Self> {
        let mut out = Vec::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            out.push(node);
            stack.extend(node.children().iter().rev());
        }
        out
    }

    /// Every element in pre-order.
    pub fn elements(&self) -> Vec<&Element> {
        self.descendants()
            .into_iter()
            .filter_map(Self::as_element)
            .collect()
    }

    /// First element with `id`.
    pub fn find_by_id(&self, id: &str) -> Option<&Element> {
        self.elements()
            .into_iter()
            .find(|el| el.id.as_deref() == Some(id))
    }

    /// Every element carrying `class`.
    pub fn find_by_class(&self, class: &str) -> Vec<&Element> {
        self.elements()
            .into_iter()
            .filter(|el| el.has_class(class))
            .collect()
    }

    /// Concatenated text of this subtree.
    pub fn text_content(&self) -> String {
        self.descendants()
            .into_iter()
            .filter_map(|n| match n {
                Self::Text { text } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Serialize as HTML. Handlers appear as `data-on-<event>` attributes.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    /// Append this subtree's markup to `out`.
    fn write_html(&self, out: &mut String) {
        match self {
            Self::Text { text } => escape_text(text, out),
            Self::Raw { html } => out.push_str(html),
            Self::Fragment { children } => {
                for child in children {
                    child.write_html(out);
                }
            }
            Self::Element(el) => {
                out.push('<');
                out.push_str(&el.tag);
                if let Some(id) = &el.id {
                    push_attr(out, "id", id);
                }
                if !el.classes.is_empty() {
                    push_attr(out, "class", &el.class_string());
                }
                if !el.style.is_empty() {
                    push_attr(out, "style", &el.style.to_css());
                }
                for (name, value) in &el.attrs {
                    push_attr(out, name, value);
                }
                for wired in &el.handlers {
                    push_attr(out, &format!("data-on-{}", wired.event), &wired.handler.0.to_string());
                }
                if el.is_void() {
                    out.push_str(" />");
                    return;
                }
                out.push('>');
                for child in &el.children {
                    child.write_html(out);
                }
                let _ignored = write!(out, "</{}>", el.tag);
            }
        }
    }
}
