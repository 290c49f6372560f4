//! The data and context channels threaded down one render walk.

use schema::{CART_COUNT_KEY, CART_TOTAL_KEY, Map};

use crate::carousel::CarouselHandle;

/// Data key exposing the visibility store to conditions (`_drawer.<id>`).
pub const DRAWER_KEY: &str = "_drawer";

/// Keys a descendant's local `data` can never shadow once an ancestor supplies them.
const INHERITED_KEYS: &[&str] = &[CART_COUNT_KEY, CART_TOTAL_KEY, DRAWER_KEY];

/// Merge a block's local `data` over the ambient data.
///
/// Local keys win, except the inherited aggregate keys: when the parent
/// already carries one of those, the parent's value is kept.
pub(crate) fn merge_data(parent: &Map, local: &Map) -> Map {
    let mut merged = parent.clone();
    for (key, value) in local {
        if INHERITED_KEYS.contains(&key.as_str()) && parent.contains_key(key) {
            continue;
        }
        merged.insert(key.clone(), value.clone());
    }
    merged
}

/// Everything a block sees from its ancestors.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Scope<'a> {
    /// Merged ambient data.
    pub data: &'a Map,
    /// Loop and slide items.
    pub context: &'a Map,
    /// Id of the nearest enclosing `section` element with an id.
    pub section: Option<&'a str>,
    /// Carousel whose slides are being rendered, if any.
    pub carousel: Option<&'a CarouselHandle>,
    /// Position of this block in the tree, used for generated instance keys.
    pub path: &'a str,
}

impl<'a> Scope<'a> {
    /// The scope at the top of a render walk.
    pub(crate) fn root(data: &'a Map, context: &'a Map) -> Self {
        Self {
            data,
            context,
            section: None,
            carousel: None,
            path: "",
        }
    }

    /// Same scope with different data.
    pub(crate) fn with_data(self, data: &'a Map) -> Self {
        Self { data, ..self }
    }

    /// Same scope with a different item context.
    pub(crate) fn with_context(self, context: &'a Map) -> Self {
        Self { context, ..self }
    }

    /// Same scope at a different tree position.
    pub(crate) fn at(self, path: &'a str) -> Self {
        Self { path, ..self }
    }

    /// Same scope inside a section.
    pub(crate) fn in_section(self, section: &'a str) -> Self {
        Self {
            section: Some(section),
            ..self
        }
    }

    /// Same scope inside a carousel's slides.
    pub(crate) fn in_carousel(self, carousel: &'a CarouselHandle) -> Self {
        Self {
            carousel: Some(carousel),
            ..self
        }
    }
}

/// Tree position of child `index` under `parent`.
pub(crate) fn child_path(parent: &str, index: usize) -> String {
    if parent.is_empty() {
        index.to_string()
    } else {
        format!("{parent}.{index}")
    }
}
