//! Tree-scoped visibility toggles for drawers, accordions and menus.

use std::collections::BTreeMap;

use parking_lot::Mutex;
use schema::{Map, Value};
use tracing::{debug, trace};

/// Id whose entry closes before any navigation.
pub const MOBILE_MENU_ID: &str = "mobile_menu";

/// Mutable state behind the store's lock.
#[derive(Debug, Default)]
struct Inner {
    /// Explicit entries.
    states: BTreeMap<String, bool>,
    /// Whether the declared initial states were collected.
    seeded: bool,
}

/// Map from block id to visibility. Absent ids read as visible.
///
/// Seeded once from the declared `state.visible` values; blocks rendered
/// later add their declared value on first render. Every operation is atomic.
#[derive(Debug, Default)]
pub struct VisibilityStore {
    /// Guarded state.
    inner: Mutex<Inner>,
}

impl VisibilityStore {
    /// Empty, unseeded store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Install declared initial states. Only the first call has an effect.
    ///
    /// Returns `true` when this call seeded the store.
    pub fn seed<I>(&self, entries: I) -> bool
    where
        I: IntoIterator<Item = (String, bool)>,
    {
        let mut inner = self.inner.lock();
        if inner.seeded {
            return false;
        }
        inner.states.extend(entries);
        inner.seeded = true;
        debug!(entries = inner.states.len(), "visibility_seeded");
        true
    }

    /// Whether [`Self::seed`] has run.
    pub fn is_seeded(&self) -> bool {
        self.inner.lock().seeded
    }

    /// Flip the entry for `id` and return its new value.
    ///
    /// An absent entry reads as visible, so the first toggle hides it.
    pub fn toggle(&self, id: &str) -> bool {
        let mut inner = self.inner.lock();
        let next = !inner.states.get(id).copied().unwrap_or(true);
        inner.states.insert(id.to_string(), next);
        trace!(id, visible = next, "visibility_toggle");
        next
    }

    /// Current value for `id`, defaulting to visible.
    pub fn get(&self, id: &str) -> bool {
        self.entry(id).unwrap_or(true)
    }

    /// Explicit entry for `id`, if any.
    pub fn entry(&self, id: &str) -> Option<bool> {
        self.inner.lock().states.get(id).copied()
    }

    /// Close `id` when it is explicitly open. Returns `true` if it was closed.
    pub fn close_if_open(&self, id: &str) -> bool {
        let mut inner = self.inner.lock();
        match inner.states.get_mut(id) {
            Some(open) if *open => {
                *open = false;
                trace!(id, "visibility_closed");
                true
            }
            _ => false,
        }
    }

    /// Explicit entries as a JSON object (exposed to bindings as `_drawer`).
    pub fn snapshot(&self) -> Map {
        self.inner
            .lock()
            .states
            .iter()
            .map(|(k, v)| (k.clone(), Value::Bool(*v)))
            .collect()
    }

    /// Record the declared state of `id` unless it already has an entry.
    ///
    /// Covers blocks first rendered after seeding, e.g. behind a condition
    /// that was false on the first pass. Returns `true` when inserted.
    pub fn declare(&self, id: &str, visible: bool) -> bool {
        let mut inner = self.inner.lock();
        if inner.states.contains_key(id) {
            return false;
        }
        inner.states.insert(id.to_string(), visible);
        debug!(id, visible, "visibility_declared");
        true
    }
}
