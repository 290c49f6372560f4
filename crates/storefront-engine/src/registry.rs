//! Tree-scoped registry addressing carousel instances by name.

use parking_lot::Mutex;
use tracing::debug;

use crate::carousel::CarouselHandle;

/// Key claimed by the first carousel when no default exists yet.
pub const DEFAULT_CAROUSEL_KEY: &str = "swiper";

/// Separator pairing `hero-1-swiper-main` with controls named `hero-1-...`.
pub const PAIRING_SEPARATOR: &str = "-swiper-";

/// Substring before the pairing separator, or the whole name.
fn pairing_prefix(name: &str) -> &str {
    name.split(PAIRING_SEPARATOR).next().unwrap_or(name)
}

/// Ordered key → instance map.
///
/// Keys keep their first insertion position when re-registered. Every
/// operation holds the lock for its whole read-modify-write.
#[derive(Debug, Default)]
pub struct CarouselRegistry {
    /// Entries in insertion order.
    entries: Mutex<Vec<(String, CarouselHandle)>>,
}

impl CarouselRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Point `key` at `handle`, replacing any earlier instance under that key.
    pub fn register(&self, key: &str, handle: &CarouselHandle) {
        let mut entries = self.entries.lock();
        match entries.iter_mut().find(|(k, _)| k == key) {
            Some(slot) => slot.1 = handle.clone(),
            None => entries.push((key.to_string(), handle.clone())),
        }
        debug!(key, carousel = handle.id(), "carousel_registered");
    }

    /// Claim the default key for `handle` unless some instance already holds it.
    pub fn register_default(&self, handle: &CarouselHandle) -> bool {
        let mut entries = self.entries.lock();
        if entries.iter().any(|(k, _)| k == DEFAULT_CAROUSEL_KEY) {
            return false;
        }
        entries.push((DEFAULT_CAROUSEL_KEY.to_string(), handle.clone()));
        debug!(carousel = handle.id(), "carousel_registered_default");
        true
    }

    /// Remove `key` only if it still points at `handle`.
    pub fn unregister(&self, key: &str, handle: &CarouselHandle) -> bool {
        let mut entries = self.entries.lock();
        let Some(pos) = entries
            .iter()
            .position(|(k, h)| k == key && h.ptr_eq(handle))
        else {
            return false;
        };
        entries.remove(pos);
        debug!(key, carousel = handle.id(), "carousel_unregistered");
        true
    }

    /// Exact lookup.
    pub fn get(&self, key: &str) -> Option<CarouselHandle> {
        self.entries
            .lock()
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, h)| h.clone())
    }

    /// Look up `target` through the fallback chain:
    ///
    /// 1. exact key;
    /// 2. first key containing `target`, or contained in it;
    /// 3. first key sharing the substring before `-swiper-` with `target`;
    /// 4. the most recently registered instance.
    pub fn find(&self, target: &str) -> Option<CarouselHandle> {
        let entries = self.entries.lock();
        if let Some((_, h)) = entries.iter().find(|(k, _)| k == target) {
            return Some(h.clone());
        }
        if let Some((_, h)) = entries
            .iter()
            .find(|(k, _)| k.contains(target) || target.contains(k.as_str()))
        {
            return Some(h.clone());
        }
        let wanted = pairing_prefix(target);
        if !wanted.is_empty()
            && let Some((_, h)) = entries
                .iter()
                .find(|(k, _)| pairing_prefix(k) == wanted)
        {
            return Some(h.clone());
        }
        entries.last().map(|(_, h)| h.clone())
    }

    /// Registered keys in order.
    pub fn keys(&self) -> Vec<String> {
        self.entries.lock().iter().map(|(k, _)| k.clone()).collect()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// No entries.
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}
