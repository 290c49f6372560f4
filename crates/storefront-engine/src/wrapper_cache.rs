use std::{num::NonZeroUsize, sync::Arc};

use lru::LruCache;
use parking_lot::Mutex;
use schema::{ParsedWrapper, parse_wrapper};

/// Thread-safe, size-bounded cache of parsed wrapper strings.
pub(crate) struct WrapperCache {
    /// Wrapper text to parse result.
    map: Mutex<LruCache<String, Arc<ParsedWrapper>>>,
}

impl WrapperCache {
    /// Create a cache holding at most `capacity` entries.
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        let cap = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            map: Mutex::new(LruCache::new(cap)),
        }
    }

    /// Parsed form of `wrapper`, parsing and caching on miss.
    pub(crate) fn get_or_parse(&self, wrapper: &str) -> Arc<ParsedWrapper> {
        if let Some(found) = self.map.lock().get(wrapper).cloned() {
            return found;
        }
        let parsed = Arc::new(parse_wrapper(wrapper));
        self.map.lock().put(wrapper.to_string(), parsed.clone());
        parsed
    }

    /// Number of cached entries.
    pub(crate) fn len(&self) -> usize {
        self.map.lock().len()
    }
}
