//! Carousel instance lifetime across render passes.
//!
//! A carousel rendered in a pass is mounted (created on first sight, then
//! refreshed); one that a pass no longer renders is unmounted, which stops
//! its autoplay timer and removes its registry entries.

use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
    time::Duration,
};

use parking_lot::Mutex;
use schema::CarouselOptions;
use tracing::debug;

use crate::{
    carousel::CarouselHandle,
    diagnostics::{DiagnosticKind, Diagnostics},
    host::Host,
    registry::{CarouselRegistry, DEFAULT_CAROUSEL_KEY},
    ticker::Ticker,
};

/// A mounted carousel.
#[derive(Debug)]
struct Instance {
    /// The live instance.
    handle: CarouselHandle,
    /// Every registry key this instance was registered under.
    keys: Vec<String>,
    /// Mount sequence number.
    order: u64,
}

/// State guarded by the mount lock.
#[derive(Debug, Default)]
struct Inner {
    /// Mounted instances by instance key.
    mounted: HashMap<String, Instance>,
    /// Next mount sequence number.
    next_order: u64,
}

/// Collaborators a mount needs.
pub(crate) struct MountCx<'a> {
    /// Registry the instance is addressed through.
    pub registry: &'a CarouselRegistry,
    /// Autoplay timers.
    pub ticker: &'a Ticker,
    /// Host asked to re-render after an autoplay step.
    pub host: &'a Arc<dyn Host>,
    /// Diagnostics for the current pass.
    pub diag: &'a mut Diagnostics,
}

/// Mounted carousels of one render tree.
#[derive(Debug, Default)]
pub(crate) struct Instances {
    /// Guarded state.
    inner: Mutex<Inner>,
}

impl Instances {
    /// Mount or refresh the carousel with instance key `key`.
    ///
    /// Registers it under its own key, under the default sentinel when no
    /// default exists, and under `section` when rendered inside one. Returns
    /// the handle and whether it was newly created.
    pub(crate) fn mount(
        &self,
        key: &str,
        options: &CarouselOptions,
        slides: usize,
        section: Option<&str>,
        cx: MountCx<'_>,
    ) -> (CarouselHandle, bool) {
        let mut inner = self.inner.lock();
        let order = inner.next_order;
        let mut created = false;
        let instance = inner.mounted.entry(key.to_string()).or_insert_with(|| {
            created = true;
            Instance {
                handle: CarouselHandle::new(key, slides, options.looped),
                keys: Vec::new(),
                order,
            }
        });
        let handle = instance.handle.clone();
        handle.configure(slides, options.looped, options.autoplay);

        cx.registry.register(key, &handle);
        push_unique(&mut instance.keys, key);
        if cx.registry.register_default(&handle) {
            push_unique(&mut instance.keys, DEFAULT_CAROUSEL_KEY);
        }
        if let Some(section) = section.filter(|s| *s != key) {
            cx.registry.register(section, &handle);
            push_unique(&mut instance.keys, section);
        }
        if created {
            inner.next_order += 1;
            debug!(key, slides, section, "carousel_mounted");
        }

        match options.autoplay {
            Some(autoplay) if slides > 1 => {
                if !cx.ticker.is_active(key) {
                    let delay = Duration::from_millis(autoplay.delay_ms.max(1));
                    let tick_handle = handle.clone();
                    let host = Arc::clone(cx.host);
                    let started = cx.ticker.start(key, delay, delay, move || {
                        if tick_handle.autoplay_tick() {
                            host.request_render();
                        }
                    });
                    if !started && created {
                        cx.diag.push(
                            DiagnosticKind::NoRuntime,
                            format!("no async runtime; autoplay for carousel `{key}` not scheduled"),
                        );
                    }
                }
            }
            _ => cx.ticker.stop(key),
        }
        (handle, created)
    }

    /// Unmount every instance whose key is not in `seen`, then make sure the
    /// default sentinel points at a live instance when any remain.
    pub(crate) fn retain(&self, seen: &HashSet<String>, registry: &CarouselRegistry, ticker: &Ticker) {
        let mut inner = self.inner.lock();
        let gone: Vec<String> = inner
            .mounted
            .keys()
            .filter(|k| !seen.contains(*k))
            .cloned()
            .collect();
        for key in gone {
            if let Some(instance) = inner.mounted.remove(&key) {
                unmount(&key, &instance, registry, ticker);
            }
        }
        if registry.get(DEFAULT_CAROUSEL_KEY).is_none()
            && let Some(first) = inner.mounted.values_mut().min_by_key(|i| i.order)
            && registry.register_default(&first.handle)
        {
            push_unique(&mut first.keys, DEFAULT_CAROUSEL_KEY);
        }
    }

    /// Unmount everything.
    pub(crate) fn clear(&self, registry: &CarouselRegistry, ticker: &Ticker) {
        let mut inner = self.inner.lock();
        for (key, instance) in inner.mounted.drain() {
            unmount(&key, &instance, registry, ticker);
        }
    }

    /// Number of mounted instances.
    pub(crate) fn len(&self) -> usize {
        self.inner.lock().mounted.len()
    }
}

/// Append `key` unless present.
fn push_unique(keys: &mut Vec<String>, key: &str) {
    if !keys.iter().any(|k| k == key) {
        keys.push(key.to_string());
    }
}

/// Stop the timer and drop the registry entries still pointing at `instance`.
fn unmount(key: &str, instance: &Instance, registry: &CarouselRegistry, ticker: &Ticker) {
    ticker.stop(key);
    for k in &instance.keys {
        registry.unregister(k, &instance.handle);
    }
    debug!(key, "carousel_unmounted");
}
