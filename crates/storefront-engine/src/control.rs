//! Process-wide carousel control surface for host scripts outside any render tree.
//!
//! The slot is empty until a host explicitly installs the control of one
//! tree with [`install_global_control`]; nothing in the engine installs it
//! implicitly.

use std::{fmt, sync::Arc};

use once_cell::sync::OnceCell;
use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::{
    carousel::CarouselHandle,
    host::Host,
    registry::{CarouselRegistry, DEFAULT_CAROUSEL_KEY},
};

/// Drives named carousels of one render tree.
///
/// Names go through the registry's fallback chain, so `None` or an unknown
/// name reaches the most recently registered instance. Every method is a
/// no-op returning `None` when the tree has no carousels. A call that moves
/// the active slide asks the tree's host for a new render pass.
#[derive(Clone)]
pub struct CarouselControl {
    /// The tree's registry.
    registry: Arc<CarouselRegistry>,
    /// The tree's host, asked to re-render after a slide change.
    host: Arc<dyn Host>,
}

impl fmt::Debug for CarouselControl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CarouselControl")
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}

impl CarouselControl {
    /// Control over `registry`, reporting slide changes to `host`.
    pub fn new(registry: Arc<CarouselRegistry>, host: Arc<dyn Host>) -> Self {
        Self { registry, host }
    }

    /// Look `name` up through the fallback chain (default sentinel when `None`).
    fn find(&self, name: Option<&str>) -> Option<CarouselHandle> {
        self.registry
            .find(name.unwrap_or(DEFAULT_CAROUSEL_KEY))
    }

    /// Apply `op` to the named carousel; request a render when the slide moved.
    fn drive(
        &self,
        name: Option<&str>,
        op: impl FnOnce(&CarouselHandle) -> usize,
    ) -> Option<usize> {
        let handle = self.find(name)?;
        let before = handle.active_index();
        let after = op(&handle);
        if before != after {
            trace!(carousel = handle.id(), from = before, to = after, "external_slide_change");
            self.host.request_render();
        }
        Some(after)
    }

    /// Previous slide; returns the new active index.
    pub fn prev(&self, name: Option<&str>) -> Option<usize> {
        self.drive(name, CarouselHandle::prev)
    }

    /// Next slide; returns the new active index.
    pub fn next(&self, name: Option<&str>) -> Option<usize> {
        self.drive(name, CarouselHandle::next)
    }

    /// Jump to `index`; returns the new active index.
    pub fn goto(&self, index: usize, name: Option<&str>) -> Option<usize> {
        self.drive(name, |h| h.goto(index))
    }

    /// Exact lookup, without fallback.
    pub fn get(&self, name: &str) -> Option<CarouselHandle> {
        self.registry.get(name)
    }
}

/// The installed control, if any.
static GLOBAL: OnceCell<Mutex<Option<CarouselControl>>> = OnceCell::new();

/// Slot holding the installed control.
fn slot() -> &'static Mutex<Option<CarouselControl>> {
    GLOBAL.get_or_init(|| Mutex::new(None))
}

/// Make `control` reachable through [`global_control`], replacing any earlier one.
pub fn install_global_control(control: CarouselControl) {
    debug!("carousel_control_installed");
    *slot().lock() = Some(control);
}

/// Clear the process-wide slot. Returns the control that was installed.
pub fn uninstall_global_control() -> Option<CarouselControl> {
    debug!("carousel_control_uninstalled");
    slot().lock().take()
}

/// The installed control, if any.
pub fn global_control() -> Option<CarouselControl> {
    slot().lock().clone()
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::host::NoopHost;

    /// Counts render requests.
    #[derive(Default)]
    struct Renders(AtomicUsize);

    impl Host for Renders {
        fn request_render(&self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn control_drives_named_instances() {
        let registry = Arc::new(CarouselRegistry::new());
        let renders = Arc::new(Renders::default());
        let control = CarouselControl::new(registry.clone(), renders.clone());
        assert_eq!(control.next(None), None);

        let hero = CarouselHandle::new("hero", 4, false);
        let reviews = CarouselHandle::new("reviews", 2, true);
        registry.register("hero", &hero);
        registry.register_default(&hero);
        registry.register("reviews", &reviews);

        assert_eq!(control.next(None), Some(1));
        assert_eq!(control.next(Some("reviews")), Some(1));
        assert_eq!(control.next(Some("reviews")), Some(0));
        assert_eq!(control.goto(3, Some("hero")), Some(3));
        assert_eq!(renders.0.load(Ordering::SeqCst), 4);

        assert_eq!(control.goto(9, Some("hero")), Some(3));
        assert_eq!(renders.0.load(Ordering::SeqCst), 4);
        assert!(control.get("hero").unwrap().ptr_eq(&hero));
        assert!(control.get("her").is_none());
    }

    #[test]
    fn global_slot_is_explicit() {
        let registry = Arc::new(CarouselRegistry::new());
        install_global_control(CarouselControl::new(registry, Arc::new(NoopHost)));
        assert!(global_control().is_some());
        assert!(uninstall_global_control().is_some());
        assert!(global_control().is_none());
    }
}
