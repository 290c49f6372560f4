//! Live carousel instances: slide position, wraparound and autoplay gating.

use std::{fmt, sync::Arc};

use parking_lot::Mutex;
use schema::Autoplay;
use tokio::sync::watch;
use tracing::trace;

/// Slide position and autoplay flags.
#[derive(Debug, Clone, Copy, Default)]
struct SlideState {
    /// Active slide.
    active: usize,
    /// Number of slides.
    slides: usize,
    /// Wrap around at the ends.
    looped: bool,
    /// Pointer currently over the carousel.
    hovered: bool,
    /// Autoplay pauses while hovered.
    pause_on_hover: bool,
    /// A manual interaction stops autoplay for good.
    disable_on_interaction: bool,
    /// Autoplay was stopped by an interaction.
    autoplay_stopped: bool,
}

/// Shared instance state.
struct Inner {
    /// Instance key.
    id: String,
    /// Guarded slide state.
    state: Mutex<SlideState>,
    /// Publishes the active index on every change.
    changes: watch::Sender<usize>,
}

/// Addressable control surface of one carousel instance.
///
/// Handles are cheap to clone; clones refer to the same instance. Identity
/// (not key) decides whether a registry entry still points at an instance.
#[derive(Clone)]
pub struct CarouselHandle {
    /// Shared instance.
    inner: Arc<Inner>,
}

impl fmt::Debug for CarouselHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = *self.inner.state.lock();
        f.debug_struct("CarouselHandle")
            .field("id", &self.inner.id)
            .field("active", &s.active)
            .field("slides", &s.slides)
            .finish()
    }
}

impl CarouselHandle {
    /// A new instance with `slides` slides, starting at slide 0.
    pub fn new(id: impl Into<String>, slides: usize, looped: bool) -> Self {
        let (changes, _) = watch::channel(0);
        Self {
            inner: Arc::new(Inner {
                id: id.into(),
                state: Mutex::new(SlideState {
                    slides,
                    looped,
                    ..SlideState::default()
                }),
                changes,
            }),
        }
    }

    /// Instance key.
    pub fn id(&self) -> &str {
        &self.inner.id
    }

    /// Active slide index.
    pub fn active_index(&self) -> usize {
        self.inner.state.lock().active
    }

    /// Number of slides.
    pub fn slide_count(&self) -> usize {
        self.inner.state.lock().slides
    }

    /// Whether autoplay was stopped by a manual interaction.
    pub fn autoplay_stopped(&self) -> bool {
        self.inner.state.lock().autoplay_stopped
    }

    /// Whether the pointer is over the carousel.
    pub fn is_hovered(&self) -> bool {
        self.inner.state.lock().hovered
    }

    /// Same instance.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Receive the active index on every change.
    pub fn subscribe(&self) -> watch::Receiver<usize> {
        self.inner.changes.subscribe()
    }

    /// Apply `f` to the state; publish and return the active index.
    fn update(&self, manual: bool, f: impl FnOnce(&mut SlideState)) -> usize {
        let (before, after) = {
            let mut s = self.inner.state.lock();
            let before = s.active;
            f(&mut s);
            if manual && s.disable_on_interaction {
                s.autoplay_stopped = true;
            }
            (before, s.active)
        };
        if before != after {
            trace!(carousel = %self.inner.id, from = before, to = after, "slide_change");
            self.inner.changes.send_replace(after);
        }
        after
    }

    /// Advance one slide; wraps when looped, otherwise stops at the last slide.
    pub fn next(&self) -> usize {
        self.update(true, |s| {
            if s.slides == 0 {
                return;
            }
            if s.active + 1 < s.slides {
                s.active += 1;
            } else if s.looped {
                s.active = 0;
            }
        })
    }

    /// Go back one slide; wraps when looped, otherwise stops at the first slide.
    pub fn prev(&self) -> usize {
        self.update(true, |s| {
            if s.slides == 0 {
                return;
            }
            if s.active > 0 {
                s.active -= 1;
            } else if s.looped {
                s.active = s.slides - 1;
            }
        })
    }

    /// Jump to `index`, clamped to the last slide.
    pub fn goto(&self, index: usize) -> usize {
        self.update(true, |s| {
            if s.slides > 0 {
                s.active = index.min(s.slides - 1);
            }
        })
    }

    /// Refresh slide count and options from the latest render pass.
    pub(crate) fn configure(&self, slides: usize, looped: bool, autoplay: Option<Autoplay>) {
        self.update(false, |s| {
            s.slides = slides;
            s.looped = looped;
            s.pause_on_hover = autoplay.is_some_and(|a| a.pause_on_hover);
            s.disable_on_interaction = autoplay.is_some_and(|a| a.disable_on_interaction);
            if slides == 0 {
                s.active = 0;
            } else if s.active >= slides {
                s.active = slides - 1;
            }
        });
    }

    /// Record pointer enter/leave.
    pub(crate) fn set_hovered(&self, hovered: bool) {
        self.inner.state.lock().hovered = hovered;
    }

    /// One autoplay step. Always wraps to the first slide at the end.
    ///
    /// Returns `true` when the active slide changed.
    pub(crate) fn autoplay_tick(&self) -> bool {
        let paused = {
            let s = self.inner.state.lock();
            s.autoplay_stopped || (s.pause_on_hover && s.hovered) || s.slides < 2
        };
        if paused {
            return false;
        }
        let before = self.active_index();
        let after = self.update(false, |s| {
            s.active = (s.active + 1) % s.slides.max(1);
        });
        before != after
    }
}
