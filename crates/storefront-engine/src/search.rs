//! Shared search query with a cancellable debounce timer.

use std::{
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

use parking_lot::Mutex;
use tokio::{runtime::Handle, time};
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};

/// The single pending debounce timer.
struct Pending {
    /// Generation that armed this timer.
    generation: u64,
    /// Cancels the timer task.
    token: CancellationToken,
}

/// State shared between the handle and its timer tasks.
struct Inner {
    /// Query as typed so far.
    query: Mutex<String>,
    /// The pending timer, if any.
    pending: Mutex<Option<Pending>>,
    /// Monotonic arm counter.
    generation: AtomicU64,
    /// Quiet period before a debounced search fires.
    window: Duration,
    /// Runtime for timer tasks.
    runtime: Option<Handle>,
}

/// One query string plus at most one pending debounce timer per tree.
///
/// Cloning yields another handle to the same state.
#[derive(Clone)]
pub struct SearchState {
    /// Shared state.
    inner: Arc<Inner>,
}

impl SearchState {
    /// New state with the given debounce window, scheduling timers on `runtime`.
    pub fn new(window: Duration, runtime: Option<Handle>) -> Self {
        Self {
            inner: Arc::new(Inner {
                query: Mutex::new(String::new()),
                pending: Mutex::new(None),
                generation: AtomicU64::new(0),
                window,
                runtime,
            }),
        }
    }

    /// The current query.
    pub fn query(&self) -> String {
        self.inner.query.lock().clone()
    }

    /// Replace the query without touching the timer.
    pub fn set_query(&self, query: &str) {
        *self.inner.query.lock() = query.to_string();
    }

    /// Whether a debounce timer is pending.
    pub fn has_pending(&self) -> bool {
        self.inner.pending.lock().is_some()
    }

    /// Cancel the pending timer, if any. Returns `true` when one was cancelled.
    pub fn cancel_pending(&self) -> bool {
        match self.inner.pending.lock().take() {
            Some(p) => {
                p.token.cancel();
                trace!(generation = p.generation, "search_debounce_cancelled");
                true
            }
            None => false,
        }
    }

    /// Store `query` immediately and restart the debounce timer.
    ///
    /// Any earlier pending timer is cancelled. A timer is armed only for a
    /// non-blank query; when it elapses without being cancelled it calls
    /// `on_fire` with the query it was armed with. Returns `true` when a
    /// timer was armed.
    pub fn set_query_debounced<F>(&self, query: &str, on_fire: F) -> bool
    where
        F: FnOnce(String) + Send + 'static,
    {
        self.set_query(query);
        self.cancel_pending();
        if query.trim().is_empty() {
            return false;
        }
        let Some(runtime) = &self.inner.runtime else {
            warn!("no async runtime; debounced search not scheduled");
            return false;
        };

        let generation = self.inner.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let token = CancellationToken::new();
        let cancel = token.clone();
        let window = self.inner.window;
        let inner = Arc::clone(&self.inner);
        let query = query.to_string();

        // Hold the slot while spawning so the task cannot observe an empty slot.
        let mut slot = self.inner.pending.lock();
        runtime.spawn(async move {
            tokio::select! {
                _ = cancel.cancelled() => {}
                _ = time::sleep(window) => {
                    let mine = {
                        let mut pending = inner.pending.lock();
                        match pending.as_ref() {
                            Some(p) if p.generation == generation => {
                                *pending = None;
                                true
                            }
                            _ => false,
                        }
                    };
                    if mine {
                        debug!(%query, "search_debounce_fired");
                        on_fire(query);
                    }
                }
            }
        });
        *slot = Some(Pending { generation, token });
        trace!(generation, window_ms = window.as_millis(), "search_debounce_armed");
        true
    }

    /// Cancel any pending timer, then call `on_search` with the current query if it is not blank.
    ///
    /// Returns `true` when `on_search` ran.
    pub fn commit_now<F>(&self, on_search: F) -> bool
    where
        F: FnOnce(&str),
    {
        self.cancel_pending();
        let query = self.query();
        if query.trim().is_empty() {
            return false;
        }
        debug!(%query, "search_committed");
        on_search(&query);
        true
    }
}
