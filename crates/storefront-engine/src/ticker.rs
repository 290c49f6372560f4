//! Keyed interval timers with cancellation, used for carousel autoplay.
//!
//! Each ticker runs a callback after an initial delay and then on every
//! interval tick until stopped. Tasks are spawned on the runtime captured
//! when the render tree was created.

use std::{collections::HashMap, sync::Arc, time::Duration};

use parking_lot::Mutex;
use tokio::{
    runtime::Handle,
    task::JoinHandle,
    time::{self, MissedTickBehavior},
};
use tokio_util::sync::CancellationToken;
use tracing::trace;

/// Upper bound on waiting for a cancelled task in [`Ticker::clear_async`].
const STOP_WAIT_TIMEOUT_MS: u64 = 50;

/// One running ticker.
struct TickerEntry {
    /// Cancels the task.
    token: CancellationToken,
    /// The spawned task.
    handle: JoinHandle<()>,
}

/// Keyed ticker set. Starting a key that is already running replaces it.
#[derive(Clone)]
pub(crate) struct Ticker {
    /// Running tickers by key.
    entries: Arc<Mutex<HashMap<String, TickerEntry>>>,
    /// Runtime the tasks are spawned on.
    runtime: Option<Handle>,
}

impl Ticker {
    /// Ticker set spawning onto `runtime`. Without a runtime nothing is scheduled.
    pub(crate) fn new(runtime: Option<Handle>) -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
            runtime,
        }
    }

    /// Check if a ticker is active for the given id.
    pub(crate) fn is_active(&self, id: &str) -> bool {
        self.entries.lock().contains_key(id)
    }

    /// Start or replace the ticker for `id`. Returns `false` when no runtime is available.
    pub(crate) fn start<F>(&self, id: &str, initial: Duration, interval: Duration, mut on_tick: F) -> bool
    where
        F: FnMut() + Send + 'static,
    {
        let Some(runtime) = &self.runtime else {
            return false;
        };
        self.stop(id);

        let token = CancellationToken::new();
        let cancel = token.clone();
        let id_for_log = id.to_string();

        let fut = async move {
            trace!(ticker_start = %id_for_log, init_ms = initial.as_millis(), int_ms = interval.as_millis());

            tokio::select! {
                _ = time::sleep(initial) => {}
                _ = cancel.cancelled() => {
                    trace!(ticker_cancelled_initial = %id_for_log);
                    return;
                }
            }

            let mut ticker = time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                tokio::select! {
                    _ = cancel.cancelled() => {
                        trace!(ticker_cancelled = %id_for_log);
                        return;
                    }
                    _ = ticker.tick() => {
                        on_tick();
                    }
                }
            }
        };

        let handle = runtime.spawn(fut);
        self.entries
            .lock()
            .insert(id.to_string(), TickerEntry { token, handle });
        true
    }

    /// Stop a ticker if present (non-blocking).
    pub(crate) fn stop(&self, id: &str) {
        if let Some(entry) = self.entries.lock().remove(id) {
            entry.token.cancel();
            trace!(ticker_stop = %id);
        }
    }

    /// Cancel every ticker (non-blocking).
    pub(crate) fn clear(&self) {
        let entries: Vec<TickerEntry> = self.entries.lock().drain().map(|(_, e)| e).collect();
        for e in &entries {
            e.token.cancel();
        }
        trace!(count = entries.len(), "ticker_clear");
    }

    /// Cancel every ticker and wait briefly for the tasks to finish.
    pub(crate) async fn clear_async(&self) {
        let entries: Vec<TickerEntry> = self.entries.lock().drain().map(|(_, e)| e).collect();
        for e in &entries {
            e.token.cancel();
        }
        for e in entries {
            let _ignored =
                time::timeout(Duration::from_millis(STOP_WAIT_TIMEOUT_MS), e.handle).await;
        }
        trace!("ticker_clear_async");
    }
}
