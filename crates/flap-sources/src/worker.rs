#![forbid(unsafe_code)]

//! Background polling worker with a single-slot handoff.
//!
//! The worker owns a thread that periodically calls a [`PageSource`] and
//! publishes each successful result into a shared slot. The board side
//! holds a [`WorkerFeed`] whose [`ContentFeed::poll`] takes the slot
//! contents without ever blocking the frame loop — if the worker happens
//! to hold the lock, the poll simply returns `None` and the next tick
//! tries again.
//!
//! # Invariants
//!
//! 1. Only the most recent successful fetch is retained; stale results are
//!    overwritten, never queued.
//! 2. A failed fetch leaves the slot untouched (logged, not propagated).
//! 3. Dropping the worker stops and joins the thread; shutdown latency is
//!    bounded by the sleep slice, not the poll period.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use flap_core::ContentFeed;
use tracing::{debug, warn};

use crate::PageSource;

/// Sleep granularity between stop-flag checks.
const SLEEP_SLICE: Duration = Duration::from_millis(25);

type Slot = Arc<Mutex<Option<Vec<String>>>>;

/// Owns the polling thread; dropping it shuts the thread down.
pub struct SourceWorker {
    slot: Slot,
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl SourceWorker {
    /// Spawn a worker that fetches from `source` every `period`.
    ///
    /// The first fetch happens immediately so the board has content well
    /// before the first period elapses.
    pub fn spawn(mut source: Box<dyn PageSource>, period: Duration) -> std::io::Result<Self> {
        let slot: Slot = Arc::new(Mutex::new(None));
        let stop = Arc::new(AtomicBool::new(false));
        let thread_slot = slot.clone();
        let thread_stop = stop.clone();

        let handle = thread::Builder::new()
            .name("flap-source".to_string())
            .spawn(move || {
                loop {
                    match source.next_pages() {
                        Ok(pages) => {
                            debug!(source = source.name(), lines = pages.len(), "fetched pages");
                            publish(&thread_slot, pages);
                        }
                        Err(err) => {
                            warn!(source = source.name(), error = %err, "content fetch failed");
                        }
                    }
                    // Sleep in slices so drop() never waits a full period.
                    let mut slept = Duration::ZERO;
                    while slept < period {
                        if thread_stop.load(Ordering::Relaxed) {
                            return;
                        }
                        let slice = SLEEP_SLICE.min(period - slept);
                        thread::sleep(slice);
                        slept += slice;
                    }
                    if thread_stop.load(Ordering::Relaxed) {
                        return;
                    }
                }
            })?;

        Ok(Self {
            slot,
            stop,
            handle: Some(handle),
        })
    }

    /// A board-side handle implementing [`ContentFeed`].
    #[must_use]
    pub fn feed(&self) -> WorkerFeed {
        WorkerFeed {
            slot: self.slot.clone(),
        }
    }
}

impl Drop for SourceWorker {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

/// The consumer end of the handoff slot.
#[derive(Debug, Clone)]
pub struct WorkerFeed {
    slot: Slot,
}

impl ContentFeed for WorkerFeed {
    fn poll(&mut self) -> Option<Vec<String>> {
        // try_lock: a held lock means the worker is publishing right now;
        // the content will be there next tick.
        self.slot.try_lock().ok().and_then(|mut guard| guard.take())
    }
}

/// Overwrite the slot with the freshest result.
fn publish(slot: &Slot, pages: Vec<String>) {
    let mut guard = slot.lock().unwrap_or_else(PoisonError::into_inner);
    *guard = Some(pages);
}
