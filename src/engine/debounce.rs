// src/engine/debounce.rs

//! Per-path quiescence wait.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::watch;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::probe::HandleProbe;

/// How a debounce wait ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateOutcome {
    /// No process holds the file; dispatch may proceed.
    Quiescent,
    /// `max_wait` elapsed with the file still held open.
    TimedOut,
    /// The session is stopping.
    Cancelled,
}

/// A path waiting for quiescence. Owned by that path's debounce task.
#[derive(Debug, Clone)]
pub struct PendingDispatch {
    pub path: PathBuf,
    pub first_seen: Instant,
}

impl PendingDispatch {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            first_seen: Instant::now(),
        }
    }
}

/// Polls the probe with a flat delay until the file is no longer held open.
#[derive(Debug, Clone)]
pub struct DebounceGate {
    probe: Arc<dyn HandleProbe>,
    poll_interval: Duration,
    max_wait: Option<Duration>,
}

impl DebounceGate {
    pub fn new(
        probe: Arc<dyn HandleProbe>,
        poll_interval: Duration,
        max_wait: Option<Duration>,
    ) -> Self {
        Self {
            probe,
            poll_interval,
            max_wait,
        }
    }

    /// Wait until `pending.path` is quiescent, `max_wait` elapses, or
    /// `cancel` flips to `true`.
    ///
    /// The first probe happens immediately; a file nobody holds is quiescent
    /// without any delay. The cancel flag is checked before every probe and
    /// interrupts the sleep between probes.
    pub async fn await_quiescent(
        &self,
        pending: &PendingDispatch,
        cancel: &mut watch::Receiver<bool>,
    ) -> GateOutcome {
        let path = pending.path.as_path();
        let mut probes: u32 = 0;

        loop {
            if *cancel.borrow() {
                debug!(path = ?path, probes, "debounce cancelled");
                return GateOutcome::Cancelled;
            }

            probes += 1;
            if !self.probe_once(path).await {
                debug!(
                    path = ?path,
                    probes,
                    waited = ?pending.first_seen.elapsed(),
                    "file is quiescent"
                );
                return GateOutcome::Quiescent;
            }

            // Never sleep past the deadline; the last probe lands on it.
            let mut nap = self.poll_interval;
            if let Some(max) = self.max_wait {
                let waited = pending.first_seen.elapsed();
                if waited >= max {
                    warn!(path = ?path, probes, ?waited, "file still open after max wait; abandoning");
                    return GateOutcome::TimedOut;
                }
                nap = nap.min(max - waited);
            }

            info!(path = ?path, "waiting for file to be closed");

            tokio::select! {
                _ = sleep(nap) => {}
                changed = cancel.changed() => {
                    // A dropped sender means the session is gone.
                    if changed.is_err() || *cancel.borrow() {
                        debug!(path = ?path, probes, "debounce cancelled while waiting");
                        return GateOutcome::Cancelled;
                    }
                }
            }
        }
    }

    /// Run one probe on the blocking pool. A probe that panics counts as
    /// "not held".
    async fn probe_once(&self, path: &Path) -> bool {
        let probe = Arc::clone(&self.probe);
        let owned = path.to_path_buf();
        match tokio::task::spawn_blocking(move || probe.is_open_for_write(&owned)).await {
            Ok(held) => held,
            Err(err) => {
                warn!(path = ?path, error = %err, "handle probe failed; treating file as closed");
                false
            }
        }
    }
}
