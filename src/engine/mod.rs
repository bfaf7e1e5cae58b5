// src/engine/mod.rs

//! Change-detection and debounce engine.
//!
//! Data flows one way:
//! raw event → [`crate::watch::EventFilter`] → [`DebounceGate`] →
//! [`crate::exec::Dispatcher`] → action.
//!
//! [`WatchSession`] owns the notify subscription and a single event loop. Each
//! accepted path gets its own task that waits for quiescence and then
//! dispatches; tasks never share mutable state. The loop alone tracks which
//! paths are waiting, so at most one debounce wait per path runs at a time.
//! Once a wait ends in dispatch the path is free again: a file re-created
//! while its previous action still runs gets its own dispatch.

use crate::exec::DispatchOutcome;

/// Lifecycle of a [`WatchSession`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Created,
    Starting,
    Running,
    Stopping,
    /// Terminal.
    Stopped,
}

/// How one path's pipeline ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathOutcome {
    Dispatched(DispatchOutcome),
    TimedOut,
    Cancelled,
    /// The task was aborted or panicked before reporting.
    Lost,
}

/// Counters reported when a session stops.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionSummary {
    pub dispatched: usize,
    pub failed: usize,
    pub abandoned: usize,
    pub cancelled: usize,
    pub lost: usize,
    /// Created events for a path that already had a pending dispatch.
    pub coalesced: usize,
}

impl SessionSummary {
    pub fn record(&mut self, outcome: &PathOutcome) {
        match outcome {
            PathOutcome::Dispatched(DispatchOutcome::Success) => self.dispatched += 1,
            PathOutcome::Dispatched(DispatchOutcome::Failure(_)) => self.failed += 1,
            PathOutcome::TimedOut => self.abandoned += 1,
            PathOutcome::Cancelled => self.cancelled += 1,
            PathOutcome::Lost => self.lost += 1,
        }
    }
}

pub mod debounce;
pub mod session;

pub use debounce::{DebounceGate, GateOutcome, PendingDispatch};
pub use session::{WatchSession, DEFAULT_DRAIN_TIMEOUT};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_counts_each_outcome() {
        let mut s = SessionSummary::default();
        s.record(&PathOutcome::Dispatched(DispatchOutcome::Success));
        s.record(&PathOutcome::Dispatched(DispatchOutcome::Failure("x".into())));
        s.record(&PathOutcome::TimedOut);
        s.record(&PathOutcome::Cancelled);
        s.record(&PathOutcome::Lost);
        assert_eq!(
            s,
            SessionSummary {
                dispatched: 1,
                failed: 1,
                abandoned: 1,
                cancelled: 1,
                lost: 1,
                coalesced: 0,
            }
        );
    }
}
