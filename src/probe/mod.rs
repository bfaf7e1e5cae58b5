// src/probe/mod.rs

//! "Is some process still holding this file open?"
//!
//! The debounce gate uses a [`HandleProbe`] as its completion signal. This is
//! a heuristic: a writer may close and reopen the file between probes.
//!
//! - [`ProcHandleProbe`] inspects `/proc/<pid>/fd` (Linux).
//! - [`NoopProbe`] always answers "not open"; used where no process table is
//!   available, which makes every file quiescent on first probe.

use std::fmt::Debug;
use std::path::Path;
use std::sync::Arc;

use tracing::warn;

use crate::types::ProbeMode;

pub mod procfs;

pub use procfs::{ProbeError, ProcHandleProbe};

/// Abstract open-handle inspection.
///
/// Implementations may block on filesystem IO; callers in async context run
/// them on the blocking pool.
pub trait HandleProbe: Send + Sync + Debug {
    /// True if any process currently holds `path` open.
    fn is_open_for_write(&self, path: &Path) -> bool;
}

/// Probe that never finds an open handle.
#[derive(Debug, Clone, Default)]
pub struct NoopProbe;

impl HandleProbe for NoopProbe {
    fn is_open_for_write(&self, _path: &Path) -> bool {
        false
    }
}

/// Pick the best probe for this platform.
pub fn default_probe(mode: ProbeMode) -> Arc<dyn HandleProbe> {
    if cfg!(target_os = "linux") {
        Arc::new(ProcHandleProbe::new(mode))
    } else {
        warn!(
            platform = std::env::consts::OS,
            "open-handle probing is not supported on this platform: debounce is DISABLED and \
             files are dispatched as soon as they appear, possibly while still being written"
        );
        Arc::new(NoopProbe)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noop_probe_never_holds() {
        assert!(!NoopProbe.is_open_for_write(Path::new("/anything")));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn linux_uses_proc_probe() {
        let probe = default_probe(ProbeMode::WritersOnly);
        let shown = format!("{probe:?}");
        assert!(shown.contains("ProcHandleProbe"), "{shown}");
        assert!(shown.contains("WritersOnly"), "{shown}");
    }

    #[cfg(not(target_os = "linux"))]
    #[test]
    fn other_platforms_fall_back_to_noop() {
        let probe = default_probe(ProbeMode::AnyHandle);
        assert_eq!(format!("{probe:?}"), "NoopProbe");
    }
}
