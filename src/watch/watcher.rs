// src/watch/watcher.rs

use std::path::PathBuf;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::errors::Result;
use crate::watch::event::{raw_events_from_notify, RawEvent};

/// Handle for the filesystem watcher.
///
/// Owns the underlying `RecommendedWatcher`. Dropping this handle stops the
/// subscription and closes the event channel.
pub struct WatcherHandle {
    _inner: RecommendedWatcher,
}

impl std::fmt::Debug for WatcherHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatcherHandle").finish()
    }
}

/// Subscribe recursively to `root` and forward every change as `RawEvent`s.
///
/// The notify callback runs on notify's own thread; it only converts and
/// forwards, so it never blocks on downstream work.
pub fn spawn_watcher(
    root: impl Into<PathBuf>,
    raw_tx: mpsc::UnboundedSender<RawEvent>,
) -> Result<WatcherHandle> {
    let root = root.into();

    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| match res {
            Ok(event) => {
                for raw in raw_events_from_notify(&event) {
                    if raw_tx.send(raw).is_err() {
                        // Session loop is gone; nothing left to deliver to.
                        return;
                    }
                }
            }
            Err(err) => {
                warn!(error = %err, "file watch error");
            }
        },
        Config::default(),
    )?;

    watcher.watch(&root, RecursiveMode::Recursive)?;

    info!(root = ?root, "file watcher started");

    Ok(WatcherHandle { _inner: watcher })
}
