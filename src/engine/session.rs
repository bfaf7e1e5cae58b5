// src/engine/session.rs

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

use crate::config::WatchSpec;
use crate::engine::debounce::{DebounceGate, GateOutcome, PendingDispatch};
use crate::engine::{PathOutcome, SessionState, SessionSummary};
use crate::errors::{FileTriggerError, Result};
use crate::exec::{resolve_action, Action, DispatchOutcome, Dispatcher};
use crate::probe::{default_probe, HandleProbe};
use crate::watch::{spawn_watcher, EventFilter, PathTranslator, RawEvent};

/// How long `Stopping` waits for in-flight paths before aborting them.
pub const DEFAULT_DRAIN_TIMEOUT: Duration = Duration::from_secs(2);

/// Report from a per-path task back to the session loop. `id` tells a
/// path's current task apart from an earlier one still dispatching.
#[derive(Debug)]
enum TaskReport {
    /// The gate let the file through. A later `Created` for the same path
    /// starts a new wait.
    Released { path: PathBuf, id: u64 },
    Finished {
        path: PathBuf,
        id: u64,
        outcome: PathOutcome,
    },
}

/// Reports the path's completion when dropped, so the session loop learns
/// about it even if the task panics or is aborted.
struct InFlightGuard {
    path: PathBuf,
    id: u64,
    outcome: PathOutcome,
    done_tx: mpsc::UnboundedSender<TaskReport>,
}

impl InFlightGuard {
    fn release(&self) {
        let _ = self.done_tx.send(TaskReport::Released {
            path: self.path.clone(),
            id: self.id,
        });
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        let _ = self.done_tx.send(TaskReport::Finished {
            path: std::mem::take(&mut self.path),
            id: self.id,
            outcome: self.outcome.clone(),
        });
    }
}

/// Top-level orchestrator: directory bootstrap, notify subscription, and the
/// filter → debounce → dispatch pipeline.
///
/// `run` consumes the session, so a stopped session cannot be restarted.
pub struct WatchSession {
    spec: WatchSpec,
    action: Arc<dyn Action>,
    probe: Arc<dyn HandleProbe>,
    drain_timeout: Duration,
    state_tx: watch::Sender<SessionState>,
}

impl fmt::Debug for WatchSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WatchSession")
            .field("spec", &self.spec)
            .field("action", &self.action)
            .field("state", &*self.state_tx.borrow())
            .finish_non_exhaustive()
    }
}

impl WatchSession {
    /// Build a session. `action = None` resolves to the configured command,
    /// or to logging the path when no command is configured.
    pub fn new(spec: WatchSpec, action: Option<Arc<dyn Action>>) -> Self {
        let action = resolve_action(&spec, action);
        let probe = default_probe(spec.probe_mode());
        let (state_tx, _) = watch::channel(SessionState::Created);
        Self {
            spec,
            action,
            probe,
            drain_timeout: DEFAULT_DRAIN_TIMEOUT,
            state_tx,
        }
    }

    /// Replace the open-handle probe.
    pub fn with_probe(mut self, probe: Arc<dyn HandleProbe>) -> Self {
        self.probe = probe;
        self
    }

    pub fn with_drain_timeout(mut self, drain_timeout: Duration) -> Self {
        self.drain_timeout = drain_timeout;
        self
    }

    pub fn spec(&self) -> &WatchSpec {
        &self.spec
    }

    /// Observe state transitions.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state_tx.subscribe()
    }

    fn set_state(&self, state: SessionState) {
        info!(?state, "session state");
        self.state_tx.send_replace(state);
    }

    /// Run until `shutdown` resolves.
    ///
    /// Fails only at startup: when the watch directory cannot be created or
    /// the notify subscription cannot be started. Per-file failures are logged
    /// and counted in the returned summary.
    pub async fn run<S>(self, shutdown: S) -> Result<SessionSummary>
    where
        S: Future<Output = ()>,
    {
        self.set_state(SessionState::Starting);

        let (spec, filter) = match self.prepare() {
            Ok(prepared) => prepared,
            Err(err) => {
                self.set_state(SessionState::Stopped);
                return Err(err);
            }
        };

        let (raw_tx, raw_rx) = mpsc::unbounded_channel::<RawEvent>();
        let watcher = match spawn_watcher(spec.directory(), raw_tx) {
            Ok(w) => w,
            Err(err) => {
                error!(dir = ?spec.directory(), error = %err, "failed to start file watcher");
                self.set_state(SessionState::Stopped);
                return Err(err);
            }
        };

        info!(dir = ?spec.directory(), patterns = ?spec.patterns(), "monitoring");

        let gate = DebounceGate::new(
            Arc::clone(&self.probe),
            spec.poll_interval(),
            spec.max_wait(),
        );
        let dispatcher = Dispatcher::new(
            Arc::clone(&self.action),
            PathTranslator::new(spec.path_style()),
        );

        let mut pipeline = Pipeline::new(filter, gate, dispatcher);

        self.set_state(SessionState::Running);
        pipeline.run_until(raw_rx, shutdown).await;

        self.set_state(SessionState::Stopping);
        drop(watcher);
        let summary = pipeline.drain(self.drain_timeout).await;

        self.set_state(SessionState::Stopped);
        info!(?summary, "watcher stopped");
        Ok(summary)
    }

    /// `Starting`: make sure the directory exists, canonicalize it, and build
    /// the filter against the canonical root.
    fn prepare(&self) -> Result<(WatchSpec, EventFilter)> {
        let dir = self.spec.directory();
        if !dir.is_dir() {
            info!(dir = ?dir, "watch directory does not exist; creating it");
            std::fs::create_dir_all(dir).map_err(|e| {
                FileTriggerError::ConfigError(format!(
                    "cannot create watch directory {}: {e}",
                    dir.display()
                ))
            })?;
            info!(dir = ?dir, "watch directory created");
        }

        let canonical = dir.canonicalize().unwrap_or_else(|_| dir.to_path_buf());
        let spec = self.spec.clone().with_directory(canonical);
        let filter = EventFilter::from_spec(&spec)?;
        Ok((spec, filter))
    }
}

/// The running half of a session: owns the in-flight map and the per-path
/// tasks. Only the session loop touches it, so no locking is needed.
///
/// A path is in flight from its first accepted `Created` until its gate
/// releases it (or the task ends without dispatching).
struct Pipeline {
    filter: EventFilter,
    gate: DebounceGate,
    dispatcher: Dispatcher,
    in_flight: HashMap<PathBuf, u64>,
    next_id: u64,
    tasks: JoinSet<()>,
    cancel_tx: watch::Sender<bool>,
    done_tx: mpsc::UnboundedSender<TaskReport>,
    done_rx: mpsc::UnboundedReceiver<TaskReport>,
    summary: SessionSummary,
}

impl Pipeline {
    fn new(filter: EventFilter, gate: DebounceGate, dispatcher: Dispatcher) -> Self {
        let (cancel_tx, _) = watch::channel(false);
        let (done_tx, done_rx) = mpsc::unbounded_channel();
        Self {
            filter,
            gate,
            dispatcher,
            in_flight: HashMap::new(),
            next_id: 0,
            tasks: JoinSet::new(),
            cancel_tx,
            done_tx,
            done_rx,
            summary: SessionSummary::default(),
        }
    }

    async fn run_until<S>(&mut self, mut raw_rx: mpsc::UnboundedReceiver<RawEvent>, shutdown: S)
    where
        S: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                biased;

                _ = &mut shutdown => {
                    info!("stop requested");
                    break;
                }

                Some(report) = self.done_rx.recv() => {
                    self.on_report(report);
                }

                Some(res) = self.tasks.join_next(), if !self.tasks.is_empty() => {
                    if let Err(err) = res {
                        warn!(error = %err, "path task ended abnormally");
                    }
                }

                event = raw_rx.recv() => match event {
                    Some(event) => self.on_event(event),
                    None => {
                        warn!("file watcher channel closed");
                        break;
                    }
                },
            }
        }
    }

    fn on_event(&mut self, event: RawEvent) {
        let Some(path) = self.filter.accept(&event) else {
            return;
        };

        if self.in_flight.contains_key(&path) {
            debug!(path = ?path, "already pending; coalescing duplicate event");
            self.summary.coalesced += 1;
            return;
        }

        let id = self.next_id;
        self.next_id += 1;
        self.in_flight.insert(path.clone(), id);
        self.spawn_path_task(path, id);
    }

    fn spawn_path_task(&mut self, path: PathBuf, id: u64) {
        let gate = self.gate.clone();
        let dispatcher = self.dispatcher.clone();
        let mut cancel = self.cancel_tx.subscribe();
        let mut guard = InFlightGuard {
            path: path.clone(),
            id,
            outcome: PathOutcome::Lost,
            done_tx: self.done_tx.clone(),
        };

        self.tasks.spawn(async move {
            let pending = PendingDispatch::new(path);
            guard.outcome = match gate.await_quiescent(&pending, &mut cancel).await {
                GateOutcome::Quiescent => {
                    guard.release();
                    let result = dispatcher.dispatch(&pending.path).await;
                    PathOutcome::Dispatched(result.outcome)
                }
                GateOutcome::TimedOut => PathOutcome::TimedOut,
                GateOutcome::Cancelled => PathOutcome::Cancelled,
            };
        });
    }

    fn on_report(&mut self, report: TaskReport) {
        match report {
            TaskReport::Released { path, id } => {
                self.release(&path, id);
                debug!(path = ?path, "released for dispatch");
            }
            TaskReport::Finished { path, id, outcome } => {
                self.release(&path, id);
                debug!(path = ?path, ?outcome, "path finished");
                self.summary.record(&outcome);
            }
        }
    }

    /// Forget `path` unless a newer task already owns it.
    fn release(&mut self, path: &Path, id: u64) {
        if self.in_flight.get(path) == Some(&id) {
            self.in_flight.remove(path);
        }
    }

    /// `Stopping`: raise the cancel flag, give in-flight paths a chance to
    /// finish, then abort whatever is left.
    async fn drain(mut self, drain_timeout: Duration) -> SessionSummary {
        self.cancel_tx.send_replace(true);

        if !self.tasks.is_empty() {
            info!(pending = self.tasks.len(), "waiting for in-flight files");
            let tasks = &mut self.tasks;
            let drained = tokio::time::timeout(drain_timeout, async {
                while tasks.join_next().await.is_some() {}
            })
            .await;

            if drained.is_err() {
                warn!(pending = self.tasks.len(), "drain timed out; abandoning in-flight files");
                self.tasks.shutdown().await;
            }
        }

        while let Ok(report) = self.done_rx.try_recv() {
            self.on_report(report);
        }

        self.summary
    }
}
