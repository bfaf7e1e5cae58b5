#![allow(dead_code)]

pub use filetrigger_test_utils::builders::WatchSpecBuilder;
pub use filetrigger_test_utils::fake_action::RecordingAction;
pub use filetrigger_test_utils::fake_probe::ScriptedProbe;
pub use filetrigger_test_utils::{init_tracing, wait_until, with_timeout};

use std::sync::Arc;
use std::time::Duration;

use filetrigger::config::WatchSpec;
use filetrigger::engine::{SessionState, SessionSummary, WatchSession};
use tokio::sync::{oneshot, watch};

/// Build a session wired to the given fakes, with a short drain timeout.
pub fn session_with(
    spec: WatchSpec,
    action: &RecordingAction,
    probe: &ScriptedProbe,
) -> WatchSession {
    WatchSession::new(spec, Some(Arc::new(action.clone())))
        .with_probe(Arc::new(probe.clone()))
        .with_drain_timeout(Duration::from_millis(500))
}

/// Block until the session reports `state`.
pub async fn wait_for_state(rx: &mut watch::Receiver<SessionState>, state: SessionState) {
    rx.wait_for(|s| *s == state)
        .await
        .expect("session state channel closed");
}

/// Run `session` while `drive` performs the test scenario; stop the session
/// once `drive` completes. `drive` is first polled after the session is
/// `Running`.
pub async fn run_scenario<Fut>(session: WatchSession, drive: Fut) -> SessionSummary
where
    Fut: std::future::Future<Output = ()>,
{
    let mut state_rx = session.subscribe();
    let (stop_tx, stop_rx) = oneshot::channel::<()>();

    let shutdown = async move {
        let _ = stop_rx.await;
    };

    let driver = async move {
        wait_for_state(&mut state_rx, SessionState::Running).await;
        drive.await;
        let _ = stop_tx.send(());
    };

    let (summary, ()) = with_timeout(async { tokio::join!(session.run(shutdown), driver) }).await;
    summary.expect("session failed to start")
}
