use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::anyhow;
use filetrigger::exec::{Action, ActionFuture};

/// An action that:
/// - records every path it was invoked with
/// - fails for paths ending in any of the configured `fail_on` suffixes
/// - optionally takes `delay` to finish, like a slow upload.
#[derive(Debug, Clone, Default)]
pub struct RecordingAction {
    invoked: Arc<Mutex<Vec<String>>>,
    fail_on: Arc<Mutex<HashSet<String>>>,
    delay: Option<Duration>,
}

impl RecordingAction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on(self, suffix: &str) -> Self {
        self.fail_on.lock().unwrap().insert(suffix.to_string());
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn invoked(&self) -> Vec<String> {
        self.invoked.lock().unwrap().clone()
    }

    /// How many times the action ran for a path ending in `suffix`.
    pub fn count_ending_with(&self, suffix: &str) -> usize {
        self.invoked
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.ends_with(suffix))
            .count()
    }
}

impl Action for RecordingAction {
    fn run<'a>(&'a self, path: &'a str) -> ActionFuture<'a> {
        Box::pin(async move {
            self.invoked.lock().unwrap().push(path.to_string());

            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }

            let fails = self
                .fail_on
                .lock()
                .unwrap()
                .iter()
                .any(|s| path.ends_with(s.as_str()));
            if fails {
                return Err(anyhow!("simulated failure for {path}"));
            }
            Ok(())
        })
    }
}
