// src/exec/dispatcher.rs

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{error, info};

use crate::exec::action::Action;
use crate::watch::PathTranslator;

/// How a single dispatch ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    Success,
    Failure(String),
}

/// Result of invoking the action for one path. Logged, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchResult {
    pub path: PathBuf,
    pub outcome: DispatchOutcome,
}

impl DispatchResult {
    pub fn is_success(&self) -> bool {
        self.outcome == DispatchOutcome::Success
    }
}

/// Invokes the registered action with the translated path.
///
/// Action errors and panics are turned into `DispatchOutcome::Failure`; the
/// dispatcher itself never fails. No retries.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    action: Arc<dyn Action>,
    translator: PathTranslator,
}

impl Dispatcher {
    pub fn new(action: Arc<dyn Action>, translator: PathTranslator) -> Self {
        Self { action, translator }
    }

    pub async fn dispatch(&self, path: &Path) -> DispatchResult {
        let remote = self.translator.translate(path);
        info!(path = ?path, target = %remote, "starting action");

        // Run on its own task so a panicking action is contained.
        let action = Arc::clone(&self.action);
        let joined = tokio::spawn(async move { action.run(&remote).await }).await;

        let outcome = match joined {
            Ok(Ok(())) => DispatchOutcome::Success,
            Ok(Err(err)) => DispatchOutcome::Failure(format!("{err:#}")),
            Err(join_err) if join_err.is_panic() => {
                DispatchOutcome::Failure("action panicked".to_string())
            }
            Err(join_err) => DispatchOutcome::Failure(join_err.to_string()),
        };

        match &outcome {
            DispatchOutcome::Success => info!(path = ?path, "action succeeded"),
            DispatchOutcome::Failure(reason) => {
                error!(path = ?path, error = %reason, "action failed")
            }
        }

        DispatchResult {
            path: path.to_path_buf(),
            outcome,
        }
    }
}
