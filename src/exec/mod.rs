// src/exec/mod.rs

//! Action execution layer.
//!
//! - [`action`] defines the [`Action`] trait and its implementations.
//! - [`dispatcher`] invokes the action once per quiescent path and turns its
//!   result into a [`DispatchResult`].

pub mod action;
pub mod dispatcher;

use std::sync::Arc;

pub use action::{Action, ActionFuture, CommandAction, FnAction, LogAction, PATH_ENV_VAR};
pub use dispatcher::{DispatchOutcome, DispatchResult, Dispatcher};

use crate::config::WatchSpec;

/// Resolve the action for a spec: an explicit action wins, then the
/// configured command, then [`LogAction`].
pub fn resolve_action(spec: &WatchSpec, explicit: Option<Arc<dyn Action>>) -> Arc<dyn Action> {
    match (explicit, spec.command()) {
        (Some(action), _) => action,
        (None, Some(cmd)) => Arc::new(CommandAction::new(cmd)),
        (None, None) => Arc::new(LogAction),
    }
}
