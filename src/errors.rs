// src/errors.rs

//! Crate-wide error type.
//!
//! Only startup failures are represented here. Failures inside a single
//! path's debounce/dispatch pipeline are logged where they happen and never
//! surface as a `FileTriggerError`.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FileTriggerError {
    /// Invalid configuration, or the watch directory could not be created.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The filesystem notification subscription could not be started.
    #[error("Subscription error: {0}")]
    SubscriptionError(#[from] notify::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, FileTriggerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_display() {
        let err = FileTriggerError::ConfigError("poll_interval must be > 0".into());
        assert_eq!(
            err.to_string(),
            "Configuration error: poll_interval must be > 0"
        );
    }

    #[test]
    fn io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: FileTriggerError = io.into();
        assert!(matches!(err, FileTriggerError::IoError(_)));
    }
}
