// src/config/validate.rs

use std::path::PathBuf;

use directories::BaseDirs;
use globset::Glob;

use crate::config::model::{RawConfigFile, WatchSpec, DEFAULT_POLL_INTERVAL};
use crate::errors::{FileTriggerError, Result};
use crate::types::parse_duration;

impl TryFrom<RawConfigFile> for WatchSpec {
    type Error = crate::errors::FileTriggerError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_patterns(&raw)?;
        validate_excludes(&raw)?;

        let directory = resolve_directory(raw.watch.directory.as_deref())?;

        let poll_str = raw
            .debounce
            .poll_interval
            .as_deref()
            .unwrap_or(DEFAULT_POLL_INTERVAL);
        let poll_interval = parse_duration(poll_str).map_err(|e| {
            FileTriggerError::ConfigError(format!("[debounce].poll_interval: {e}"))
        })?;
        if poll_interval.is_zero() {
            return Err(FileTriggerError::ConfigError(
                "[debounce].poll_interval must be > 0".to_string(),
            ));
        }

        let max_wait = match raw.debounce.max_wait.as_deref() {
            None => None,
            Some(s) => Some(parse_duration(s).map_err(|e| {
                FileTriggerError::ConfigError(format!("[debounce].max_wait: {e}"))
            })?),
        };
        if let Some(max) = max_wait {
            if max < poll_interval {
                return Err(FileTriggerError::ConfigError(format!(
                    "[debounce].max_wait ({max:?}) must be >= poll_interval ({poll_interval:?})"
                )));
            }
        }

        let command = raw
            .action
            .cmd
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());

        Ok(WatchSpec::new_unchecked(
            directory,
            raw.watch.patterns,
            raw.watch.empty_patterns,
            raw.watch.exclude,
            poll_interval,
            max_wait,
            raw.debounce.probe,
            command,
            raw.action.path_style,
        ))
    }
}

fn validate_patterns(cfg: &RawConfigFile) -> Result<()> {
    for pat in cfg.watch.patterns.iter() {
        if pat.trim().is_empty() {
            return Err(FileTriggerError::ConfigError(
                "[watch].patterns must not contain blank entries".to_string(),
            ));
        }
    }
    Ok(())
}

fn validate_excludes(cfg: &RawConfigFile) -> Result<()> {
    for pat in cfg.watch.exclude.iter() {
        if let Err(e) = Glob::new(pat) {
            return Err(FileTriggerError::ConfigError(format!(
                "invalid exclude glob '{pat}': {e}"
            )));
        }
    }
    Ok(())
}

/// Resolve the watch directory, expanding a leading `~`.
///
/// The directory does not need to exist yet; the session creates it.
fn resolve_directory(raw: Option<&str>) -> Result<PathBuf> {
    let raw = match raw {
        None => return Ok(PathBuf::from(".")),
        Some(s) => s.trim(),
    };

    if raw.is_empty() {
        return Err(FileTriggerError::ConfigError(
            "[watch].directory must not be empty".to_string(),
        ));
    }

    if raw == "~" || raw.starts_with("~/") {
        let base_dirs = BaseDirs::new().ok_or_else(|| {
            FileTriggerError::ConfigError(format!(
                "cannot expand '{raw}': failed to determine home directory"
            ))
        })?;
        let rest = raw.trim_start_matches('~').trim_start_matches('/');
        return Ok(base_dirs.home_dir().join(rest));
    }

    Ok(PathBuf::from(raw))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn raw() -> RawConfigFile {
        let mut raw = RawConfigFile::default();
        raw.watch.directory = Some("/tmp/in".to_string());
        raw
    }

    #[test]
    fn defaults_are_applied() {
        let spec = WatchSpec::try_from(RawConfigFile::default()).unwrap();
        assert_eq!(spec.directory(), PathBuf::from(".").as_path());
        assert_eq!(spec.poll_interval(), Duration::from_secs(5));
        assert!(spec.max_wait().is_none());
        assert!(spec.patterns().is_empty());
        assert!(spec.command().is_none());
    }

    #[test]
    fn zero_poll_interval_is_rejected() {
        let mut cfg = raw();
        cfg.debounce.poll_interval = Some("0s".to_string());
        let err = WatchSpec::try_from(cfg).unwrap_err();
        assert!(matches!(err, FileTriggerError::ConfigError(_)));
    }

    #[test]
    fn max_wait_shorter_than_poll_interval_is_rejected() {
        let mut cfg = raw();
        cfg.debounce.poll_interval = Some("5s".to_string());
        cfg.debounce.max_wait = Some("1s".to_string());
        assert!(WatchSpec::try_from(cfg).is_err());
    }

    #[test]
    fn blank_pattern_is_rejected() {
        let mut cfg = raw();
        cfg.watch.patterns = vec![".dat".to_string(), "  ".to_string()];
        assert!(WatchSpec::try_from(cfg).is_err());
    }

    #[test]
    fn invalid_exclude_glob_is_rejected() {
        let mut cfg = raw();
        cfg.watch.exclude = vec!["[unclosed".to_string()];
        let err = WatchSpec::try_from(cfg).unwrap_err();
        assert!(err.to_string().contains("invalid exclude glob"));
    }

    #[test]
    fn blank_command_means_no_command() {
        let mut cfg = raw();
        cfg.action.cmd = Some("   ".to_string());
        let spec = WatchSpec::try_from(cfg).unwrap();
        assert!(spec.command().is_none());
    }

    #[test]
    fn tilde_is_expanded_against_home() {
        let Some(dirs) = BaseDirs::new() else {
            return;
        };
        let dir = resolve_directory(Some("~/incoming")).unwrap();
        assert_eq!(dir, dirs.home_dir().join("incoming"));
    }
}
