// src/config/loader.rs

use std::fs;
use std::path::Path;

use crate::cli::CliArgs;
use crate::config::model::{RawConfigFile, WatchSpec};
use crate::errors::Result;

/// Load a configuration file from a given path and return the raw
/// `RawConfigFile`.
///
/// This only performs TOML deserialization; it does **not** perform semantic
/// validation. Use [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let config: RawConfigFile = toml::from_str(&contents)?;

    Ok(config)
}

/// Load a configuration file from path and validate it into a `WatchSpec`.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<WatchSpec> {
    let raw_config = load_from_path(&path)?;
    WatchSpec::try_from(raw_config)
}

/// Build the effective `WatchSpec` for a CLI invocation.
///
/// - Reads `--config` if given, otherwise starts from defaults.
/// - Applies CLI overrides on top.
/// - Validates the result.
pub fn resolve_watch_spec(args: &CliArgs) -> Result<WatchSpec> {
    let mut raw = match &args.config {
        Some(path) => load_from_path(path)?,
        None => RawConfigFile::default(),
    };
    apply_cli_overrides(&mut raw, args);
    WatchSpec::try_from(raw)
}

/// Overlay CLI flags onto a raw config. CLI values always win.
pub fn apply_cli_overrides(raw: &mut RawConfigFile, args: &CliArgs) {
    if let Some(dir) = &args.watch_dir {
        raw.watch.directory = Some(dir.to_string_lossy().into_owned());
    }
    if let Some(exts) = &args.extensions {
        raw.watch.patterns = exts.clone();
    }
    if let Some(policy) = args.empty_patterns {
        raw.watch.empty_patterns = policy;
    }
    if let Some(poll) = &args.poll_interval {
        raw.debounce.poll_interval = Some(poll.clone());
    }
    if let Some(max) = &args.max_wait {
        raw.debounce.max_wait = Some(max.clone());
    }
    if let Some(cmd) = &args.exec {
        raw.action.cmd = Some(cmd.clone());
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn cli_overrides_replace_file_values() {
        let mut raw: RawConfigFile = toml::from_str(
            r#"
[watch]
directory = "/srv/in"
patterns = [".dat"]

[debounce]
poll_interval = "5s"
"#,
        )
        .unwrap();

        let args = CliArgs {
            watch_dir: Some(PathBuf::from("/srv/other")),
            extensions: Some(vec![".txt".to_string()]),
            poll_interval: Some("1s".to_string()),
            ..CliArgs::default()
        };
        apply_cli_overrides(&mut raw, &args);

        assert_eq!(raw.watch.directory.as_deref(), Some("/srv/other"));
        assert_eq!(raw.watch.patterns, vec![".txt".to_string()]);
        assert_eq!(raw.debounce.poll_interval.as_deref(), Some("1s"));
    }

    #[test]
    fn absent_cli_flags_keep_file_values() {
        let mut raw: RawConfigFile = toml::from_str(
            r#"
[watch]
patterns = [".dat"]

[action]
cmd = "echo"
"#,
        )
        .unwrap();
        apply_cli_overrides(&mut raw, &CliArgs::default());
        assert_eq!(raw.watch.patterns, vec![".dat".to_string()]);
        assert_eq!(raw.action.cmd.as_deref(), Some("echo"));
    }
}
