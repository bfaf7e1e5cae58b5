// src/config/model.rs

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::types::{EmptyPatternPolicy, PathStyle, ProbeMode};

/// Default delay between open-handle probes.
pub const DEFAULT_POLL_INTERVAL: &str = "5s";

/// Top-level configuration as read from a TOML file, before validation.
///
/// ```toml
/// [watch]
/// directory = "~/incoming"
/// patterns = [".dat", ".txt"]
/// empty_patterns = "nothing"
/// exclude = ["**/partial/**"]
///
/// [debounce]
/// poll_interval = "5s"
/// max_wait = "10m"
/// probe = "any_handle"
///
/// [action]
/// cmd = "upload.sh"
/// path_style = "auto"
/// ```
///
/// All sections are optional and have reasonable defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawConfigFile {
    #[serde(default)]
    pub watch: WatchSection,

    #[serde(default)]
    pub debounce: DebounceSection,

    #[serde(default)]
    pub action: ActionSection,
}

/// `[watch]` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WatchSection {
    /// Root of the recursively watched tree. `None` means the current
    /// working directory.
    #[serde(default)]
    pub directory: Option<String>,

    /// Filename suffixes that qualify a created file, e.g. `".dat"`.
    #[serde(default)]
    pub patterns: Vec<String>,

    /// Behaviour when `patterns` is empty.
    #[serde(default)]
    pub empty_patterns: EmptyPatternPolicy,

    /// Globs (relative to the watch directory) that disqualify a file even
    /// when a suffix matches.
    #[serde(default)]
    pub exclude: Vec<String>,
}

/// `[debounce]` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DebounceSection {
    /// Flat delay between probes, e.g. `"5s"`.
    #[serde(default)]
    pub poll_interval: Option<String>,

    /// Upper bound on the wait for a single file. Unset means unbounded.
    #[serde(default)]
    pub max_wait: Option<String>,

    #[serde(default)]
    pub probe: ProbeMode,
}

/// `[action]` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActionSection {
    /// Shell command run once per qualifying file. Unset means log only.
    #[serde(default)]
    pub cmd: Option<String>,

    #[serde(default)]
    pub path_style: PathStyle,
}

/// Validated, immutable description of one watch session.
///
/// Built once at startup (see `TryFrom<RawConfigFile>`) and handed to the
/// session by value.
#[derive(Debug, Clone)]
pub struct WatchSpec {
    directory: PathBuf,
    patterns: Vec<String>,
    empty_patterns: EmptyPatternPolicy,
    exclude: Vec<String>,
    poll_interval: Duration,
    max_wait: Option<Duration>,
    probe_mode: ProbeMode,
    command: Option<String>,
    path_style: PathStyle,
}

impl WatchSpec {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new_unchecked(
        directory: PathBuf,
        patterns: Vec<String>,
        empty_patterns: EmptyPatternPolicy,
        exclude: Vec<String>,
        poll_interval: Duration,
        max_wait: Option<Duration>,
        probe_mode: ProbeMode,
        command: Option<String>,
        path_style: PathStyle,
    ) -> Self {
        Self {
            directory,
            patterns,
            empty_patterns,
            exclude,
            poll_interval,
            max_wait,
            probe_mode,
            command,
            path_style,
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    pub fn empty_patterns(&self) -> EmptyPatternPolicy {
        self.empty_patterns
    }

    pub fn exclude(&self) -> &[String] {
        &self.exclude
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    pub fn max_wait(&self) -> Option<Duration> {
        self.max_wait
    }

    pub fn probe_mode(&self) -> ProbeMode {
        self.probe_mode
    }

    /// Shell command configured under `[action].cmd` (or `--exec`).
    pub fn command(&self) -> Option<&str> {
        self.command.as_deref()
    }

    pub fn path_style(&self) -> PathStyle {
        self.path_style
    }

    /// Same `WatchSpec` rooted at another directory. Used after the directory has
    /// been created and canonicalized at session start.
    pub(crate) fn with_directory(mut self, directory: PathBuf) -> Self {
        self.directory = directory;
        self
    }
}
