#![allow(dead_code)]

use std::path::Path;

use filetrigger::config::{RawConfigFile, WatchSpec};
use filetrigger::types::{EmptyPatternPolicy, PathStyle, ProbeMode};

/// Builder for `WatchSpec` to simplify test setup.
///
/// Defaults to a 10ms poll interval so debounce tests stay fast.
pub struct WatchSpecBuilder {
    config: RawConfigFile,
}

impl WatchSpecBuilder {
    pub fn new(directory: impl AsRef<Path>) -> Self {
        let mut config = RawConfigFile::default();
        config.watch.directory = Some(directory.as_ref().to_string_lossy().into_owned());
        config.debounce.poll_interval = Some("10ms".to_string());
        Self { config }
    }

    pub fn pattern(mut self, suffix: &str) -> Self {
        self.config.watch.patterns.push(suffix.to_string());
        self
    }

    pub fn empty_patterns(mut self, policy: EmptyPatternPolicy) -> Self {
        self.config.watch.empty_patterns = policy;
        self
    }

    pub fn exclude(mut self, glob: &str) -> Self {
        self.config.watch.exclude.push(glob.to_string());
        self
    }

    pub fn poll_interval(mut self, duration: &str) -> Self {
        self.config.debounce.poll_interval = Some(duration.to_string());
        self
    }

    pub fn max_wait(mut self, duration: &str) -> Self {
        self.config.debounce.max_wait = Some(duration.to_string());
        self
    }

    pub fn probe(mut self, mode: ProbeMode) -> Self {
        self.config.debounce.probe = mode;
        self
    }

    pub fn command(mut self, cmd: &str) -> Self {
        self.config.action.cmd = Some(cmd.to_string());
        self
    }

    pub fn path_style(mut self, style: PathStyle) -> Self {
        self.config.action.path_style = style;
        self
    }

    pub fn build(self) -> WatchSpec {
        WatchSpec::try_from(self.config).expect("Failed to build valid spec from builder")
    }
}
