// src/watch/filter.rs

//! Event classification: decide which raw events are worth debouncing.

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use tracing::{debug, trace};

use crate::config::WatchSpec;
use crate::types::EmptyPatternPolicy;
use crate::watch::event::{RawEvent, RawEventKind};
use crate::watch::path_utils::relative_str;

/// Stateless filter: created, non-directory files whose name ends with one of
/// the configured suffixes (and which no exclude glob matches).
#[derive(Clone)]
pub struct EventFilter {
    root: PathBuf,
    patterns: Vec<String>,
    empty_policy: EmptyPatternPolicy,
    exclude_set: Option<GlobSet>,
}

impl fmt::Debug for EventFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventFilter")
            .field("root", &self.root)
            .field("patterns", &self.patterns)
            .field("empty_policy", &self.empty_policy)
            .finish_non_exhaustive()
    }
}

impl EventFilter {
    pub fn new(
        root: impl Into<PathBuf>,
        patterns: Vec<String>,
        empty_policy: EmptyPatternPolicy,
        exclude: &[String],
    ) -> Result<Self> {
        let exclude_set = if exclude.is_empty() {
            None
        } else {
            Some(build_globset(exclude).context("building exclude globset")?)
        };

        Ok(Self {
            root: root.into(),
            patterns,
            empty_policy,
            exclude_set,
        })
    }

    pub fn from_spec(spec: &WatchSpec) -> Result<Self> {
        Self::new(
            spec.directory(),
            spec.patterns().to_vec(),
            spec.empty_patterns(),
            spec.exclude(),
        )
    }

    /// Returns the event's path, unchanged, if it should be dispatched.
    pub fn accept(&self, event: &RawEvent) -> Option<PathBuf> {
        if event.is_directory {
            trace!(path = ?event.path, "directory event ignored");
            return None;
        }

        if event.kind != RawEventKind::Created {
            debug!(path = ?event.path, kind = ?event.kind, "event type not handled; ignoring");
            return None;
        }

        let Some(pattern) = self.matching_pattern(&event.path) else {
            debug!(path = ?event.path, "file created but matches no pattern");
            return None;
        };

        if self.is_excluded(&event.path) {
            debug!(path = ?event.path, "file created but excluded");
            return None;
        }

        debug!(path = ?event.path, %pattern, "file created and matches pattern");
        Some(event.path.clone())
    }

    /// The pattern that qualifies `path`, or `"*"` when the empty-set policy
    /// lets everything through.
    fn matching_pattern(&self, path: &Path) -> Option<&str> {
        if self.patterns.is_empty() {
            return match self.empty_policy {
                EmptyPatternPolicy::Nothing => None,
                EmptyPatternPolicy::Everything => Some("*"),
            };
        }

        let path_str = path.to_string_lossy();
        self.patterns
            .iter()
            .find(|p| path_str.ends_with(p.as_str()))
            .map(|p| p.as_str())
    }

    fn is_excluded(&self, path: &Path) -> bool {
        let Some(exclude) = &self.exclude_set else {
            return false;
        };
        match relative_str(&self.root, path) {
            Some(rel) => exclude.is_match(&rel),
            None => exclude.is_match(path),
        }
    }
}

/// Build a GlobSet from simple string patterns.
fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pat in patterns {
        let glob = Glob::new(pat).with_context(|| format!("invalid glob pattern: {pat}"))?;
        builder.add(glob);
    }
    Ok(builder.build()?)
}
