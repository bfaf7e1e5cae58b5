// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::types::EmptyPatternPolicy;

/// Command-line arguments for `filetrigger`.
///
/// Every option here overrides the corresponding value from `--config`.
#[derive(Debug, Clone, Default, Parser)]
#[command(
    name = "filetrigger",
    version,
    about = "Run an action once for every file that finishes arriving in a directory.",
    long_about = None
)]
pub struct CliArgs {
    /// Optional TOML config file.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Directory to watch (recursively). Created if it does not exist.
    ///
    /// Default: the current working directory.
    #[arg(long, value_name = "DIR")]
    pub watch_dir: Option<PathBuf>,

    /// Filename suffix(es) that trigger the action, e.g. `.dat .txt`.
    #[arg(long, value_name = "SUFFIX", num_args = 0..)]
    pub extensions: Option<Vec<String>>,

    /// What to do when no suffixes are configured: "nothing" or "everything".
    #[arg(long, value_name = "POLICY")]
    pub empty_patterns: Option<EmptyPatternPolicy>,

    /// Delay between open-handle probes while a file is still being written
    /// (e.g. "5s", "250ms").
    #[arg(long, value_name = "DURATION")]
    pub poll_interval: Option<String>,

    /// Give up on a file that is still held open after this long.
    ///
    /// If omitted, waits indefinitely.
    #[arg(long, value_name = "DURATION")]
    pub max_wait: Option<String>,

    /// Shell command to run for each file. The translated path is appended as
    /// the last argument and exported as `FILETRIGGER_PATH`.
    ///
    /// If omitted, the path is only logged.
    #[arg(long, value_name = "CMD")]
    pub exec: Option<String>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `FILETRIGGER_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Resolve and print the effective configuration, but don't watch.
    #[arg(long)]
    pub dry_run: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
