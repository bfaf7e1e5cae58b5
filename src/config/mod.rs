// src/config/mod.rs

//! Configuration loading and validation for filetrigger.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file from disk and overlay CLI flags (`loader.rs`).
//! - Validate values and produce the immutable `WatchSpec` (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{apply_cli_overrides, load_and_validate, load_from_path, resolve_watch_spec};
pub use model::{ActionSection, DebounceSection, RawConfigFile, WatchSection, WatchSpec};
