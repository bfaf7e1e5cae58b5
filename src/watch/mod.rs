// src/watch/mod.rs

//! File watching and event classification.
//!
//! This module is responsible for:
//! - Wiring up a cross-platform filesystem watcher (`notify`) and turning its
//!   events into [`RawEvent`]s.
//! - Deciding which of those events name a file worth dispatching
//!   ([`EventFilter`]).
//! - Translating local paths for the action ([`PathTranslator`]).
//!
//! It does **not** know about debouncing or dispatch; see `engine`.

pub mod event;
pub mod filter;
pub mod path_utils;
pub mod watcher;

pub use event::{raw_events_from_notify, RawEvent, RawEventKind};
pub use filter::EventFilter;
pub use path_utils::{translate_posix, translate_windows, PathTranslator};
pub use watcher::{spawn_watcher, WatcherHandle};
