// src/watch/event.rs

//! Raw filesystem events as seen by the engine.

use std::path::PathBuf;

use notify::event::{CreateKind, RemoveKind};
use notify::{Event, EventKind};

/// Coarse classification of a filesystem change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawEventKind {
    Created,
    Modified,
    Deleted,
    /// Access events and anything notify can't classify.
    Other,
}

/// One filesystem change for one path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEvent {
    pub kind: RawEventKind,
    pub path: PathBuf,
    pub is_directory: bool,
}

impl RawEvent {
    pub fn new(kind: RawEventKind, path: impl Into<PathBuf>, is_directory: bool) -> Self {
        Self {
            kind,
            path: path.into(),
            is_directory,
        }
    }

    pub fn created(path: impl Into<PathBuf>) -> Self {
        Self::new(RawEventKind::Created, path, false)
    }
}

/// Split a notify event into one `RawEvent` per path.
///
/// When notify's kind says whether the subject is a file or a folder we use
/// that; otherwise we ask the filesystem (a vanished path counts as a file).
pub fn raw_events_from_notify(event: &Event) -> Vec<RawEvent> {
    let (kind, dir_hint) = match event.kind {
        EventKind::Create(CreateKind::Folder) => (RawEventKind::Created, Some(true)),
        EventKind::Create(CreateKind::File) => (RawEventKind::Created, Some(false)),
        EventKind::Create(_) => (RawEventKind::Created, None),
        EventKind::Modify(_) => (RawEventKind::Modified, None),
        EventKind::Remove(RemoveKind::Folder) => (RawEventKind::Deleted, Some(true)),
        EventKind::Remove(RemoveKind::File) => (RawEventKind::Deleted, Some(false)),
        EventKind::Remove(_) => (RawEventKind::Deleted, None),
        EventKind::Access(_) | EventKind::Any | EventKind::Other => (RawEventKind::Other, None),
    };

    event
        .paths
        .iter()
        .map(|path| RawEvent {
            kind,
            path: path.clone(),
            is_directory: dir_hint.unwrap_or_else(|| path.is_dir()),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use notify::event::{DataChange, ModifyKind};

    use super::*;

    #[test]
    fn create_file_maps_to_created() {
        let event = Event::new(EventKind::Create(CreateKind::File))
            .add_path(PathBuf::from("/watch/a.dat"));
        let raw = raw_events_from_notify(&event);
        assert_eq!(raw, vec![RawEvent::created("/watch/a.dat")]);
    }

    #[test]
    fn create_folder_is_flagged_as_directory() {
        let event = Event::new(EventKind::Create(CreateKind::Folder))
            .add_path(PathBuf::from("/watch/sub"));
        let raw = raw_events_from_notify(&event);
        assert!(raw[0].is_directory);
        assert_eq!(raw[0].kind, RawEventKind::Created);
    }

    #[test]
    fn modify_maps_to_modified_for_every_path() {
        let event = Event::new(EventKind::Modify(ModifyKind::Data(DataChange::Content)))
            .add_path(PathBuf::from("/nonexistent/a.dat"))
            .add_path(PathBuf::from("/nonexistent/b.dat"));
        let raw = raw_events_from_notify(&event);
        assert_eq!(raw.len(), 2);
        assert!(raw.iter().all(|e| e.kind == RawEventKind::Modified));
        assert!(raw.iter().all(|e| !e.is_directory));
    }
}
