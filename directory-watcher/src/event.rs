//! File events from directory watching.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, Timelike};
use serde::{Deserialize, Serialize};

/// A file system event as reported by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileEvent {
    /// The kind of event.
    pub kind: FileEventKind,

    /// Path to the affected file or directory.
    pub path: PathBuf,

    /// When the event was observed.
    pub timestamp: DateTime<Local>,

    /// What the path pointed at when the event was observed.
    pub attributes: FileAttributes,
}

impl FileEvent {
    /// Create a new file event observed now.
    pub fn new(kind: FileEventKind, path: impl Into<PathBuf>) -> Self {
        Self {
            kind,
            path: path.into(),
            timestamp: Local::now(),
            attributes: FileAttributes::default(),
        }
    }

    /// Add attributes to the event.
    pub fn with_attributes(mut self, attributes: FileAttributes) -> Self {
        self.attributes = attributes;
        self
    }

    /// Check if this is a directory event.
    pub fn is_directory(&self) -> bool {
        self.attributes.is_directory
    }
}

/// Kind of file event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileEventKind {
    /// Entry was created.
    Created,

    /// Entry contents or metadata changed.
    Modified,

    /// Entry was deleted.
    Deleted,

    /// Entry was renamed (either side of the rename).
    Renamed,

    /// Access events and anything the backend could not classify.
    Other,
}

impl From<notify::EventKind> for FileEventKind {
    fn from(kind: notify::EventKind) -> Self {
        match kind {
            notify::EventKind::Create(_) => Self::Created,
            notify::EventKind::Modify(notify::event::ModifyKind::Name(_)) => Self::Renamed,
            notify::EventKind::Modify(_) => Self::Modified,
            notify::EventKind::Remove(_) => Self::Deleted,
            _ => Self::Other,
        }
    }
}

/// File attributes sampled when the event was observed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileAttributes {
    /// Whether anything existed at the path.
    pub exists: bool,

    /// Whether the path is a directory.
    pub is_directory: bool,
}

impl FileAttributes {
    /// Sample attributes from a path without following a final symlink.
    pub fn from_path(path: &Path) -> Self {
        match path.symlink_metadata() {
            Ok(metadata) => Self {
                exists: true,
                is_directory: metadata.is_dir(),
            },
            Err(_) => Self::default(),
        }
    }

    /// Attributes for an entry the backend already reported as a directory.
    pub fn directory() -> Self {
        Self {
            exists: true,
            is_directory: true,
        }
    }
}

/// One observed creation of a non-directory entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileCreationFact {
    /// Base file name.
    pub name: String,

    /// Absolute path of the new entry.
    pub path: PathBuf,

    /// When the creation was observed, truncated to whole seconds.
    pub observed_at: DateTime<Local>,
}

impl FileCreationFact {
    /// Format used when rendering `observed_at` for people.
    pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    /// Build a fact from a filtered event.
    ///
    /// Returns `None` unless the event is a creation of an entry that still
    /// exists and is not a directory.
    pub fn from_event(event: &FileEvent) -> Option<Self> {
        if event.kind != FileEventKind::Created
            || !event.attributes.exists
            || event.attributes.is_directory
        {
            return None;
        }

        let name = event.path.file_name()?.to_string_lossy().into_owned();
        let observed_at = event
            .timestamp
            .with_nanosecond(0)
            .unwrap_or(event.timestamp);

        Some(Self {
            name,
            path: event.path.clone(),
            observed_at,
        })
    }

    /// `observed_at` rendered with [`Self::TIMESTAMP_FORMAT`].
    pub fn observed_at_display(&self) -> String {
        self.observed_at
            .format(Self::TIMESTAMP_FORMAT)
            .to_string()
    }
}
