//! Error types for the directory watcher.

use thiserror::Error;

/// Result type alias for watcher operations.
pub type Result<T> = std::result::Result<T, WatcherError>;

/// Errors that can occur in the directory watcher.
#[derive(Error, Debug)]
pub enum WatcherError {
    /// Root directory not found.
    #[error("directory not found: {0}")]
    RootNotFound(String),

    /// Root exists but is not a directory.
    #[error("not a directory: {0}")]
    NotADirectory(String),

    /// Permission denied while subscribing.
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// Root disappeared after monitoring started.
    #[error("watched directory was removed: {0}")]
    RootRemoved(String),

    /// The notify backend went away while watching.
    #[error("watch backend stopped unexpectedly")]
    Disconnected,

    /// Notify error.
    #[error("notify error: {0}")]
    Notify(#[from] notify::Error),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl WatcherError {
    /// Whether the error ends the fact stream.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::RootRemoved(_) | Self::PermissionDenied(_) | Self::Disconnected
        )
    }
}
