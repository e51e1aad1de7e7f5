//! Configuration types for directory watching.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Default capacity of the channel between the notify backend and consumers.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1000;

/// Configuration for the watched directory tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchConfig {
    /// Root of the monitored tree.
    pub root: PathBuf,

    /// Number of pending items buffered before the backend thread waits.
    pub channel_capacity: usize,
}

impl WatchConfig {
    /// Create a watch config for `root`. Subdirectories, including ones
    /// created later, are always watched.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }

    /// Set the channel capacity. Zero is bumped to one.
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        self.channel_capacity = capacity.max(1);
        self
    }
}
