//! Event handlers invoked from the notify backend thread.

use std::path::PathBuf;

use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::error::WatcherError;
use crate::event::{FileCreationFact, FileEvent, FileEventKind};

/// Item delivered on the watcher channel.
pub type WatchItem = std::result::Result<FileCreationFact, WatcherError>;

/// Receives every classified file system event.
pub trait EventHandler: Send + 'static {
    /// Handle one event.
    fn handle(&mut self, event: FileEvent);

    /// Handle an error reported by the backend.
    fn handle_error(&mut self, error: WatcherError) {
        warn!("Watch error: {error}");
    }
}

/// Passes creations of non-directory entries on as [`FileCreationFact`]s.
///
/// Directory creations are dropped here; the recursive watch still covers
/// them. Removal of the root, or renaming it away, is forwarded as a
/// terminal error.
pub struct CreationFilter {
    root: PathBuf,
    tx: mpsc::Sender<WatchItem>,
    root_removed: bool,
}

impl CreationFilter {
    /// Create a filter for `root` that forwards into `tx`.
    pub fn new(root: impl Into<PathBuf>, tx: mpsc::Sender<WatchItem>) -> Self {
        Self {
            root: root.into(),
            tx,
            root_removed: false,
        }
    }

    fn forward(&self, item: WatchItem) {
        // Fails only after the receiver was closed by stop().
        if self.tx.blocking_send(item).is_err() {
            debug!("Dropping event, watcher is stopped");
        }
    }
}

impl EventHandler for CreationFilter {
    fn handle(&mut self, event: FileEvent) {
        if self.root_removed {
            return;
        }

        match event.kind {
            FileEventKind::Created => match FileCreationFact::from_event(&event) {
                Some(fact) => self.forward(Ok(fact)),
                None if event.is_directory() => {
                    debug!("Directory created: {}", event.path.display());
                }
                None => {
                    debug!("Skipping vanished entry: {}", event.path.display());
                }
            },
            FileEventKind::Deleted | FileEventKind::Renamed
                if event.path == self.root || !self.root.exists() =>
            {
                self.root_removed = true;
                self.forward(Err(WatcherError::RootRemoved(
                    self.root.display().to_string(),
                )));
            }
            _ => {}
        }
    }

    fn handle_error(&mut self, error: WatcherError) {
        warn!("Watch error: {error}");
        self.forward(Err(error));
    }
}
