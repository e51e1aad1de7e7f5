//! Directory watcher implementation.

use std::io;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::task::{Context, Poll};

use notify::event::CreateKind;
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tokio_stream::Stream;
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::config::WatchConfig;
use crate::error::{Result, WatcherError};
use crate::event::{FileAttributes, FileEvent, FileEventKind};
use crate::handler::{CreationFilter, EventHandler, WatchItem};

/// Watches one directory tree and yields a fact for every new file in it.
///
/// The sequence is lazy and unbounded. Once [`DirectoryWatcher::stop`] is
/// called it ends and cannot be restarted.
pub struct DirectoryWatcher {
    /// Canonical root of the watched tree.
    root: PathBuf,

    /// Internal notify watcher, `None` once stopped.
    watcher: Option<RecommendedWatcher>,

    /// Filtered items pushed by the backend thread.
    event_rx: mpsc::Receiver<WatchItem>,
}

impl DirectoryWatcher {
    /// Validate the root and start watching it.
    ///
    /// Nothing is spawned when the root is missing or is not a directory.
    pub fn start(config: WatchConfig) -> Result<Self> {
        let root = validate_root(&config.root)?;
        let (event_tx, event_rx) = mpsc::channel(config.channel_capacity);

        let mut watcher = spawn_backend(CreationFilter::new(&root, event_tx))?;
        watcher
            .watch(&root, RecursiveMode::Recursive)
            .map_err(|e| subscribe_error(&root, e))?;

        info!("Watching directory: {}", root.display());

        Ok(Self {
            root,
            watcher: Some(watcher),
            event_rx,
        })
    }

    /// Root being watched.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Check if the watcher is running.
    pub fn is_running(&self) -> bool {
        self.watcher.is_some()
    }

    /// Wait for the next fact or watch error.
    ///
    /// Returns `None` after [`DirectoryWatcher::stop`].
    pub async fn next_fact(&mut self) -> Option<WatchItem> {
        if self.watcher.is_none() {
            return None;
        }
        self.event_rx.recv().await
    }

    /// Stop watching. Buffered and in-flight events are dropped.
    pub fn stop(&mut self) {
        let Some(mut watcher) = self.watcher.take() else {
            return;
        };

        // Unblocks the backend thread if it is waiting on a full channel.
        self.event_rx.close();

        if let Err(e) = watcher.unwatch(&self.root) {
            debug!("Unwatch of {} failed: {e}", self.root.display());
        }
        drop(watcher);

        info!("Directory watcher stopped");
    }
}

impl Stream for DirectoryWatcher {
    type Item = WatchItem;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        if self.watcher.is_none() {
            return Poll::Ready(None);
        }
        self.event_rx.poll_recv(cx)
    }
}

impl Drop for DirectoryWatcher {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Create a notify backend that classifies raw events and feeds `handler`.
///
/// A new directory is followed by a `Created` event for every non-directory
/// entry already inside it. The backend only adds its watch for the directory
/// after reporting it, so those entries would otherwise go unseen. An entry
/// the backend also reports on its own is passed on twice.
pub fn spawn_backend<H: EventHandler>(mut handler: H) -> Result<RecommendedWatcher> {
    let watcher = notify::recommended_watcher(
        move |res: std::result::Result<notify::Event, notify::Error>| match res {
            Ok(event) => {
                let kind = FileEventKind::from(event.kind);
                let is_folder = matches!(event.kind, EventKind::Create(CreateKind::Folder));

                for path in event.paths {
                    if is_folder {
                        handler.handle(
                            FileEvent::new(kind, &path).with_attributes(FileAttributes::directory()),
                        );
                        replay_contents(&path, &mut handler);
                    } else {
                        let attributes = FileAttributes::from_path(&path);
                        handler.handle(FileEvent::new(kind, path).with_attributes(attributes));
                    }
                }
            }
            Err(e) => handler.handle_error(e.into()),
        },
    )?;

    Ok(watcher)
}

/// Report files that were created inside `dir` before it was watched.
fn replay_contents<H: EventHandler>(dir: &Path, handler: &mut H) {
    let walker = WalkDir::new(dir).min_depth(1).follow_links(false);

    for entry in walker.into_iter().filter_map(|e| e.ok()) {
        if entry.file_type().is_dir() {
            continue;
        }

        let path = entry.into_path();
        debug!("Found entry in new directory: {}", path.display());
        let attributes = FileAttributes::from_path(&path);
        handler.handle(FileEvent::new(FileEventKind::Created, path).with_attributes(attributes));
    }
}

fn validate_root(root: &Path) -> Result<PathBuf> {
    let metadata = match root.metadata() {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(WatcherError::RootNotFound(root.display().to_string()));
        }
        Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
            return Err(WatcherError::PermissionDenied(root.display().to_string()));
        }
        Err(e) => return Err(e.into()),
    };

    if !metadata.is_dir() {
        return Err(WatcherError::NotADirectory(root.display().to_string()));
    }

    Ok(root.canonicalize()?)
}

fn subscribe_error(root: &Path, err: notify::Error) -> WatcherError {
    match &err.kind {
        notify::ErrorKind::PathNotFound => WatcherError::RootNotFound(root.display().to_string()),
        notify::ErrorKind::Io(io_err) if io_err.kind() == io::ErrorKind::PermissionDenied => {
            WatcherError::PermissionDenied(root.display().to_string())
        }
        _ => WatcherError::Notify(err),
    }
}
