//! # Directory Watcher
//!
//! Recursive monitoring of one directory tree, filtered down to creations of
//! non-directory entries.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    Directory Watcher                            │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  notify backend ──► FileEvent ──► EventHandler                  │
//! │                                       │                         │
//! │                                       ▼                         │
//! │                CreationFilter ──► FileCreationFact stream       │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! New subdirectories stay covered by the recursive watch but never produce
//! facts of their own; files already inside one when it is first seen are
//! reported as creations. Facts arrive in the order the OS reports them and are
//! not deduplicated.

pub mod config;
pub mod error;
pub mod event;
pub mod handler;
pub mod watcher;

pub use config::WatchConfig;
pub use error::{Result, WatcherError};
pub use event::{FileAttributes, FileCreationFact, FileEvent, FileEventKind};
pub use handler::{CreationFilter, EventHandler, WatchItem};
pub use watcher::DirectoryWatcher;
