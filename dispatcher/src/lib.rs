//! # Dispatcher
//!
//! The pipeline that turns new files into notifications:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                         Dispatcher                              │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  DirectoryWatcher ──► FileCreationFact ──► Notifier             │
//! │                                               │                 │
//! │                                               ▼                 │
//! │                                     NotificationOutcome (log)   │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use filealert_dispatcher::{Config, Dispatcher};
//! use tokio_util::sync::CancellationToken;
//!
//! let dispatcher = Dispatcher::new(Config::new("/data", transport))?;
//! let cancel = CancellationToken::new();
//! let summary = dispatcher.run(cancel).await?;
//! ```

pub mod config;
pub mod dispatcher;
pub mod error;
pub mod state;

pub use config::Config;
pub use dispatcher::{Dispatcher, RunSummary};
pub use error::{PipelineError, Result};
pub use state::{PipelineState, StateTracker};

// Re-export from dependencies for convenience
pub use filealert_directory_watcher::{FileCreationFact, WatcherError};
pub use filealert_notifier::{NotificationOutcome, TransportConfig};
pub use tokio_util::sync::CancellationToken;
