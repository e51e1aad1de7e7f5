//! Error types for the dispatch pipeline.

use thiserror::Error;

use crate::state::PipelineState;

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Errors that stop the pipeline.
///
/// Failed notifications are not in here: they are logged and the run goes on.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Missing or invalid configuration, reported before watching starts.
    #[error("configuration error: {0}")]
    Config(String),

    /// Watch setup failed or the watch broke while running.
    #[error("watch error: {0}")]
    Watch(#[from] filealert_directory_watcher::WatcherError),

    /// The dispatcher has already been run.
    #[error("dispatcher already started (state: {0})")]
    AlreadyStarted(PipelineState),

    /// A lifecycle transition that skips or reverses a state.
    #[error("invalid state transition: {from} -> {to}")]
    InvalidTransition {
        from: PipelineState,
        to: PipelineState,
    },
}
