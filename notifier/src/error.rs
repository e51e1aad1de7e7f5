//! Error types for notification delivery.

use std::time::Duration;

use thiserror::Error;

/// Result type alias for notifier operations.
pub type Result<T> = std::result::Result<T, NotifyError>;

/// Why a notification was not delivered.
///
/// None of these are fatal to the pipeline.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NotifyError {
    /// Could not reach the server or establish TLS.
    #[error("connection failed: {0}")]
    Connection(String),

    /// The server rejected the credentials.
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// The server refused or dropped the message.
    #[error("transmission failed: {0}")]
    Transmission(String),

    /// The message could not be built, e.g. a malformed address.
    #[error("invalid message: {0}")]
    Message(String),

    /// The send did not finish in time.
    #[error("timed out after {0:?}")]
    Timeout(Duration),
}
