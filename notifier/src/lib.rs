//! # Notifier
//!
//! Turns a [`FileCreationFact`] into an email and delivers it.
//!
//! ```rust,ignore
//! use filealert_notifier::{Notifier, TransportConfig};
//!
//! let notifier = Notifier::new(TransportConfig::new(user, secret, recipient));
//! let outcome = notifier.send(&fact).await;
//! if !outcome.success {
//!     eprintln!("{}", outcome.error_detail.unwrap_or_default());
//! }
//! ```

pub mod config;
pub mod error;
pub mod message;
pub mod notifier;
pub mod transport;

pub use config::TransportConfig;
pub use error::{NotifyError, Result};
pub use message::Notification;
pub use notifier::{NotificationOutcome, Notifier};
pub use transport::{MailTransport, SmtpMailTransport};

// Re-export for convenience
pub use filealert_directory_watcher::FileCreationFact;
