//! One notification per file-creation fact.

use filealert_directory_watcher::FileCreationFact;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::TransportConfig;
use crate::error::NotifyError;
use crate::message::Notification;
use crate::transport::{MailTransport, SmtpMailTransport};

/// Result of one send attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationOutcome {
    /// Whether the message was accepted by the server.
    pub success: bool,

    /// Why it was not, prefixed with the failure kind.
    pub error_detail: Option<String>,
}

impl NotificationOutcome {
    /// A delivered notification.
    pub fn delivered() -> Self {
        Self {
            success: true,
            error_detail: None,
        }
    }

    /// A failed notification.
    pub fn failed(error: &NotifyError) -> Self {
        Self {
            success: false,
            error_detail: Some(error.to_string()),
        }
    }
}

/// Formats and sends notifications over a [`MailTransport`].
///
/// Sends are best-effort and at-most-once: a failure is reported in the
/// returned outcome and never retried.
pub struct Notifier<T = SmtpMailTransport> {
    config: TransportConfig,
    transport: T,
}

impl Notifier<SmtpMailTransport> {
    /// Create a notifier that delivers over SMTP.
    pub fn new(config: TransportConfig) -> Self {
        let transport = SmtpMailTransport::new(config.clone());
        Self { config, transport }
    }
}

impl<T: MailTransport> Notifier<T> {
    /// Create a notifier with a custom transport.
    pub fn with_transport(config: TransportConfig, transport: T) -> Self {
        Self { config, transport }
    }

    /// Transport settings.
    pub fn config(&self) -> &TransportConfig {
        &self.config
    }

    /// The underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Send the notification for `fact`.
    pub async fn send(&self, fact: &FileCreationFact) -> NotificationOutcome {
        let notification = Notification::for_fact(fact, &self.config);
        let timeout = self.config.timeout;

        let result =
            match tokio::time::timeout(timeout, self.transport.deliver(&notification)).await {
                Ok(result) => result,
                Err(_) => Err(NotifyError::Timeout(timeout)),
            };

        match result {
            Ok(()) => {
                debug!(
                    "Delivered notification for {} via {}",
                    fact.path.display(),
                    self.transport.name()
                );
                NotificationOutcome::delivered()
            }
            Err(e) => NotificationOutcome::failed(&e),
        }
    }
}
