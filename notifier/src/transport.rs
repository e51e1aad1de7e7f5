//! Mail transports.
//!
//! The SMTP transport opens a fresh connection for every message: connect,
//! STARTTLS, authenticate, submit, quit. Nothing is pooled, so a broken
//! session never outlives the send that broke it.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::debug;

use crate::config::TransportConfig;
use crate::error::{NotifyError, Result};
use crate::message::Notification;

/// SMTP reply codes that mean the login was refused.
const AUTH_REPLY_CODES: &[&str] = &["530", "534", "535", "538"];

/// SMTP reply codes that mean the server is closing the session.
const CONNECTION_REPLY_CODES: &[&str] = &["421"];

/// Delivers rendered notifications.
#[async_trait]
pub trait MailTransport: Send + Sync {
    /// Get the name of this transport.
    fn name(&self) -> &str;

    /// Deliver one message. Must release any connection before returning.
    async fn deliver(&self, notification: &Notification) -> Result<()>;
}

/// SMTP submission with STARTTLS and login.
pub struct SmtpMailTransport {
    config: TransportConfig,
}

impl SmtpMailTransport {
    /// Create a transport for the given server settings.
    pub fn new(config: TransportConfig) -> Self {
        Self { config }
    }

    fn mailer(&self) -> Result<AsyncSmtpTransport<Tokio1Executor>> {
        let credentials =
            Credentials::new(self.config.username.clone(), self.config.secret.clone());

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.config.host)
            .map_err(|e| NotifyError::Connection(e.to_string()))?
            .port(self.config.port)
            .credentials(credentials)
            .timeout(Some(self.config.timeout))
            .build();

        Ok(mailer)
    }
}

#[async_trait]
impl MailTransport for SmtpMailTransport {
    fn name(&self) -> &str {
        "smtp"
    }

    async fn deliver(&self, notification: &Notification) -> Result<()> {
        let message = build_message(notification)?;
        let mailer = self.mailer()?;

        debug!(
            "Submitting message to {}:{}",
            self.config.host, self.config.port
        );

        // Without connection pooling the session is closed before send returns.
        mailer.send(message).await.map_err(classify)?;

        Ok(())
    }
}

fn build_message(notification: &Notification) -> Result<Message> {
    let from: Mailbox = notification
        .from
        .parse()
        .map_err(|e| NotifyError::Message(format!("sender {:?}: {e}", notification.from)))?;
    let to: Mailbox = notification
        .to
        .parse()
        .map_err(|e| NotifyError::Message(format!("recipient {:?}: {e}", notification.to)))?;

    Message::builder()
        .from(from)
        .to(to)
        .subject(notification.subject.as_str())
        .header(ContentType::TEXT_PLAIN)
        .body(notification.body.clone())
        .map_err(|e| NotifyError::Message(e.to_string()))
}

/// Sort an SMTP client error into connection, authentication or transmission.
fn classify(err: lettre::transport::smtp::Error) -> NotifyError {
    let detail = err.to_string();

    if let Some(code) = err.status() {
        let code = code.to_string();
        return if is_auth_reply(&code) {
            NotifyError::Authentication(detail)
        } else if CONNECTION_REPLY_CODES.contains(&code.as_str()) {
            NotifyError::Connection(detail)
        } else {
            NotifyError::Transmission(detail)
        };
    }

    if err.is_client() && detail.to_lowercase().contains("authentication") {
        return NotifyError::Authentication(detail);
    }

    if err.is_response() {
        return NotifyError::Transmission(detail);
    }

    // Refused connections, DNS failures, TLS handshakes and timeouts.
    NotifyError::Connection(detail)
}

fn is_auth_reply(code: &str) -> bool {
    AUTH_REPLY_CODES.contains(&code)
}
