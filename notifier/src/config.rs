//! Mail transport configuration.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default SMTP relay.
pub const DEFAULT_HOST: &str = "smtp.gmail.com";

/// Default submission port (STARTTLS).
pub const DEFAULT_PORT: u16 = 587;

/// Default upper bound for one send, connect to quit.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Settings for the outbound mail channel.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportConfig {
    /// SMTP server host.
    pub host: String,

    /// SMTP server port. Must offer STARTTLS.
    pub port: u16,

    /// Login name, also used as the From address.
    pub username: String,

    /// Login secret.
    #[serde(skip_serializing)]
    pub secret: String,

    /// Address that receives the notifications.
    pub recipient: String,

    /// Upper bound for one send.
    pub timeout: Duration,
}

impl TransportConfig {
    /// Create a config for the default relay.
    pub fn new(
        username: impl Into<String>,
        secret: impl Into<String>,
        recipient: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            secret: secret.into(),
            recipient: recipient.into(),
            ..Self::default()
        }
    }

    /// Set the server host.
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Set the server port.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the send timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Names of required settings that are empty.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("host", &self.host),
            ("username", &self.username),
            ("secret", &self.secret),
            ("recipient", &self.recipient),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            username: String::new(),
            secret: String::new(),
            recipient: String::new(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl fmt::Debug for TransportConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransportConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("secret", &"<redacted>")
            .field("recipient", &self.recipient)
            .field("timeout", &self.timeout)
            .finish()
    }
}
