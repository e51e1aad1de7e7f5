//! Command line surface: argument and environment parsing, logging setup.

use std::future::Future;
use std::io;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use filealert_dispatcher::{CancellationToken, Config, TransportConfig};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const ENV_HELP: &str = "\
Every option can also be set through the environment or a .env file:
  MONITOR_FOLDER_PATH   folder to monitor
  EMAIL_USER            sender address, also the SMTP login
  EMAIL_PASSWORD        SMTP password (an app password for Gmail)
  RECIPIENT_EMAIL       address that receives the notifications
  SMTP_SERVER           SMTP server (default: smtp.gmail.com)
  SMTP_PORT             SMTP port (default: 587)
  SMTP_TIMEOUT_SECS     per-message send timeout (default: 30)";

/// Email a notification for every file created under a directory.
#[derive(Debug, Parser)]
#[command(name = "filealert", version, after_help = ENV_HELP)]
pub struct Cli {
    /// Folder to monitor, including all subfolders.
    #[arg(long, env = "MONITOR_FOLDER_PATH")]
    pub watch_root: Option<PathBuf>,

    /// SMTP server host.
    #[arg(long, env = "SMTP_SERVER", default_value = "smtp.gmail.com")]
    pub smtp_server: String,

    /// SMTP server port; must support STARTTLS.
    #[arg(long, env = "SMTP_PORT", default_value_t = 587)]
    pub smtp_port: u16,

    /// Sender address and SMTP login.
    #[arg(long, env = "EMAIL_USER")]
    pub email_user: Option<String>,

    /// SMTP password.
    #[arg(long, env = "EMAIL_PASSWORD", hide_env_values = true)]
    pub email_password: Option<String>,

    /// Notification recipient.
    #[arg(long, env = "RECIPIENT_EMAIL")]
    pub recipient_email: Option<String>,

    /// Seconds before a single send is abandoned.
    #[arg(long, env = "SMTP_TIMEOUT_SECS", default_value_t = 30)]
    pub smtp_timeout_secs: u64,
}

impl Cli {
    /// Build the run configuration. Missing values stay empty and are
    /// reported together by [`Config::validate`].
    pub fn into_config(self) -> Config {
        let transport = TransportConfig::new(
            self.email_user.unwrap_or_default(),
            self.email_password.unwrap_or_default(),
            self.recipient_email.unwrap_or_default(),
        )
        .with_host(self.smtp_server)
        .with_port(self.smtp_port)
        .with_timeout(Duration::from_secs(self.smtp_timeout_secs));

        Config::new(self.watch_root.unwrap_or_default(), transport)
    }
}

/// Install the fmt subscriber, honoring `RUST_LOG` and defaulting to `info`.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// Cancel the run once `signal` fires.
///
/// If the signal handler cannot be installed the run is left going.
pub async fn cancel_on_signal<F>(signal: F, cancel: CancellationToken)
where
    F: Future<Output = io::Result<()>>,
{
    match signal.await {
        Ok(()) => {
            info!("Monitoring interrupted by user");
            cancel.cancel();
        }
        Err(e) => warn!("Failed to listen for Ctrl+C: {e}"),
    }
}
