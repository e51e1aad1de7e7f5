//! The run loop.

use filealert_directory_watcher::{DirectoryWatcher, FileCreationFact, WatcherError};
use filealert_notifier::{MailTransport, Notifier, SmtpMailTransport};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::error::{PipelineError, Result};
use crate::state::{PipelineState, StateTracker};

/// Counters for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Facts received from the watcher.
    pub facts_observed: u64,

    /// Notifications the server accepted.
    pub notifications_sent: u64,

    /// Notifications that failed.
    pub notifications_failed: u64,
}

/// Connects the directory watcher to the notifier.
///
/// Facts are handled one at a time in arrival order. A send that is already
/// in progress when cancellation arrives is allowed to finish; nothing after
/// it is picked up. A dispatcher runs once.
pub struct Dispatcher<T = SmtpMailTransport> {
    config: Config,
    notifier: Notifier<T>,
    state: StateTracker,
}

impl Dispatcher<SmtpMailTransport> {
    /// Create a dispatcher that notifies over SMTP.
    pub fn new(config: Config) -> Result<Self> {
        let transport = SmtpMailTransport::new(config.transport.clone());
        Self::with_transport(config, transport)
    }
}

impl<T: MailTransport> Dispatcher<T> {
    /// Create a dispatcher that hands messages to `transport`.
    ///
    /// Sender and recipient always come from `config`.
    pub fn with_transport(config: Config, transport: T) -> Result<Self> {
        config.validate()?;
        let notifier = Notifier::with_transport(config.transport.clone(), transport);

        Ok(Self {
            config,
            notifier,
            state: StateTracker::new(),
        })
    }

    /// Current lifecycle state.
    pub fn state(&self) -> PipelineState {
        self.state.current()
    }

    /// Observe lifecycle changes.
    pub fn subscribe(&self) -> watch::Receiver<PipelineState> {
        self.state.subscribe()
    }

    /// The notifier facts are handed to.
    pub fn notifier(&self) -> &Notifier<T> {
        &self.notifier
    }

    /// Configuration for this run.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Watch and notify until `cancel` fires or the watch breaks.
    ///
    /// Returns the run's counters on cancellation. A broken watch (for
    /// example the root being deleted) is returned as an error once the
    /// dispatcher has reached [`PipelineState::Stopped`].
    pub async fn run(&self, cancel: CancellationToken) -> Result<RunSummary> {
        let state = self.state.current();
        if state != PipelineState::Idle {
            return Err(PipelineError::AlreadyStarted(state));
        }

        let mut watcher = DirectoryWatcher::start(self.config.watch_config())?;
        self.state.advance(PipelineState::Watching)?;
        info!("Monitoring started for folder: {}", watcher.root().display());

        let mut summary = RunSummary::default();
        let failure = loop {
            let item = tokio::select! {
                biased;
                _ = cancel.cancelled() => break None,
                item = watcher.next_fact() => item,
            };

            match item {
                Some(Ok(fact)) => self.dispatch(&fact, &mut summary).await,
                Some(Err(e)) if e.is_terminal() => {
                    error!("Watching stopped: {e}");
                    break Some(e);
                }
                Some(Err(e)) => warn!("Watch error: {e}"),
                None => {
                    error!("Watch backend closed");
                    break Some(WatcherError::Disconnected);
                }
            }
        };

        self.state.advance(PipelineState::Stopping)?;
        watcher.stop();
        self.state.advance(PipelineState::Stopped)?;

        debug!(
            "Monitoring stopped (files: {}, sent: {}, failed: {})",
            summary.facts_observed, summary.notifications_sent, summary.notifications_failed
        );

        match failure {
            Some(e) => Err(e.into()),
            None => Ok(summary),
        }
    }

    async fn dispatch(&self, fact: &FileCreationFact, summary: &mut RunSummary) {
        summary.facts_observed += 1;
        info!("File created: {} at {}", fact.name, fact.path.display());

        let outcome = self.notifier.send(fact).await;
        if outcome.success {
            summary.notifications_sent += 1;
            info!(
                "Notification sent to {} for {}",
                self.config.transport.recipient, fact.name
            );
        } else {
            summary.notifications_failed += 1;
            warn!(
                "Failed to send notification for {}: {}",
                fact.name,
                outcome.error_detail.as_deref().unwrap_or("unknown error")
            );
        }
    }
}
