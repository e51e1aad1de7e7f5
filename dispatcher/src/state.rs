//! Lifecycle of a dispatcher run.

use std::fmt;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::debug;

use crate::error::{PipelineError, Result};

/// Where a dispatcher is in its lifecycle.
///
/// `Idle → Watching → Stopping → Stopped`, never skipping a state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineState {
    /// Constructed, not yet watching.
    Idle,

    /// Root validated and subscribed; facts are being dispatched.
    Watching,

    /// Cancellation or a watch failure was observed; tearing down.
    Stopping,

    /// Subscription released. Terminal.
    Stopped,
}

impl PipelineState {
    /// Check whether `next` directly follows this state.
    pub fn can_transition_to(self, next: PipelineState) -> bool {
        matches!(
            (self, next),
            (Self::Idle, Self::Watching)
                | (Self::Watching, Self::Stopping)
                | (Self::Stopping, Self::Stopped)
        )
    }

    /// Check if no further transitions are possible.
    pub fn is_terminal(self) -> bool {
        self == Self::Stopped
    }
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Watching => "watching",
            Self::Stopping => "stopping",
            Self::Stopped => "stopped",
        };
        f.write_str(name)
    }
}

/// Holds the current state and publishes changes to subscribers.
pub struct StateTracker {
    tx: watch::Sender<PipelineState>,
}

impl StateTracker {
    /// Create a tracker in [`PipelineState::Idle`].
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(PipelineState::Idle);
        Self { tx }
    }

    /// Current state.
    pub fn current(&self) -> PipelineState {
        *self.tx.borrow()
    }

    /// Receive every subsequent state change.
    pub fn subscribe(&self) -> watch::Receiver<PipelineState> {
        self.tx.subscribe()
    }

    /// Move to `next` if it directly follows the current state.
    pub fn advance(&self, next: PipelineState) -> Result<()> {
        let mut result = Ok(());
        self.tx.send_if_modified(|state| {
            if state.can_transition_to(next) {
                debug!("Pipeline state: {state} -> {next}");
                *state = next;
                true
            } else {
                result = Err(PipelineError::InvalidTransition {
                    from: *state,
                    to: next,
                });
                false
            }
        });
        result
    }
}

impl Default for StateTracker {
    fn default() -> Self {
        Self::new()
    }
}
