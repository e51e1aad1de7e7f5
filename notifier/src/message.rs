//! Notification message construction.

use filealert_directory_watcher::FileCreationFact;
use serde::{Deserialize, Serialize};

use crate::config::TransportConfig;

/// A rendered notification, independent of the transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Sender address.
    pub from: String,

    /// Recipient address.
    pub to: String,

    /// Subject line.
    pub subject: String,

    /// Plain-text UTF-8 body.
    pub body: String,
}

impl Notification {
    /// Render the notification for one new file.
    pub fn for_fact(fact: &FileCreationFact, config: &TransportConfig) -> Self {
        Self {
            from: config.username.clone(),
            to: config.recipient.clone(),
            subject: subject_for(fact),
            body: body_for(fact),
        }
    }
}

fn subject_for(fact: &FileCreationFact) -> String {
    format!("New file created: {}", fact.name)
}

fn body_for(fact: &FileCreationFact) -> String {
    format!(
        "A new file was detected in the monitored folder!\n\
         \n\
         File details:\n\
         \u{2022} Name: {name}\n\
         \u{2022} Full path: {path}\n\
         \u{2022} Created at: {observed_at}\n\
         \n\
         This is an automatic message from the file monitoring system.\n",
        name = fact.name,
        path = fact.path.display(),
        observed_at = fact.observed_at_display(),
    )
}
