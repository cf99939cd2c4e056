//! Notification delivery.
//!
//! A [`Notification`] is the batch of failures collected in one cycle. The
//! [`Notifier`] trait is the seam between the monitoring loop and whatever
//! carries the message to people.

pub mod discord;
pub mod embed;
pub mod log;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::cycle::FailureRecord;

pub use discord::DiscordNotifier;
pub use embed::{build_embeds, Embed, EmbedField, EmbedLabels, EmbedStyle};
pub use log::LogNotifier;

/// Failures of one cycle, ready to be delivered
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub failures: Vec<FailureRecord>,
    pub sent_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(failures: Vec<FailureRecord>) -> Self {
        Self { failures, sent_at: Utc::now() }
    }
}

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("webhook request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("webhook rejected the notification with status {status}: {body}")]
    Rejected { status: u16, body: String },
}

/// Delivers a notification to an external channel
#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, notification: &Notification) -> Result<(), NotifyError>;
}
