use tracing::warn;

use super::{Notification, Notifier, NotifyError};

/// Writes failures to the log instead of a chat channel
///
/// Used when no webhook is configured and for dry runs.
#[derive(Debug, Default)]
pub struct LogNotifier;

#[async_trait::async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, notification: &Notification) -> Result<(), NotifyError> {
        for failure in &notification.failures {
            match failure.sub_status {
                Some(sub_status) => warn!(
                    "{} ({}) is unhealthy: {} / {}",
                    failure.name, failure.url, failure.status, sub_status
                ),
                None => warn!("{} ({}) is unhealthy: {}", failure.name, failure.url, failure.status),
            }
        }
        Ok(())
    }
}
