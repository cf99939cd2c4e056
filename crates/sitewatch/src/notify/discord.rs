use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info};

use super::embed::{build_embeds, Embed, EmbedStyle};
use super::{Notification, Notifier, NotifyError};

/// Discord accepts at most 10 embeds per webhook message
const EMBEDS_PER_MESSAGE: usize = 10;

/// Discord caps the combined text of all embeds in one message
const MESSAGE_CHAR_LIMIT: usize = 6000;

const WEBHOOK_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Serialize)]
struct WebhookMessage<'a> {
    embeds: &'a [Embed],
}

/// Delivers notifications to a Discord channel through an incoming webhook
pub struct DiscordNotifier {
    client: reqwest::Client,
    webhook_url: String,
    style: EmbedStyle,
}

impl DiscordNotifier {
    pub fn new(webhook_url: impl Into<String>, style: EmbedStyle) -> Result<Self, NotifyError> {
        let client = reqwest::Client::builder().timeout(WEBHOOK_TIMEOUT).build()?;

        Ok(Self { client, webhook_url: webhook_url.into(), style })
    }

    async fn post(&self, embeds: &[Embed]) -> Result<(), NotifyError> {
        let response =
            self.client.post(&self.webhook_url).json(&WebhookMessage { embeds }).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NotifyError::Rejected { status: status.as_u16(), body });
        }

        debug!("Webhook accepted {} embeds with status {}", embeds.len(), status);
        Ok(())
    }
}

#[async_trait::async_trait]
impl Notifier for DiscordNotifier {
    async fn notify(&self, notification: &Notification) -> Result<(), NotifyError> {
        let embeds = build_embeds(notification, &self.style);

        for batch in message_batches(&embeds) {
            self.post(batch).await?;
        }

        info!("Sent notification for {} failing sites", notification.failures.len());
        Ok(())
    }
}

/// Split embeds into groups that each fit in a single webhook message
fn message_batches(embeds: &[Embed]) -> Vec<&[Embed]> {
    let mut batches = Vec::new();
    let mut start = 0;
    let mut chars = 0;

    for (idx, embed) in embeds.iter().enumerate() {
        let len = embed.char_len();
        let full = idx - start == EMBEDS_PER_MESSAGE || chars + len > MESSAGE_CHAR_LIMIT;
        if full && idx > start {
            batches.push(&embeds[start..idx]);
            start = idx;
            chars = 0;
        }
        chars += len;
    }

    if start < embeds.len() {
        batches.push(&embeds[start..]);
    }
    batches
}

#[cfg(test)]
mod tests {
    use super::*;

    fn embed(text_len: usize) -> Embed {
        Embed {
            title: "t".repeat(text_len),
            description: String::new(),
            color: 0,
            timestamp: String::new(),
            fields: Vec::new(),
        }
    }

    #[test]
    fn test_small_notification_is_one_message() {
        let embeds = vec![embed(10), embed(10)];
        assert_eq!(message_batches(&embeds).len(), 1);
    }

    #[test]
    fn test_embed_count_limit() {
        let embeds: Vec<_> = (0..EMBEDS_PER_MESSAGE + 3).map(|_| embed(1)).collect();
        let sizes: Vec<_> = message_batches(&embeds).iter().map(|b| b.len()).collect();

        assert_eq!(sizes, vec![EMBEDS_PER_MESSAGE, 3]);
    }

    #[test]
    fn test_character_limit() {
        let embeds = vec![embed(4000), embed(4000), embed(100)];
        let sizes: Vec<_> = message_batches(&embeds).iter().map(|b| b.len()).collect();

        assert_eq!(sizes, vec![1, 2]);
    }

    #[test]
    fn test_webhook_message_shape() {
        let embeds = vec![Embed {
            title: "Website outage".into(),
            description: "down".into(),
            color: 0xFF0000,
            timestamp: "2026-10-19T00:00:00+00:00".into(),
            fields: Vec::new(),
        }];

        let value = serde_json::to_value(WebhookMessage { embeds: &embeds }).unwrap();

        assert_eq!(
            value,
            serde_json::json!({
                "embeds": [{
                    "title": "Website outage",
                    "description": "down",
                    "color": 16711680,
                    "timestamp": "2026-10-19T00:00:00+00:00",
                    "fields": [],
                }]
            })
        );
    }

    #[test]
    fn test_empty() {
        assert!(message_batches(&[]).is_empty());
    }
}
