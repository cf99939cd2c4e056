//! Embed layout for failure notifications.
//!
//! Every failure takes four inline fields (name, status, sub-status, URL) so
//! that chat clients render one failure per row. Only the first row of an
//! embed carries labels; the rows below it sit under the same headers.

use serde::{Deserialize, Serialize};

use super::Notification;
use crate::cycle::FailureRecord;

/// Discord refuses empty field names and values; a zero-width space renders as blank
pub const BLANK: &str = "\u{200b}";

/// Fields rendered for each failure
pub const FIELDS_PER_FAILURE: usize = 4;

/// Discord allows at most 25 fields per embed
pub const FAILURES_PER_EMBED: usize = 25 / FIELDS_PER_FAILURE;

/// Discord limit for a field value
pub const FIELD_VALUE_LIMIT: usize = 1024;

/// Discord limit for the combined text of an embed
pub const EMBED_CHAR_LIMIT: usize = 6000;

/// Presentation of failure notifications
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbedStyle {
    pub title: String,
    pub description: String,
    pub color: u32,
    pub labels: EmbedLabels,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbedLabels {
    pub name: String,
    pub status: String,
    pub sub_status: String,
    pub url: String,
}

impl Default for EmbedStyle {
    fn default() -> Self {
        Self {
            title: "Website outage".into(),
            description: "The following sites are unhealthy:".into(),
            color: 0xFF0000,
            labels: EmbedLabels::default(),
        }
    }
}

impl Default for EmbedLabels {
    fn default() -> Self {
        Self {
            name: "Name".into(),
            status: "Status".into(),
            sub_status: "Sub-status".into(),
            url: "URL".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Embed {
    pub title: String,
    pub description: String,
    pub color: u32,
    pub timestamp: String,
    pub fields: Vec<EmbedField>,
}

impl Embed {
    /// Number of characters Discord counts against the per-message limit
    pub fn char_len(&self) -> usize {
        self.title.chars().count()
            + self.description.chars().count()
            + fields_len(&self.fields)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

impl EmbedField {
    fn new(name: &str, value: String) -> Self {
        Self { name: non_blank(name), value: non_blank(&truncate(value, FIELD_VALUE_LIMIT)), inline: true }
    }
}

/// Lay out the failures of a notification as one or more embeds
pub fn build_embeds(notification: &Notification, style: &EmbedStyle) -> Vec<Embed> {
    let timestamp = notification.sent_at.to_rfc3339();
    let new_embed = || Embed {
        title: style.title.clone(),
        description: style.description.clone(),
        color: style.color,
        timestamp: timestamp.clone(),
        fields: Vec::new(),
    };

    let mut embeds = Vec::new();
    let mut current: Option<Embed> = None;

    for failure in &notification.failures {
        if let Some(embed) = current.as_mut() {
            let row = failure_row(failure, &style.labels, false);
            let rows = embed.fields.len() / FIELDS_PER_FAILURE;
            if rows < FAILURES_PER_EMBED && embed.char_len() + fields_len(&row) <= EMBED_CHAR_LIMIT {
                embed.fields.extend(row);
                continue;
            }
            embeds.extend(current.take());
        }

        let mut embed = new_embed();
        embed.fields.extend(failure_row(failure, &style.labels, true));
        current = Some(embed);
    }

    embeds.extend(current);
    embeds
}

fn fields_len(fields: &[EmbedField]) -> usize {
    fields.iter().map(|f| f.name.chars().count() + f.value.chars().count()).sum()
}

fn failure_row(failure: &FailureRecord, labels: &EmbedLabels, labelled: bool) -> [EmbedField; 4] {
    let label = |text: &str| if labelled { text.to_string() } else { String::new() };
    let sub_status = failure.sub_status.map(|s| s.to_string()).unwrap_or_default();

    [
        EmbedField::new(&label(&labels.name), failure.name.clone()),
        EmbedField::new(&label(&labels.status), failure.status.to_string()),
        EmbedField::new(&label(&labels.sub_status), sub_status),
        EmbedField::new(&label(&labels.url), failure.url.clone()),
    ]
}

fn non_blank(text: &str) -> String {
    if text.is_empty() { BLANK.to_string() } else { text.to_string() }
}

fn truncate(text: String, limit: usize) -> String {
    if text.chars().count() <= limit {
        return text;
    }
    let mut short: String = text.chars().take(limit - 1).collect();
    short.push('…');
    short
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cycle::FailureStatus;

    fn failure(name: &str, status: FailureStatus, sub_status: Option<u16>) -> FailureRecord {
        FailureRecord {
            name: name.to_string(),
            url: format!("https://{}.example.com", name.to_lowercase()),
            status,
            sub_status,
        }
    }

    #[test]
    fn test_first_row_is_labelled() {
        let notification = Notification::new(vec![
            failure("Shop", FailureStatus::Code(500), None),
            failure("Blog", FailureStatus::Code(530), Some(1530)),
        ]);

        let embeds = build_embeds(&notification, &EmbedStyle::default());
        assert_eq!(embeds.len(), 1);

        let fields = &embeds[0].fields;
        assert_eq!(fields.len(), 8);

        let names: Vec<_> = fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["Name", "Status", "Sub-status", "URL", BLANK, BLANK, BLANK, BLANK]);

        let values: Vec<_> = fields.iter().map(|f| f.value.as_str()).collect();
        assert_eq!(
            values,
            vec![
                "Shop",
                "500",
                BLANK,
                "https://shop.example.com",
                "Blog",
                "530",
                "1530",
                "https://blog.example.com",
            ]
        );
        assert!(fields.iter().all(|f| f.inline));
    }

    #[test]
    fn test_embed_carries_style_and_timestamp() {
        let style = EmbedStyle { title: "網站異常".into(), color: 0x00FF00, ..EmbedStyle::default() };
        let notification =
            Notification::new(vec![failure("Api", FailureStatus::Message("timed out".into()), None)]);

        let embed = &build_embeds(&notification, &style)[0];
        assert_eq!(embed.title, "網站異常");
        assert_eq!(embed.color, 0x00FF00);
        assert_eq!(embed.timestamp, notification.sent_at.to_rfc3339());
    }

    #[test]
    fn test_many_failures_are_split_across_embeds() {
        let failures = (0..FAILURES_PER_EMBED + 1)
            .map(|i| failure(&format!("Site{i}"), FailureStatus::Code(502), None))
            .collect();

        let embeds = build_embeds(&Notification::new(failures), &EmbedStyle::default());
        assert_eq!(embeds.len(), 2);
        assert_eq!(embeds[0].fields.len(), FAILURES_PER_EMBED * FIELDS_PER_FAILURE);
        assert_eq!(embeds[1].fields.len(), FIELDS_PER_FAILURE);
        assert_eq!(embeds[1].fields[0].name, "Name");
    }

    #[test]
    fn test_long_rows_stay_under_embed_char_limit() {
        let failures = (0..FAILURES_PER_EMBED)
            .map(|i| failure(&format!("Site{i}"), FailureStatus::Message("e".repeat(1000)), None))
            .collect();

        let embeds = build_embeds(&Notification::new(failures), &EmbedStyle::default());

        assert!(embeds.len() > 1);
        assert!(embeds.iter().all(|e| e.char_len() <= EMBED_CHAR_LIMIT));
        assert_eq!(embeds.iter().map(|e| e.fields.len()).sum::<usize>(), FAILURES_PER_EMBED * 4);
        assert!(embeds.iter().all(|e| e.fields[0].name == "Name"));
    }

    #[test]
    fn test_long_messages_are_truncated() {
        let message = "x".repeat(FIELD_VALUE_LIMIT * 2);
        let notification =
            Notification::new(vec![failure("Api", FailureStatus::Message(message), None)]);

        let embed = &build_embeds(&notification, &EmbedStyle::default())[0];
        assert_eq!(embed.fields[1].value.chars().count(), FIELD_VALUE_LIMIT);
    }
}
