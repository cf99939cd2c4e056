use std::fmt;

use serde::{Deserialize, Serialize};

use crate::probe::{ProbeResult, CLOUDFLARE_ORIGIN_ERROR};
use crate::target::Target;

/// What went wrong with a target: an HTTP status code or a transport error description
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FailureStatus {
    Code(u16),
    Message(String),
}

impl fmt::Display for FailureStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureStatus::Code(code) => write!(f, "{code}"),
            FailureStatus::Message(message) => write!(f, "{message}"),
        }
    }
}

/// Snapshot of a failed probe tied to its target
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureRecord {
    pub name: String,
    pub url: String,
    pub status: FailureStatus,

    /// Only set for Cloudflare origin errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_status: Option<u16>,
}

impl FailureRecord {
    /// Build a record from a probe outcome, `None` when the target was healthy
    pub fn from_probe(target: &Target, result: ProbeResult) -> Option<Self> {
        let (status, sub_status) = match result {
            ProbeResult::Healthy => return None,
            ProbeResult::HttpError { status_code } => (FailureStatus::Code(status_code), None),
            ProbeResult::CloudflareError { sub_status } => {
                (FailureStatus::Code(CLOUDFLARE_ORIGIN_ERROR), Some(sub_status))
            }
            ProbeResult::TransportError { message } => (FailureStatus::Message(message), None),
        };

        Some(Self { name: target.name.clone(), url: target.url.clone(), status, sub_status })
    }

    pub fn status_code(&self) -> Option<u16> {
        match self.status {
            FailureStatus::Code(code) => Some(code),
            FailureStatus::Message(_) => None,
        }
    }
}
