use std::fmt;

use serde::{Deserialize, Serialize};

use super::cloudflare::CLOUDFLARE_ORIGIN_ERROR;

/// Outcome of a single probe
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProbeResult {
    /// The target answered with 200
    Healthy,

    /// The target answered with a status other than 200 or 530
    HttpError { status_code: u16 },

    /// The target answered with 530 and an origin error code in its body
    CloudflareError { sub_status: u16 },

    /// No HTTP response was received (timeout, DNS, refused connection, TLS...)
    TransportError { message: String },
}

impl ProbeResult {
    /// HTTP status code carried by this result, if any
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ProbeResult::HttpError { status_code } => Some(*status_code),
            ProbeResult::CloudflareError { .. } => Some(CLOUDFLARE_ORIGIN_ERROR),
            ProbeResult::Healthy | ProbeResult::TransportError { .. } => None,
        }
    }
}

impl fmt::Display for ProbeResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeResult::Healthy => write!(f, "healthy"),
            ProbeResult::HttpError { status_code } => write!(f, "HTTP {status_code}"),
            ProbeResult::CloudflareError { sub_status } => {
                write!(f, "HTTP {CLOUDFLARE_ORIGIN_ERROR} (error {sub_status})")
            }
            ProbeResult::TransportError { message } => write!(f, "{message}"),
        }
    }
}
