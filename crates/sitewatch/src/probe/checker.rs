use std::error::Error as _;
use std::time::{Duration, Instant};

use reqwest::StatusCode;
use tracing::{debug, info};

use super::cloudflare::{parse_cloudflare_error, CLOUDFLARE_ORIGIN_ERROR, UNKNOWN_CLOUDFLARE_ERROR};
use super::types::ProbeResult;
use crate::error::Result;
use crate::target::Target;

/// Longest slice of a 530 body written to the debug log
const BODY_SAMPLE_LEN: usize = 512;

/// Prober trait for performing a single health check
///
/// Implementations never fail: every problem reaching the target is folded
/// into the returned [`ProbeResult`].
#[async_trait::async_trait]
pub trait Prober: Send + Sync {
    async fn probe(&self, target: &Target) -> ProbeResult;
}

/// HTTP GET prober
pub struct HttpProber {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpProber {
    pub fn new(timeout: Duration) -> Result<Self> {
        Self::with_user_agent(timeout, concat!("sitewatch/", env!("CARGO_PKG_VERSION")))
    }

    pub fn with_user_agent(timeout: Duration, user_agent: &str) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).user_agent(user_agent).build()?;

        Ok(Self { client, timeout })
    }

    fn describe_transport_error(&self, error: &reqwest::Error) -> String {
        if error.is_timeout() {
            return format!("request timed out after {}s", self.timeout.as_secs_f32());
        }

        // reqwest's own message only names the URL; the cause sits further down
        let mut message = error.to_string();
        let mut source = error.source();
        while let Some(cause) = source {
            message.push_str(": ");
            message.push_str(&cause.to_string());
            source = cause.source();
        }
        message
    }
}

#[async_trait::async_trait]
impl Prober for HttpProber {
    async fn probe(&self, target: &Target) -> ProbeResult {
        info!("Probing {}", target.name);
        let start = Instant::now();

        let response = match self.client.get(&target.url).send().await {
            Ok(response) => response,
            Err(e) => {
                let message = self.describe_transport_error(&e);
                debug!("{} unreachable after {:?}: {}", target.name, start.elapsed(), message);
                return ProbeResult::TransportError { message };
            }
        };

        let status = response.status();
        debug!("{} answered {} in {:?}", target.name, status, start.elapsed());

        if status == StatusCode::OK {
            return ProbeResult::Healthy;
        }

        if status.as_u16() != CLOUDFLARE_ORIGIN_ERROR {
            return ProbeResult::HttpError { status_code: status.as_u16() };
        }

        let sub_status = match response.text().await {
            Ok(body) => {
                debug!(
                    "Cloudflare error page from {}: {}",
                    target.name,
                    body.chars().take(BODY_SAMPLE_LEN).collect::<String>()
                );
                parse_cloudflare_error(&body)
            }
            Err(e) => {
                debug!("Failed to read 530 body from {}: {}", target.name, e);
                UNKNOWN_CLOUDFLARE_ERROR
            }
        };

        ProbeResult::CloudflareError { sub_status }
    }
}
