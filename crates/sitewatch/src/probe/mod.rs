/// Probing module - performs single health checks against targets
///
/// This module is responsible for:
/// - Issuing bounded-timeout HTTP GET requests
/// - Classifying responses into healthy or failure outcomes
/// - Extracting Cloudflare origin error codes
pub mod checker;
pub mod cloudflare;
pub mod types;

pub use checker::{HttpProber, Prober};
pub use cloudflare::{parse_cloudflare_error, CLOUDFLARE_ORIGIN_ERROR, UNKNOWN_CLOUDFLARE_ERROR};
pub use types::ProbeResult;
