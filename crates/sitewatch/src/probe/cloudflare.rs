//! Cloudflare origin error extraction.
//!
//! A 530 from Cloudflare means the origin could not be reached. The error
//! page names the reason as `Error 1xxx` somewhere in its body.

use std::sync::LazyLock;

use regex::Regex;

/// Status code Cloudflare uses for origin-level failures
pub const CLOUDFLARE_ORIGIN_ERROR: u16 = 530;

/// Sub-status reported when the body carries no recognizable error code
pub const UNKNOWN_CLOUDFLARE_ERROR: u16 = 9999;

static ERROR_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)error\s+1([0-9]{3})").expect("static regex is valid"));

/// Extract the `1xxx` error code from a Cloudflare error page
pub fn parse_cloudflare_error(body: &str) -> u16 {
    ERROR_CODE
        .captures(body)
        .and_then(|caps| caps.get(1))
        .and_then(|digits| format!("1{}", digits.as_str()).parse().ok())
        .unwrap_or(UNKNOWN_CLOUDFLARE_ERROR)
}
