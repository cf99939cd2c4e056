//! Error types for Sitewatch.

use std::path::PathBuf;

use thiserror::Error;

use crate::config::ConfigError;

/// Sitewatch result type
pub type Result<T> = std::result::Result<T, Error>;

/// Startup-time failures. Nothing that happens while probing ends up here.
#[derive(Debug, Error)]
pub enum Error {
    #[error("site list not found: {}", .0.display())]
    SiteListMissing(PathBuf),

    #[error("failed to read site list {}: {source}", path.display())]
    SiteListRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid site list entry on line {line}: {reason}")]
    SiteListParse { line: usize, reason: String },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}
