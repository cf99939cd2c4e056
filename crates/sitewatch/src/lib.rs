//! Sitewatch - periodic website health probing
//!
//! This library probes a fixed list of websites over HTTP, classifies every
//! response, and batches the failures of each cycle into a single webhook
//! notification.

pub mod config;
pub mod cycle;
pub mod error;
pub mod notify;
pub mod probe;
pub mod sites;
pub mod target;

use std::time::Duration;

// Re-export main types
pub use config::Config;
pub use cycle::{CycleReport, CycleRunner, Delivery, FailureRecord, FailureStatus, MonitoringScheduler};
pub use error::{Error, Result};
pub use notify::{DiscordNotifier, EmbedStyle, LogNotifier, Notification, Notifier, NotifyError};
pub use probe::{HttpProber, ProbeResult, Prober};
pub use target::Target;

/// Default timeout for a single probe
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(4);

/// Default period between two monitoring cycles
pub const DEFAULT_CYCLE_INTERVAL: Duration = Duration::from_secs(30);

/// Default location of the site list
pub const DEFAULT_SITE_LIST: &str = "site.csv";

/// Environment variable holding the Discord webhook URL
pub const WEBHOOK_URL_ENV: &str = "DC_WEBHOOK_URL";
