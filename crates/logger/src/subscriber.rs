use std::{env::var, fmt, str::FromStr};

use tracing::{level_filters::LevelFilter, warn};
use tracing_subscriber::{Layer, filter::EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Output format of the log stream
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "compact" | "text" => Ok(LogFormat::Compact),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format `{other}` (expected `compact` or `json`)")),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogFormat::Compact => write!(f, "compact"),
            LogFormat::Json => write!(f, "json"),
        }
    }
}

/// Initialize the tracing subscriber.
///
/// `RUST_LOG` refines `level`. When `format` is `None` it is read from
/// `RUST_LOG_FORMAT`.
pub fn init_with(level: LevelFilter, format: Option<LogFormat>) {
    let env_filter = EnvFilter::builder().with_default_directive(level.into()).from_env_lossy();

    let mut format_error = None;
    let format = format.unwrap_or_else(|| {
        var("RUST_LOG_FORMAT")
            .ok()
            .map(|raw| raw.parse().unwrap_or_else(|e| {
                format_error = Some(e);
                LogFormat::default()
            }))
            .unwrap_or_default()
    });

    let log_layer = match format {
        LogFormat::Json => tracing_subscriber::fmt::layer().json().with_filter(env_filter).boxed(),
        LogFormat::Compact => tracing_subscriber::fmt::layer()
            .compact()
            .with_target(false)
            .with_filter(env_filter)
            .boxed(),
    };

    tracing_subscriber::registry().with(log_layer).init();

    if let Some(error) = format_error {
        warn!("Ignoring RUST_LOG_FORMAT, falling back to {}: {error}", LogFormat::default());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_log_format() {
        assert_eq!("json".parse::<LogFormat>(), Ok(LogFormat::Json));
        assert_eq!("JSON".parse::<LogFormat>(), Ok(LogFormat::Json));
        assert_eq!("compact".parse::<LogFormat>(), Ok(LogFormat::Compact));
        assert_eq!("".parse::<LogFormat>(), Ok(LogFormat::Compact));
        assert!("yaml".parse::<LogFormat>().is_err());
    }
}
