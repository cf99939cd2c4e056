use std::path::PathBuf;

use clap::{ArgAction, Parser};
use logger::LogFormat;
use sitewatch::Config;
use tracing::level_filters::LevelFilter;

/// Probe websites on a schedule and report failures to a Discord webhook
#[derive(Debug, Parser)]
#[command(name = "sitewatch", version, about)]
pub struct Cli {
    /// Config file (defaults to $XDG_CONFIG_HOME/sitewatch/config.toml)
    #[arg(short, long, env = "SITEWATCH_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Site list with one `name, url` row per site
    #[arg(short, long, value_name = "PATH")]
    pub sites: Option<PathBuf>,

    /// Discord webhook URL, overrides the config file and DC_WEBHOOK_URL
    #[arg(long, value_name = "URL")]
    pub webhook_url: Option<String>,

    /// Seconds between two cycles
    #[arg(long, value_name = "SECS")]
    pub interval: Option<u64>,

    /// Probe timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Start the first cycle immediately
    #[arg(long)]
    pub now: bool,

    /// Run a single cycle and exit
    #[arg(long)]
    pub once: bool,

    /// Log failures instead of sending them to the webhook
    #[arg(long)]
    pub dry_run: bool,

    /// Print the effective configuration and exit
    #[arg(long)]
    pub print_config: bool,

    /// Write the effective configuration to PATH and exit
    #[arg(long, value_name = "PATH")]
    pub write_config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Log output format: compact or json (defaults to RUST_LOG_FORMAT)
    #[arg(long, value_name = "FORMAT")]
    pub log_format: Option<LogFormat>,
}

impl Cli {
    pub fn log_level(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::INFO,
            1 => LevelFilter::DEBUG,
            _ => LevelFilter::TRACE,
        }
    }

    /// Apply command line overrides on top of the file and environment config
    pub fn apply(&self, config: &mut Config) {
        if let Some(sites) = &self.sites {
            config.site_list = sites.clone();
            // An explicit file wins over inline sites
            config.sites.clear();
        }
        if let Some(url) = &self.webhook_url {
            config.webhook_url = Some(url.clone());
        }
        if let Some(interval) = self.interval {
            config.cycle_interval_secs = interval;
        }
        if let Some(timeout) = self.timeout {
            config.probe_timeout_secs = timeout;
        }
        if self.now {
            config.run_immediately = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;
    use sitewatch::Target;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_overrides() {
        let cli = Cli::try_parse_from([
            "sitewatch",
            "--sites",
            "prod.csv",
            "--interval",
            "60",
            "--timeout",
            "10",
            "--webhook-url",
            "https://discord.com/api/webhooks/1/abc",
            "--now",
        ])
        .unwrap();

        let mut config =
            Config { sites: vec![Target::new("Inline", "https://example.com")], ..Config::default() };
        cli.apply(&mut config);

        assert_eq!(config.site_list, PathBuf::from("prod.csv"));
        assert!(config.sites.is_empty());
        assert_eq!(config.cycle_interval_secs, 60);
        assert_eq!(config.probe_timeout_secs, 10);
        assert_eq!(config.webhook_url.as_deref(), Some("https://discord.com/api/webhooks/1/abc"));
        assert!(config.run_immediately);
    }

    #[test]
    fn test_no_flags_keep_config() {
        let cli = Cli::try_parse_from(["sitewatch"]).unwrap();

        let mut config = Config::default();
        cli.apply(&mut config);

        assert_eq!(config, Config::default());
        assert_eq!(cli.log_level(), LevelFilter::INFO);
    }

    #[test]
    fn test_verbosity_and_format() {
        let cli = Cli::try_parse_from(["sitewatch", "-vv", "--log-format", "json"]).unwrap();

        assert_eq!(cli.log_level(), LevelFilter::TRACE);
        assert_eq!(cli.log_format, Some(LogFormat::Json));
    }
}
