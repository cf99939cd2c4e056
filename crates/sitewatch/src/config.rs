use std::{env, fmt, fs, path, time::Duration};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::error::Result;
use crate::notify::EmbedStyle;
use crate::sites::{load_site_list, validate_target_url};
use crate::target::Target;
use crate::{DEFAULT_CYCLE_INTERVAL, DEFAULT_PROBE_TIMEOUT, DEFAULT_SITE_LIST, WEBHOOK_URL_ENV};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    ReadFailed {
        path: path::PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write config {}: {source}", path.display())]
    WriteFailed {
        path: path::PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {}: {source}", path.display())]
    ParseFailed {
        path: path::PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("failed to serialize config: {0}")]
    SerializeFailed(#[from] toml::ser::Error),
    #[error("could not determine a config directory (set XDG_CONFIG_HOME or HOME)")]
    ConfigPathUnavailable,
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Discord webhook receiving failure notifications
    #[serde(skip_serializing_if = "Option::is_none")]
    pub webhook_url: Option<String>,

    /// CSV file with `name, url` rows, used when `sites` is empty
    pub site_list: path::PathBuf,

    pub probe_timeout_secs: u64,

    pub cycle_interval_secs: u64,

    /// Run the first cycle at startup instead of one interval later
    pub run_immediately: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,

    pub embed: EmbedStyle,

    /// Inline site list
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sites: Vec<Target>,
}

/// Used to ensure we are actually reading a toml file
fn normalize_toml_path(path: &path::Path) -> path::PathBuf {
    let mut path = path.to_path_buf();
    if path.extension().map(|ext| ext != "toml").unwrap_or(true) {
        path.set_extension("toml");
    }
    path
}

/// Get default config path ($XDG_CONFIG_HOME/sitewatch/config.toml or
/// $HOME/.config/...)
pub fn default_config_path() -> std::result::Result<path::PathBuf, ConfigError> {
    let path = if let Ok(config_home) = env::var("XDG_CONFIG_HOME") {
        path::PathBuf::from(config_home)
    } else if let Some(home_dir) = env::home_dir() {
        home_dir.join(".config")
    } else {
        return Err(ConfigError::ConfigPathUnavailable);
    };

    Ok(path.join("sitewatch/config.toml"))
}

impl Default for Config {
    fn default() -> Self {
        Self {
            webhook_url: None,
            site_list: DEFAULT_SITE_LIST.into(),
            probe_timeout_secs: DEFAULT_PROBE_TIMEOUT.as_secs(),
            cycle_interval_secs: DEFAULT_CYCLE_INTERVAL.as_secs(),
            run_immediately: false,
            user_agent: None,
            embed: EmbedStyle::default(),
            sites: Vec::new(),
        }
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let write_indented = |level: usize| {
            move |f: &mut fmt::Formatter<'_>, label: &str, value: &dyn fmt::Display| {
                writeln!(f, "  {:indent$}{}: {}", "", label, value, indent = level * 2)
            }
        };
        let write_title_indented = |level: usize| {
            move |f: &mut fmt::Formatter<'_>, label: &str| {
                writeln!(f, "{:indent$}{}", "", label, indent = level * 2)
            }
        };

        let write_title_1 = write_title_indented(1);
        let write_1 = write_indented(1);

        writeln!(f, "Current Sitewatch Configuration:")?;
        write_title_1(f, "Monitoring")?;
        write_1(f, "Probe Timeout", &format!("{}s", self.probe_timeout_secs))?;
        write_1(f, "Cycle Interval", &format!("{}s", self.cycle_interval_secs))?;
        write_1(f, "Run Immediately", &self.run_immediately)?;
        if self.sites.is_empty() {
            write_1(f, "Site List", &self.site_list.display())?;
        } else {
            write_1(f, "Inline Sites", &self.sites.len())?;
        }
        write_title_1(f, "Notification")?;
        let webhook = self.webhook_url.as_deref().map(redact_webhook);
        write_1(f, "Webhook", &webhook.as_deref().unwrap_or("(not set)"))?;
        write_1(f, "Title", &self.embed.title)?;

        Ok(())
    }
}

/// Keep the host of a webhook URL but hide its token
fn redact_webhook(raw: &str) -> String {
    match Url::parse(raw) {
        Ok(url) => format!("{}://{}/…", url.scheme(), url.host_str().unwrap_or_default()),
        Err(_) => "(invalid)".into(),
    }
}

impl Config {
    /// Generate Config structure from file
    ///
    /// Reads the specified path, or ~/.config/sitewatch/config.toml when none
    /// is given. Only a missing default file yields the default configuration;
    /// a missing explicit path is an error.
    ///
    /// ```no_run
    /// let cfg = sitewatch::Config::from_config(None::<&std::path::Path>)?;
    /// println!("{}", cfg);
    /// # Ok::<(), sitewatch::config::ConfigError>(())
    /// ```
    pub fn from_config(
        optional_path: Option<impl AsRef<path::Path>>,
    ) -> std::result::Result<Self, ConfigError> {
        let explicit = optional_path.is_some();
        let config_path: path::PathBuf = if let Some(path) = optional_path {
            normalize_toml_path(path.as_ref())
        } else {
            default_config_path()?
        };

        if explicit || config_path.exists() {
            let raw_string = fs::read_to_string(&config_path)
                .map_err(|source| ConfigError::ReadFailed { path: config_path.clone(), source })?;
            toml::from_str(raw_string.as_str())
                .map_err(|source| ConfigError::ParseFailed { path: config_path, source })
        } else {
            debug!("No config at {}, using defaults", config_path.display());
            Ok(Self::default())
        }
    }

    /// Serialize and write a config to a file
    pub fn write_config(&self, path: &path::Path) -> std::result::Result<(), ConfigError> {
        let config_str: String = toml::to_string_pretty(self)?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|source| ConfigError::WriteFailed { path: path.to_path_buf(), source })?;
        }

        fs::write(path, config_str)
            .map_err(|source| ConfigError::WriteFailed { path: path.to_path_buf(), source })
    }

    /// Apply overrides from the environment (and `.env`)
    pub fn apply_env(&mut self) {
        self.apply_env_with(|key| dotenvy::var(key).ok());
    }

    /// Apply overrides read through `lookup`
    pub fn apply_env_with(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(WEBHOOK_URL_ENV) {
            if !url.trim().is_empty() {
                self.webhook_url = Some(url.trim().to_string());
            }
        }
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }

    pub fn cycle_interval(&self) -> Duration {
        Duration::from_secs(self.cycle_interval_secs)
    }

    /// Check values that would otherwise only fail once monitoring starts
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.probe_timeout_secs == 0 {
            return Err(ConfigError::Invalid("probe_timeout_secs must be positive".into()));
        }
        if self.cycle_interval_secs == 0 {
            return Err(ConfigError::Invalid("cycle_interval_secs must be positive".into()));
        }
        if let Some(webhook) = &self.webhook_url {
            validate_target_url(webhook)
                .map_err(|reason| ConfigError::Invalid(format!("webhook_url: {reason}")))?;
        }
        for site in &self.sites {
            validate_target_url(&site.url)
                .map_err(|reason| ConfigError::Invalid(format!("site {}: {reason}", site.name)))?;
        }
        Ok(())
    }

    /// Targets to monitor: the inline list if present, the site list file otherwise
    pub fn load_targets(&self) -> Result<Vec<Target>> {
        if !self.sites.is_empty() {
            return Ok(self.sites.clone());
        }
        load_site_list(&self.site_list)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();

        assert_eq!(config.probe_timeout(), Duration::from_secs(4));
        assert_eq!(config.cycle_interval(), Duration::from_secs(30));
        assert_eq!(config.site_list, path::PathBuf::from("site.csv"));
        assert!(config.webhook_url.is_none());
        assert!(!config.run_immediately);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: Config = toml::from_str(
            r#"
            cycle_interval_secs = 60

            [embed]
            title = "網站異常"

            [[sites]]
            name = "Example"
            url = "https://example.com"
            "#,
        )
        .unwrap();

        assert_eq!(config.cycle_interval_secs, 60);
        assert_eq!(config.probe_timeout_secs, 4);
        assert_eq!(config.embed.title, "網站異常");
        assert_eq!(config.embed.labels.name, "Name");
        assert_eq!(config.sites, vec![Target::new("Example", "https://example.com")]);
    }

    #[test]
    fn test_normalize_toml_path() {
        assert_eq!(normalize_toml_path(path::Path::new("cfg")), path::PathBuf::from("cfg.toml"));
        assert_eq!(
            normalize_toml_path(path::Path::new("cfg.toml")),
            path::PathBuf::from("cfg.toml")
        );
    }

    #[test]
    fn test_validate_rejects_zero_interval() {
        let config = Config { cycle_interval_secs: 0, ..Config::default() };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_validate_rejects_bad_inline_site() {
        let config = Config { sites: vec![Target::new("Bad", "not a url")], ..Config::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_inline_sites_take_precedence() {
        let config = Config {
            site_list: "/does/not/exist.csv".into(),
            sites: vec![Target::new("Inline", "https://inline.example.com")],
            ..Config::default()
        };

        let targets = config.load_targets().unwrap();
        assert_eq!(targets[0].name, "Inline");
    }

    #[test]
    fn test_env_overrides_webhook() {
        let mut config = Config::default();
        config.apply_env_with(|key| {
            (key == WEBHOOK_URL_ENV).then(|| " https://discord.com/api/webhooks/9/env ".to_string())
        });

        assert_eq!(config.webhook_url.as_deref(), Some("https://discord.com/api/webhooks/9/env"));
    }

    #[test]
    fn test_blank_env_keeps_file_webhook() {
        let mut config =
            Config { webhook_url: Some("https://discord.com/api/webhooks/1/file".into()), ..Config::default() };
        config.apply_env_with(|_| Some("  ".to_string()));

        assert_eq!(config.webhook_url.as_deref(), Some("https://discord.com/api/webhooks/1/file"));
    }

    #[test]
    fn test_display_redacts_webhook() {
        let config = Config {
            webhook_url: Some("https://discord.com/api/webhooks/123/secret-token".into()),
            ..Config::default()
        };

        let rendered = config.to_string();
        assert!(rendered.contains("https://discord.com/"));
        assert!(!rendered.contains("secret-token"));
    }
}
