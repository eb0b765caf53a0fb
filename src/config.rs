use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::ranking::RankMode;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub feed: FeedConfig,
    #[serde(default)]
    pub refresh: RefreshConfig,
    #[serde(default)]
    pub ranking: RankingConfig,
    #[serde(default)]
    pub annotations: AnnotationsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeedConfig {
    #[serde(default = "default_gamma_url")]
    pub gamma_url: String,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RefreshConfig {
    #[serde(default = "default_interval")]
    pub interval_secs: u64,
    #[serde(default)]
    pub demo_only: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RankingConfig {
    #[serde(default)]
    pub default_mode: RankMode,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnnotationsConfig {
    /// JSON file of discussion threads; the demo threads are used when unset.
    #[serde(default)]
    pub path: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    /// `pretty` or `json`
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_gamma_url() -> String { "https://gamma-api.polymarket.com".to_string() }
fn default_request_timeout() -> u64 { 30 }
fn default_interval() -> u64 { 60 }
fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "pretty".to_string() }

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            gamma_url: default_gamma_url(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval(),
            demo_only: false,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

/// Overrides read from the environment (and `.env`).
#[derive(Debug, Clone, Default)]
pub struct EnvConfig {
    pub polymarket_gamma_url: Option<String>,
    pub demo_mode: Option<bool>,
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;

        Self::parse(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path))
    }

    /// Like [`Config::load`], but a missing file yields the defaults.
    /// Returns whether the file was found.
    pub fn load_or_default(path: &str) -> Result<(Self, bool)> {
        if Path::new(path).exists() {
            Ok((Self::load(path)?, true))
        } else {
            Ok((Self::default(), false))
        }
    }

    pub fn parse(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        Ok(config)
    }

    pub fn apply_env(&mut self, env: &EnvConfig) {
        if let Some(url) = &env.polymarket_gamma_url {
            self.feed.gamma_url = url.clone();
        }
        if let Some(demo) = env.demo_mode {
            self.refresh.demo_only = demo;
        }
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh.interval_secs.max(1))
    }

    /// Capped at the refresh interval so at most one request is ever pending.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.feed.request_timeout_secs.max(1)).min(self.refresh_interval())
    }
}

impl EnvConfig {
    pub fn load() -> Result<Self> {
        dotenv::dotenv().ok();

        let demo_mode = match std::env::var("DEMO_MODE") {
            Ok(value) => Some(
                value
                    .trim()
                    .parse::<bool>()
                    .with_context(|| format!("DEMO_MODE must be true or false, got '{}'", value))?,
            ),
            Err(_) => None,
        };

        Ok(Self {
            polymarket_gamma_url: std::env::var("POLYMARKET_GAMMA_URL").ok(),
            demo_mode,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.feed.gamma_url, "https://gamma-api.polymarket.com");
        assert_eq!(config.refresh.interval_secs, 60);
        assert!(!config.refresh.demo_only);
        assert_eq!(config.ranking.default_mode, RankMode::Trending);
        assert!(config.annotations.path.is_none());
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_parse_sections() {
        let config = Config::parse(
            r#"
            [feed]
            gamma_url = "http://localhost:8080"
            request_timeout_secs = 5

            [refresh]
            interval_secs = 120
            demo_only = true

            [ranking]
            default_mode = "odds"

            [annotations]
            path = "threads.json"

            [logging]
            level = "debug"
            format = "json"
            "#,
        )
        .unwrap();

        assert_eq!(config.feed.gamma_url, "http://localhost:8080");
        assert_eq!(config.request_timeout(), Duration::from_secs(5));
        assert_eq!(config.refresh_interval(), Duration::from_secs(120));
        assert!(config.refresh.demo_only);
        assert_eq!(config.ranking.default_mode, RankMode::Odds);
        assert_eq!(config.annotations.path.as_deref(), Some("threads.json"));
        assert_eq!(config.logging.format, "json");
    }

    #[test]
    fn test_unknown_mode_rejected() {
        assert!(Config::parse("[ranking]\ndefault_mode = \"hot\"").is_err());
    }

    #[test]
    fn test_timeout_never_exceeds_interval() {
        let config = Config::parse("[feed]\nrequest_timeout_secs = 90\n[refresh]\ninterval_secs = 60").unwrap();
        assert_eq!(config.request_timeout(), Duration::from_secs(60));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config::default();
        config.apply_env(&EnvConfig {
            polymarket_gamma_url: Some("http://mirror".to_string()),
            demo_mode: Some(true),
        });

        assert_eq!(config.feed.gamma_url, "http://mirror");
        assert!(config.refresh.demo_only);
    }

    #[test]
    fn test_missing_file() {
        assert!(Config::load("/nonexistent/config.toml").is_err());

        let (config, found) = Config::load_or_default("/nonexistent/config.toml").unwrap();
        assert!(!found);
        assert_eq!(config.refresh.interval_secs, 60);
    }

    #[test]
    fn test_shipped_config_matches_defaults() {
        let config = Config::parse(include_str!("../config.toml")).unwrap();
        let defaults = Config::default();
        assert_eq!(config.feed.gamma_url, defaults.feed.gamma_url);
        assert_eq!(config.refresh.interval_secs, defaults.refresh.interval_secs);
        assert_eq!(config.ranking.default_mode, defaults.ranking.default_mode);
        assert!(config.annotations.path.is_none());
    }
}
