//! Configuration management for streamfan
//!
//! Handles config file loading/saving and environment overrides.
//! Config is stored at ~/.config/streamfan/config.toml

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::aggregator::DEFAULT_DEADLINE;
use crate::api::{DEFAULT_BASE_URL, DEFAULT_REQUEST_TIMEOUT};
use crate::models::Language;

/// Overrides the service base URL
pub const ENV_BASE_URL: &str = "STREAMFAN_BASE_URL";
/// Overrides the aggregation deadline, in seconds
pub const ENV_DEADLINE_SECS: &str = "STREAMFAN_DEADLINE_SECS";

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Service hosting the catalog proxy, extraction and playback proxy endpoints
    pub base_url: Option<String>,
    /// Wall-clock deadline for one aggregation
    pub deadline_secs: Option<u64>,
    /// Timeout for a single upstream HTTP call
    pub request_timeout_secs: Option<u64>,
    /// Language to keep when the caller does not ask for one
    pub preferred_language: Option<Language>,
}

impl Config {
    /// Get config file path (~/.config/streamfan/config.toml)
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("streamfan").join("config.toml"))
    }

    /// Load config from the default location, or return default if not found.
    /// Environment overrides are applied on top.
    pub fn load() -> Self {
        let mut config: Config = Self::path()
            .and_then(|p| std::fs::read_to_string(p).ok())
            .and_then(|s| toml::from_str(&s).ok())
            .unwrap_or_default();
        config.apply_env();
        config
    }

    /// Load config from an explicit file; unlike [`load`](Self::load) a
    /// missing or malformed file is an error
    pub fn load_from(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let mut config: Config = toml::from_str(&text)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;
        config.apply_env();
        Ok(config)
    }

    /// Apply environment variable overrides
    pub fn apply_env(&mut self) {
        if let Ok(url) = std::env::var(ENV_BASE_URL) {
            if !url.trim().is_empty() {
                self.base_url = Some(url);
            }
        }
        if let Some(secs) = std::env::var(ENV_DEADLINE_SECS)
            .ok()
            .and_then(|s| s.trim().parse().ok())
        {
            self.deadline_secs = Some(secs);
        }
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    pub fn deadline(&self) -> Duration {
        self.deadline_secs
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_DEADLINE)
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout_secs
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(config.base_url.is_none());
        assert_eq!(config.base_url(), DEFAULT_BASE_URL);
        assert_eq!(config.deadline(), Duration::from_secs(10));
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_config_toml() {
        let config: Config = toml::from_str(
            r#"
            base_url = "http://localhost:5000"
            deadline_secs = 4
            preferred_language = "VOSTFR"
            "#,
        )
        .unwrap();
        assert_eq!(config.base_url(), "http://localhost:5000");
        assert_eq!(config.deadline(), Duration::from_secs(4));
        assert_eq!(config.preferred_language, Some(Language::Vostfr));
    }

    #[test]
    fn test_load_applies_env_overrides() {
        std::env::set_var(ENV_BASE_URL, "http://127.0.0.1:7000");
        let config = Config::load();
        std::env::remove_var(ENV_BASE_URL);
        assert_eq!(config.base_url(), "http://127.0.0.1:7000");
    }

    #[test]
    fn test_load_from_missing_file_errors() {
        assert!(Config::load_from(Path::new("/nonexistent/streamfan.toml")).is_err());
    }
}
