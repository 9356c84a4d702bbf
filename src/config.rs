//! Configuration module
//!
//! Loads configuration from environment variables (after `.env` has been
//! read by the binary). Command-line flags override these values.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::ConfigError;
use crate::history::paths::default_history_path;

/// USGS summary feed: all M2.5+ events from the past day.
pub const DEFAULT_FEED_URL: &str =
    "https://earthquake.usgs.gov/earthquakes/feed/v1.0/summary/2.5_day.geojson";

pub const DEFAULT_LIMIT: usize = 50;

pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// GeoJSON endpoint to fetch from
    pub feed_url: String,

    /// Maximum number of events kept from a single fetch
    pub limit: usize,

    /// Per-request timeout
    pub request_timeout: Duration,

    /// Where the history file lives
    pub history_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            feed_url: DEFAULT_FEED_URL.to_string(),
            limit: DEFAULT_LIMIT,
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            history_path: default_history_path(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let feed_url = lookup("QUAKEBOARD_FEED_URL")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or(defaults.feed_url);

        let limit = match lookup("QUAKEBOARD_LIMIT") {
            Some(raw) => raw
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or(ConfigError::InvalidValue("QUAKEBOARD_LIMIT"))?,
            None => defaults.limit,
        };

        let request_timeout = match lookup("QUAKEBOARD_TIMEOUT_SECS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|n| *n > 0)
                .map(Duration::from_secs)
                .ok_or(ConfigError::InvalidValue("QUAKEBOARD_TIMEOUT_SECS"))?,
            None => defaults.request_timeout,
        };

        let history_path = lookup("QUAKEBOARD_HISTORY_FILE")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.history_path);

        Ok(Self {
            feed_url,
            limit,
            request_timeout,
            history_path,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_env_empty() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.feed_url, DEFAULT_FEED_URL);
        assert_eq!(config.limit, 50);
        assert_eq!(config.request_timeout, Duration::from_secs(10));
        assert!(config.history_path.ends_with("earthquake_history.json"));
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("QUAKEBOARD_FEED_URL", "https://example.com/feed.geojson"),
            ("QUAKEBOARD_LIMIT", "10"),
            ("QUAKEBOARD_TIMEOUT_SECS", "3"),
            ("QUAKEBOARD_HISTORY_FILE", "/tmp/quakes.json"),
        ]))
        .unwrap();

        assert_eq!(config.feed_url, "https://example.com/feed.geojson");
        assert_eq!(config.limit, 10);
        assert_eq!(config.request_timeout, Duration::from_secs(3));
        assert_eq!(config.history_path, PathBuf::from("/tmp/quakes.json"));
    }

    #[test]
    fn test_invalid_limit_rejected() {
        let result = Config::from_lookup(lookup_from(&[("QUAKEBOARD_LIMIT", "zero")]));
        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue("QUAKEBOARD_LIMIT"))
        ));

        let result = Config::from_lookup(lookup_from(&[("QUAKEBOARD_LIMIT", "0")]));
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_timeout_rejected() {
        let result = Config::from_lookup(lookup_from(&[("QUAKEBOARD_TIMEOUT_SECS", "-1")]));
        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue("QUAKEBOARD_TIMEOUT_SECS"))
        ));
    }
}
