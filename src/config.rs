//! Environment-driven configuration.

use crate::error::SyncError;
use crate::mlb::DEFAULT_TRANSACTIONS_URL;
use crate::sync::{DEFAULT_FLUSH_THRESHOLD, DEFAULT_MAX_CONCURRENT};
use figment::Figment;
use figment::providers::Env;
use fundu::DurationParser;
use serde::{Deserialize, Deserializer};
use std::time::Duration;

/// Older deployments export the connection string under this name.
const LEGACY_DATABASE_URL_KEY: &str = "DB_CONNECTION_STRING";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// PostgreSQL connection string.
    pub database_url: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_mlb_api_url")]
    pub mlb_api_url: String,
    /// Per-request timeout, e.g. `30s` or `1m`. Bare numbers are seconds.
    #[serde(default = "default_api_timeout", deserialize_with = "deserialize_duration")]
    pub api_timeout: Duration,
    #[serde(default = "default_max_concurrent_requests")]
    pub max_concurrent_requests: usize,
    #[serde(default = "default_flush_threshold")]
    pub flush_threshold: usize,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_mlb_api_url() -> String {
    DEFAULT_TRANSACTIONS_URL.to_string()
}

fn default_api_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_max_concurrent_requests() -> usize {
    DEFAULT_MAX_CONCURRENT
}

fn default_flush_threshold() -> usize {
    DEFAULT_FLUSH_THRESHOLD
}

fn deserialize_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Seconds(u64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Seconds(secs) => Ok(Duration::from_secs(secs)),
        Raw::Text(text) => parse_duration(&text).map_err(serde::de::Error::custom),
    }
}

fn parse_duration(text: &str) -> Result<Duration, String> {
    let parsed = DurationParser::with_all_time_units()
        .parse(text.trim())
        .map_err(|e| format!("invalid duration '{text}': {e}"))?;
    Duration::try_from(parsed).map_err(|e| format!("invalid duration '{text}': {e}"))
}

impl Config {
    /// Extract from the process environment.
    ///
    /// `DB_CONNECTION_STRING` is only used when `DATABASE_URL` is unset.
    pub fn load() -> Result<Self, SyncError> {
        Self::from_figment(
            Figment::new()
                .merge(
                    Env::raw()
                        .only(&[LEGACY_DATABASE_URL_KEY])
                        .map(|_| "DATABASE_URL".into()),
                )
                .merge(Env::raw().ignore(&[LEGACY_DATABASE_URL_KEY])),
        )
    }

    fn from_figment(figment: Figment) -> Result<Self, SyncError> {
        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), SyncError> {
        if self.database_url.trim().is_empty() {
            return Err(SyncError::Configuration(
                "DATABASE_URL is empty".to_string(),
            ));
        }
        if self.max_concurrent_requests == 0 {
            return Err(SyncError::Configuration(
                "MAX_CONCURRENT_REQUESTS must be at least 1".to_string(),
            ));
        }
        if self.flush_threshold == 0 {
            return Err(SyncError::Configuration(
                "FLUSH_THRESHOLD must be at least 1".to_string(),
            ));
        }
        if self.api_timeout.is_zero() {
            return Err(SyncError::Configuration(
                "API_TIMEOUT must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
