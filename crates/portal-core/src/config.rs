//! Client Configuration
//!
//! Backend base URL and timer settings, read through a key lookup so the web
//! app can feed compile-time values and tests can feed a map.

use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "http://localhost:3000";
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 5000;
pub const DEFAULT_FLASH_TIMEOUT_MS: u64 = 2500;

pub const API_BASE_KEY: &str = "PORTAL_API_BASE";
pub const POLL_INTERVAL_KEY: &str = "PORTAL_POLL_INTERVAL_MS";
pub const FLASH_TIMEOUT_KEY: &str = "PORTAL_FLASH_TIMEOUT_MS";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("backend base URL is empty")]
    EmptyBaseUrl,
    #[error("backend base URL must be an http(s) URL with a host")]
    InvalidBaseUrl,
    #[error("{key} must be a positive number of milliseconds, got {value:?}")]
    InvalidInterval { key: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_base: String,
    pub poll_interval: Duration,
    pub flash_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            flash_timeout: Duration::from_millis(DEFAULT_FLASH_TIMEOUT_MS),
        }
    }
}

impl ClientConfig {
    /// Build from a key lookup; missing or blank keys take their defaults
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let value = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_base = match value(API_BASE_KEY) {
            Some(raw) => normalize_base_url(&raw)?,
            None => DEFAULT_API_BASE.to_string(),
        };
        let poll_interval = millis(POLL_INTERVAL_KEY, value(POLL_INTERVAL_KEY), DEFAULT_POLL_INTERVAL_MS)?;
        let flash_timeout = millis(FLASH_TIMEOUT_KEY, value(FLASH_TIMEOUT_KEY), DEFAULT_FLASH_TIMEOUT_MS)?;

        Ok(Self {
            api_base,
            poll_interval,
            flash_timeout,
        })
    }
}

fn millis(key: &'static str, raw: Option<String>, default: u64) -> Result<Duration, ConfigError> {
    let Some(raw) = raw else {
        return Ok(Duration::from_millis(default));
    };
    match raw.trim().parse::<u64>() {
        Ok(ms) if ms > 0 => Ok(Duration::from_millis(ms)),
        _ => Err(ConfigError::InvalidInterval { key, value: raw }),
    }
}

/// Trim whitespace and trailing slashes and require an http(s) URL with a host
pub fn normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(ConfigError::EmptyBaseUrl);
    }
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(ConfigError::InvalidBaseUrl);
    }
    let Some((_, remainder)) = trimmed.split_once("://") else {
        return Err(ConfigError::InvalidBaseUrl);
    };
    if remainder.trim().is_empty() || remainder.starts_with('/') {
        return Err(ConfigError::InvalidBaseUrl);
    }
    Ok(trimmed.to_string())
}
