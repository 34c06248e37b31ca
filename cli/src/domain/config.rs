//! Domain types and validators for studioctl configuration.
//!
//! Pure functions only: no I/O, no async, no filesystem access.

use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use studio_common::{DEFAULT_REGIONS, validate_region};

use crate::domain::error::ConfigError;
use crate::domain::retry::{PollPolicy, RetryPolicy};

// ── Constants ────────────────────────────────────────────────────────────────

pub const VALID_CONFIG_KEYS: &[&str] = &[
    "regions",
    "poll.interval_secs",
    "poll.max_attempts",
    "retry.max_attempts",
    "retry.base_delay_ms",
    "cache.enabled",
];

// ── Config schema ────────────────────────────────────────────────────────────

/// Top-level configuration stored in `~/.studioctl/config.yaml`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct StudioConfig {
    /// Regions scanned by `domains` and offered by other commands.
    pub regions: Vec<String>,
    /// Session readiness polling.
    pub poll: PollConfig,
    /// Retry of list/describe calls.
    pub retry: RetryConfig,
    /// Result cache.
    pub cache: CacheConfig,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            regions: DEFAULT_REGIONS.iter().map(ToString::to_string).collect(),
            poll: PollConfig::default(),
            retry: RetryConfig::default(),
            cache: CacheConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PollConfig {
    pub interval_secs: u64,
    pub max_attempts: u32,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval_secs: 2,
            max_attempts: 150,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub base_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 200,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CacheConfig {
    pub enabled: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl StudioConfig {
    /// Retry policy for list/describe calls.
    #[must_use]
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.retry.max_attempts,
            Duration::from_millis(self.retry.base_delay_ms),
        )
    }

    /// Bounded polling policy for the session readiness loop.
    #[must_use]
    pub fn poll_policy(&self) -> PollPolicy {
        PollPolicy {
            interval: Duration::from_secs(self.poll.interval_secs),
            max_attempts: self.poll.max_attempts,
        }
    }

    /// Validates and stores one `key = value` pair.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value does not parse.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        validate_config_key(key)?;
        validate_config_value(key, value)?;
        match key {
            "regions" => self.regions = split_regions(value),
            "poll.interval_secs" => self.poll.interval_secs = parse_positive(key, value)?,
            "poll.max_attempts" => self.poll.max_attempts = parse_positive(key, value)?,
            "retry.max_attempts" => self.retry.max_attempts = parse_positive(key, value)?,
            "retry.base_delay_ms" => self.retry.base_delay_ms = parse_positive(key, value)?,
            "cache.enabled" => self.cache.enabled = value == "true",
            _ => anyhow::bail!("Unknown setting: {key}"),
        }
        Ok(())
    }

    /// Current value of a key, rendered the way `set` accepts it.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        Some(match key {
            "regions" => self.regions.join(","),
            "poll.interval_secs" => self.poll.interval_secs.to_string(),
            "poll.max_attempts" => self.poll.max_attempts.to_string(),
            "retry.max_attempts" => self.retry.max_attempts.to_string(),
            "retry.base_delay_ms" => self.retry.base_delay_ms.to_string(),
            "cache.enabled" => self.cache.enabled.to_string(),
            _ => return None,
        })
    }
}

// ── Validators ───────────────────────────────────────────────────────────────

/// Validates a configuration key against the whitelist.
///
/// # Errors
///
/// Returns an error if the key is not in the allowed list.
pub fn validate_config_key(key: &str) -> Result<()> {
    if !VALID_CONFIG_KEYS.contains(&key) {
        return Err(ConfigError::UnknownKey {
            key: key.to_string(),
            valid: VALID_CONFIG_KEYS.join(", "),
        }
        .into());
    }
    Ok(())
}

/// Validates a configuration value for the given key.
///
/// # Errors
///
/// Returns an error if the value is not valid for the key.
pub fn validate_config_value(key: &str, value: &str) -> Result<()> {
    let invalid = |expected: &str| ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
        expected: expected.to_string(),
    };

    match key {
        "regions" => {
            let regions = split_regions(value);
            if regions.is_empty() {
                return Err(invalid("comma-separated region list, e.g. us-east-1,us-west-2").into());
            }
            for region in &regions {
                validate_region(region)?;
            }
        }
        "poll.interval_secs" | "poll.max_attempts" | "retry.max_attempts"
        | "retry.base_delay_ms" => {
            if !value.parse::<u64>().is_ok_and(|n| n > 0) {
                return Err(invalid("positive integer").into());
            }
        }
        "cache.enabled" => {
            if value != "true" && value != "false" {
                return Err(invalid("true, false").into());
            }
        }
        _ => {}
    }
    Ok(())
}

fn split_regions(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .map(ToString::to_string)
        .collect()
}

fn parse_positive<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value.parse::<T>().map_err(|_| {
        ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
            expected: "positive integer".to_string(),
        }
        .into()
    })
}

// ── Unit tests ───────────────────────────────────────────────────────────────
