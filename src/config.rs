use crate::constants::{
    DEFAULT_BASE_COST, DEFAULT_MESSAGES_URL, DEFAULT_REPORTS_URL, DEFAULT_REQUEST_TIMEOUT,
    DEFAULT_VOWELS,
};
use crate::error::{Result, UsageError};
use crate::scoring::ScoringConfig;
use crate::types::Credits;
use std::time::Duration;

pub const ENV_MESSAGES_URL: &str = "USAGE_MESSAGES_URL";
pub const ENV_REPORTS_URL: &str = "USAGE_REPORTS_URL";
pub const ENV_BASE_COST: &str = "USAGE_BASE_COST";
pub const ENV_VOWELS: &str = "USAGE_VOWELS";
pub const ENV_MAX_CONCURRENT_LOOKUPS: &str = "USAGE_MAX_CONCURRENT_LOOKUPS";
pub const ENV_REQUEST_TIMEOUT_SECS: &str = "USAGE_REQUEST_TIMEOUT_SECS";

/// Runtime configuration for the usage pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub messages_url: String,
    pub reports_url: String,
    pub scoring: ScoringConfig,
    /// `None` lets every lookup run at once
    pub max_concurrent_lookups: Option<usize>,
    pub request_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            messages_url: DEFAULT_MESSAGES_URL.to_string(),
            reports_url: DEFAULT_REPORTS_URL.to_string(),
            scoring: ScoringConfig::default(),
            max_concurrent_lookups: None,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl Config {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load configuration from any variable source; unset variables fall
    /// back to defaults and malformed ones are reported.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

        let base_cost = match get(ENV_BASE_COST) {
            Some(raw) => {
                let cost = raw
                    .parse::<Credits>()
                    .map_err(|e| config_error(ENV_BASE_COST, &raw, &e.to_string()))?;
                if cost.is_negative() {
                    return Err(config_error(ENV_BASE_COST, &raw, "must not be negative"));
                }
                cost
            }
            None => DEFAULT_BASE_COST,
        };

        let vowels = match get(ENV_VOWELS) {
            Some(raw) => raw,
            None => DEFAULT_VOWELS.to_string(),
        };

        let max_concurrent_lookups = match get(ENV_MAX_CONCURRENT_LOOKUPS) {
            Some(raw) => match raw.trim().parse::<usize>() {
                Ok(0) | Err(_) => {
                    return Err(config_error(
                        ENV_MAX_CONCURRENT_LOOKUPS,
                        &raw,
                        "expected a positive integer",
                    ));
                }
                Ok(n) => Some(n),
            },
            None => None,
        };

        let request_timeout = match get(ENV_REQUEST_TIMEOUT_SECS) {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(0) | Err(_) => {
                    return Err(config_error(
                        ENV_REQUEST_TIMEOUT_SECS,
                        &raw,
                        "expected a positive number of seconds",
                    ));
                }
                Ok(secs) => Duration::from_secs(secs),
            },
            None => defaults.request_timeout,
        };

        Ok(Self {
            messages_url: get(ENV_MESSAGES_URL).unwrap_or(defaults.messages_url),
            reports_url: get(ENV_REPORTS_URL).unwrap_or(defaults.reports_url),
            scoring: ScoringConfig::new(base_cost, &vowels),
            max_concurrent_lookups,
            request_timeout,
        })
    }
}

fn config_error(var: &str, value: &str, reason: &str) -> UsageError {
    UsageError::Config {
        var: var.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}
