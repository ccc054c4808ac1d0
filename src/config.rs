//! Configuration for the reader engine

use serde::Deserialize;
use std::env;
use std::time::Duration;

use crate::document::PAGE_SIZE;

/// Default lifetime of a cached artefact (30 minutes)
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(30 * 60);
/// Default period of the expiry sweep (2 minutes)
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(2 * 60);

pub const ENV_PAGE_SIZE: &str = "READER_PAGE_SIZE";
pub const ENV_CACHE_TTL_SECS: &str = "READER_CACHE_TTL_SECS";
pub const ENV_CACHE_SWEEP_SECS: &str = "READER_CACHE_SWEEP_SECS";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} must be a non-negative integer, got {value:?}")]
    Invalid { name: &'static str, value: String },

    #[error("{0} must be greater than zero")]
    Zero(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ReaderConfig {
    /// Minimum code points per page before snapping to whitespace
    pub page_size: usize,
    /// Lifetime of every cached artefact
    #[serde(rename = "cache_ttl_secs", with = "duration_secs")]
    pub cache_ttl: Duration,
    /// How often expired cache entries are removed
    #[serde(rename = "sweep_interval_secs", with = "duration_secs")]
    pub sweep_interval: Duration,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        ReaderConfig {
            page_size: PAGE_SIZE,
            cache_ttl: DEFAULT_CACHE_TTL,
            sweep_interval: DEFAULT_SWEEP_INTERVAL,
        }
    }
}

impl ReaderConfig {
    /// Load from the process environment (and `.env`, if present)
    ///
    /// Unset variables keep their defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let page_size = parse_var(&lookup, ENV_PAGE_SIZE)?.unwrap_or(defaults.page_size as u64);
        if page_size == 0 {
            return Err(ConfigError::Zero(ENV_PAGE_SIZE));
        }

        let cache_ttl = parse_var(&lookup, ENV_CACHE_TTL_SECS)?
            .map(Duration::from_secs)
            .unwrap_or(defaults.cache_ttl);

        let sweep_interval = match parse_var(&lookup, ENV_CACHE_SWEEP_SECS)? {
            Some(0) => return Err(ConfigError::Zero(ENV_CACHE_SWEEP_SECS)),
            Some(secs) => Duration::from_secs(secs),
            None => defaults.sweep_interval,
        };

        Ok(ReaderConfig {
            page_size: page_size as usize,
            cache_ttl,
            sweep_interval,
        })
    }
}

fn parse_var<F>(lookup: &F, name: &'static str) -> Result<Option<u64>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(name) else {
        return Ok(None);
    };
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    raw.parse().map(Some).map_err(|_| ConfigError::Invalid {
        name,
        value: raw.to_string(),
    })
}

mod duration_secs {
    use serde::{Deserialize, Deserializer};
    use std::time::Duration;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        u64::deserialize(deserializer).map(Duration::from_secs)
    }
}
