//! Client configuration.
//!
//! All knobs carry documented defaults and can be overridden from the
//! environment (`REQPROBE_*`) or through the builder. Per-call options
//! override everything here.

use crate::error::ApiError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// Compile-time defaults, overridable via environment or builder.
pub mod defaults {
    use std::time::Duration;

    pub const BASE_URL: &str = "https://reqres.in";
    /// Demo API key sent as `x-api-key` on every call.
    pub const API_KEY: &str = "reqres-free-v1";
    pub const TIMEOUT: Duration = Duration::from_millis(15_000);
    pub const RETRY_COUNT: u32 = 2;
    pub const INITIAL_BACKOFF: Duration = Duration::from_millis(250);
    /// Ceiling applied to the exponential backoff schedule.
    pub const MAX_BACKOFF: Duration = Duration::from_secs(30);
}

/// Environment variable names recognized by [`ClientConfig::from_env`].
pub mod env {
    pub const BASE_URL: &str = "REQPROBE_BASE_URL";
    pub const API_KEY: &str = "REQPROBE_API_KEY";
    pub const TIMEOUT_MS: &str = "REQPROBE_TIMEOUT_MS";
    pub const RETRY_COUNT: &str = "REQPROBE_RETRY_COUNT";
    pub const BACKOFF_MS: &str = "REQPROBE_BACKOFF_MS";
}

/// Configuration owned by one [`crate::client::ApiClient`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL that relative targets are joined onto.
    pub base_url: String,
    /// Value of the `x-api-key` default header; `None` omits the header.
    pub api_key: Option<String>,
    /// Transport-level timeout applied when a call has no override.
    #[serde(with = "duration_millis_serde")]
    pub default_timeout: Duration,
    /// Number of retries after the first attempt (total tries = count + 1).
    pub retry_count: u32,
    /// Delay before the first retry; doubles on each subsequent one.
    #[serde(with = "duration_millis_serde")]
    pub initial_backoff: Duration,
    /// Extra default headers merged beneath the built-in set.
    pub headers: HashMap<String, String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::BASE_URL.to_string(),
            api_key: Some(defaults::API_KEY.to_string()),
            default_timeout: defaults::TIMEOUT,
            retry_count: defaults::RETRY_COUNT,
            initial_backoff: defaults::INITIAL_BACKOFF,
            headers: HashMap::new(),
        }
    }
}

impl ClientConfig {
    /// Returns a builder for constructing `ClientConfig`.
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// Build a configuration from the `REQPROBE_*` environment variables,
    /// falling back to the documented defaults.
    ///
    /// A present-but-malformed numeric variable is a configuration error,
    /// not a silent fallback.
    pub fn from_env() -> Result<Self, ApiError> {
        let base = Self::default();
        Ok(Self {
            base_url: std::env::var(env::BASE_URL).unwrap_or(base.base_url),
            api_key: std::env::var(env::API_KEY).ok().or(base.api_key),
            default_timeout: parse_millis(
                env::TIMEOUT_MS,
                std::env::var(env::TIMEOUT_MS).ok().as_deref(),
                base.default_timeout,
            )?,
            retry_count: parse_u32(
                env::RETRY_COUNT,
                std::env::var(env::RETRY_COUNT).ok().as_deref(),
                base.retry_count,
            )?,
            initial_backoff: parse_millis(
                env::BACKOFF_MS,
                std::env::var(env::BACKOFF_MS).ok().as_deref(),
                base.initial_backoff,
            )?,
            headers: base.headers,
        })
    }
}

fn parse_millis(name: &str, raw: Option<&str>, default: Duration) -> Result<Duration, ApiError> {
    match raw {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse::<u64>()
            .map(Duration::from_millis)
            .map_err(|e| ApiError::Configuration(format!("invalid {name}={value:?}: {e}"))),
    }
}

fn parse_u32(name: &str, raw: Option<&str>, default: u32) -> Result<u32, ApiError> {
    match raw {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse::<u32>()
            .map_err(|e| ApiError::Configuration(format!("invalid {name}={value:?}: {e}"))),
    }
}

// Helper module for millisecond Duration serialization
mod duration_millis_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        (duration.as_millis() as u64).serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}

/// Builder for `ClientConfig` to construct configuration in a unified way.
#[derive(Debug, Clone, Default)]
pub struct ClientConfigBuilder {
    base_url: Option<String>,
    api_key: Option<Option<String>>,
    default_timeout: Option<Duration>,
    retry_count: Option<u32>,
    initial_backoff: Option<Duration>,
    headers: HashMap<String, String>,
}

impl ClientConfigBuilder {
    pub fn base_url<S: Into<String>>(mut self, base_url: S) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn api_key<S: Into<String>>(mut self, api_key: S) -> Self {
        self.api_key = Some(Some(api_key.into()));
        self
    }

    /// Omit the `x-api-key` default header entirely.
    pub fn without_api_key(mut self) -> Self {
        self.api_key = Some(None);
        self
    }

    pub fn default_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = Some(timeout);
        self
    }

    pub fn retry_count(mut self, retry_count: u32) -> Self {
        self.retry_count = Some(retry_count);
        self
    }

    pub fn initial_backoff(mut self, backoff: Duration) -> Self {
        self.initial_backoff = Some(backoff);
        self
    }

    pub fn header<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    pub fn build(self) -> ClientConfig {
        let base = ClientConfig::default();
        ClientConfig {
            base_url: self.base_url.unwrap_or(base.base_url),
            api_key: self.api_key.unwrap_or(base.api_key),
            default_timeout: self.default_timeout.unwrap_or(base.default_timeout),
            retry_count: self.retry_count.unwrap_or(base.retry_count),
            initial_backoff: self.initial_backoff.unwrap_or(base.initial_backoff),
            headers: self.headers,
        }
    }
}
