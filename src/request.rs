//! Request composition.
//!
//! [`build_request`] merges built-in defaults, the stored bearer token, and
//! per-call overrides into a fully-specified [`RequestSpec`]. Precedence is
//! fixed: defaults < bearer token < per-call overrides. Pure construction,
//! no I/O.

use crate::config::ClientConfig;
use crate::error::ApiError;
use reqwest::Method;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use std::collections::HashMap;
use std::time::Duration;

/// Query parameter value: the wire format only carries strings, but call
/// sites hand over strings or numbers.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Str(String),
    Int(i64),
}

impl ParamValue {
    pub fn render(&self) -> String {
        match self {
            Self::Str(s) => s.clone(),
            Self::Int(n) => n.to_string(),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<u32> for ParamValue {
    fn from(value: u32) -> Self {
        Self::Int(i64::from(value))
    }
}

/// Per-call configuration, immutable once passed to the client.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// Header overrides merged over defaults and the injected token.
    pub headers: HashMap<String, String>,
    /// Query parameters appended to the URL.
    pub params: Vec<(String, ParamValue)>,
    /// Per-call timeout, overriding the client default.
    pub timeout: Option<Duration>,
    /// Treat any non-2xx response as an error instead of returning it.
    pub strict_status: bool,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn header<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    pub fn param<K: Into<String>, V: Into<ParamValue>>(mut self, key: K, value: V) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn strict_status(mut self, strict: bool) -> Self {
        self.strict_status = strict;
        self
    }
}

/// Fully composed request description, ready for the transport.
#[derive(Debug, Clone)]
pub struct RequestSpec {
    pub method: Method,
    pub url: String,
    pub headers: HeaderMap,
    pub query: Vec<(String, String)>,
    /// Attached only when the caller provided a body.
    pub body: Option<serde_json::Value>,
    pub timeout: Duration,
}

/// Compose the final request description.
///
/// Header precedence on name collision: later insertion wins, so defaults
/// are applied first, then the bearer token, then per-call overrides.
pub fn build_request(
    config: &ClientConfig,
    bearer_token: Option<&str>,
    method: Method,
    target: &str,
    body: Option<serde_json::Value>,
    options: &RequestOptions,
) -> Result<RequestSpec, ApiError> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    if let Some(api_key) = &config.api_key {
        headers.insert(
            HeaderName::from_static("x-api-key"),
            HeaderValue::from_str(api_key)
                .map_err(|e| ApiError::Configuration(format!("invalid API key value: {e}")))?,
        );
    }
    apply_extra_headers(&mut headers, &config.headers)?;

    if let Some(token) = bearer_token {
        let auth_value = format!("Bearer {token}");
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&auth_value)
                .map_err(|e| ApiError::Configuration(format!("invalid bearer token: {e}")))?,
        );
    }

    apply_extra_headers(&mut headers, &options.headers)?;

    let query = options
        .params
        .iter()
        .map(|(k, v)| (k.clone(), v.render()))
        .collect();

    Ok(RequestSpec {
        method,
        url: resolve_target(&config.base_url, target),
        headers,
        query,
        body,
        timeout: options.timeout.unwrap_or(config.default_timeout),
    })
}

/// Apply extra headers onto a `HeaderMap`, later entries overriding earlier
/// ones with the same name.
pub fn apply_extra_headers(
    base: &mut HeaderMap,
    extra: &HashMap<String, String>,
) -> Result<(), ApiError> {
    for (key, value) in extra {
        let name = HeaderName::from_bytes(key.as_bytes())
            .map_err(|e| ApiError::Configuration(format!("invalid header name '{key}': {e}")))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| ApiError::Configuration(format!("invalid header value '{value}': {e}")))?;
        base.insert(name, value);
    }
    Ok(())
}

/// Convert a `HeaderMap` to a plain map (lowercased keys). Non-UTF-8 header
/// values are filtered out.
pub fn headermap_to_hashmap(headers: &HeaderMap) -> HashMap<String, String> {
    headers
        .iter()
        .filter_map(|(k, v)| {
            v.to_str()
                .ok()
                .map(|v_str| (k.as_str().to_string(), v_str.to_string()))
        })
        .collect()
}

/// Absolute URLs pass through; anything else joins onto the base URL.
fn resolve_target(base_url: &str, target: &str) -> String {
    if target.starts_with("http://") || target.starts_with("https://") {
        target.to_string()
    } else {
        format!(
            "{}/{}",
            base_url.trim_end_matches('/'),
            target.trim_start_matches('/')
        )
    }
}
