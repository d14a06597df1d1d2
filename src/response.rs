//! Response outcome.
//!
//! Created per call, consumed by the calling test. Body access is offered as
//! raw text and as parsed JSON; JSON parsing failure falls back to the raw
//! text rather than erroring, since not every endpoint answers JSON.

use crate::error::ApiError;
use crate::request::headermap_to_hashmap;
use crate::transport::TransportResponse;
use serde_json::Value;
use std::collections::HashMap;

/// Raw response plus accessors for its body.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    status: u16,
    headers: HashMap<String, String>,
    body: Vec<u8>,
}

impl ApiResponse {
    pub fn status(&self) -> u16 {
        self.status
    }

    /// 2xx from the transport's point of view; a 404 is still a completed
    /// call, judged separately by the validator.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Response headers with lowercased names.
    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_ascii_lowercase()).map(String::as_str)
    }

    pub fn body_bytes(&self) -> &[u8] {
        &self.body
    }

    /// Body as text (lossy on invalid UTF-8).
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Body parsed as JSON, falling back to the raw text as a JSON string
    /// when parsing fails. An empty body parses as `Value::Null`.
    pub fn body_value(&self) -> Value {
        if self.body.is_empty() {
            return Value::Null;
        }
        serde_json::from_slice(&self.body).unwrap_or_else(|_| Value::String(self.text()))
    }

    /// Typed decode of the body at an assertion seam.
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T, ApiError> {
        serde_json::from_slice(&self.body).map_err(ApiError::from)
    }
}

impl From<TransportResponse> for ApiResponse {
    fn from(raw: TransportResponse) -> Self {
        Self {
            status: raw.status,
            headers: headermap_to_hashmap(&raw.headers),
            body: raw.body,
        }
    }
}
