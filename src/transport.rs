//! HTTP transport abstraction.
//!
//! The client depends only on this narrow contract: one entry point taking a
//! composed [`RequestSpec`] and returning status, headers, and body bytes.
//! Production uses [`ReqwestTransport`]; tests inject synthetic transports.

use crate::error::ApiError;
use crate::request::RequestSpec;
use async_trait::async_trait;
use reqwest::header::HeaderMap;

/// Transport-level response data.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: u16,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl TransportResponse {
    /// Synthetic JSON response, for transports that fabricate replies.
    pub fn json(status: u16, body: &serde_json::Value) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(
            reqwest::header::CONTENT_TYPE,
            reqwest::header::HeaderValue::from_static("application/json"),
        );
        Self {
            status,
            headers,
            body: body.to_string().into_bytes(),
        }
    }

    /// Synthetic empty response (e.g. 204 No Content).
    pub fn empty(status: u16) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: Vec::new(),
        }
    }
}

/// Single transport entry point.
///
/// Implementations report only transport-level failures as errors; a
/// well-formed HTTP error response is a successful exchange.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn execute(&self, spec: &RequestSpec) -> Result<TransportResponse, ApiError>;
}

/// Production transport over `reqwest`.
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| ApiError::Configuration(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn execute(&self, spec: &RequestSpec) -> Result<TransportResponse, ApiError> {
        let mut builder = self
            .client
            .request(spec.method.clone(), &spec.url)
            .headers(spec.headers.clone())
            .timeout(spec.timeout);

        if !spec.query.is_empty() {
            builder = builder.query(&spec.query);
        }
        if let Some(body) = &spec.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(classify_send_error)?;

        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response
            .bytes()
            .await
            .map_err(|e| ApiError::Transport(format!("failed to read response body: {e}")))?
            .to_vec();

        Ok(TransportResponse {
            status,
            headers,
            body,
        })
    }
}

fn classify_send_error(error: reqwest::Error) -> ApiError {
    if error.is_timeout() {
        ApiError::Timeout(error.to_string())
    } else {
        ApiError::Transport(error.to_string())
    }
}
