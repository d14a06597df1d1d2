//! Error taxonomy for the request client.
//!
//! Transport-level failures are retryable; everything else is terminal for
//! the call (or the test) that observed it.

use thiserror::Error;

/// A single JSON Schema violation: instance path plus validator message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// JSON-pointer path into the validated instance, `(root)` at the top.
    pub path: String,
    /// Human-readable description of the violated constraint.
    pub message: String,
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.path, self.message)
    }
}

/// Errors surfaced by the client, validator, and transport.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// Connection-level failure: the exchange never completed.
    #[error("transport error: {0}")]
    Transport(String),

    /// The transport-layer timeout elapsed before a response arrived.
    #[error("request timed out: {0}")]
    Timeout(String),

    /// Observed status differs from the exact expected status.
    #[error("expected status {expected}, got {actual}")]
    StatusMismatch { expected: u16, actual: u16 },

    /// Strict-status mode: a well-formed non-2xx response.
    #[error("unexpected HTTP status {status}: {body}")]
    HttpStatus { status: u16, body: String },

    /// The schema document itself failed to compile.
    #[error("schema compilation error: {0}")]
    SchemaCompilation(String),

    /// The body violated its schema; every violation is listed.
    #[error("[schema: {context}] validation failed:\n{}", format_violations(.violations))]
    SchemaValidation {
        context: String,
        violations: Vec<Violation>,
    },

    /// Ad-hoc shape check failure naming the offending property.
    #[error("shape assertion failed: {0}")]
    ShapeAssertion(String),

    /// Invalid configuration: bad header name/value, malformed env var.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// JSON (de)serialization failure at a typed seam.
    #[error("JSON error: {0}")]
    Json(String),
}

fn format_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(Violation::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Coarse classification, mirroring how callers react to a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Network-level: eligible for retry.
    Transport,
    /// The API answered but broke its contract.
    Contract,
    /// The caller misconfigured the client.
    Configuration,
}

impl ApiError {
    /// Whether the retry executor may re-attempt the call.
    ///
    /// Only transport-level failures qualify; an HTTP error response is a
    /// completed exchange and is judged by the validator instead.
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Timeout(_))
    }

    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::Transport(_) | Self::Timeout(_) => ErrorCategory::Transport,
            Self::Configuration(_) => ErrorCategory::Configuration,
            _ => ErrorCategory::Contract,
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}
