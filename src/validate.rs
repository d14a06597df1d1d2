//! Response validation.
//!
//! Exact-status assertion, JSON Schema conformance with every violation
//! aggregated into one error, and ad-hoc shape checks. A test author needs
//! the full list of shape deviations in one failure, not one-at-a-time
//! discovery.

use crate::error::{ApiError, Violation};
use crate::response::ApiResponse;
use serde_json::Value;
use std::sync::OnceLock;

/// Fail unless the observed status equals `expected` exactly.
pub fn expect_status(response: &ApiResponse, expected: u16) -> Result<(), ApiError> {
    let actual = response.status();
    if actual == expected {
        tracing::info!(status = actual, "status matched");
        Ok(())
    } else {
        Err(ApiError::StatusMismatch { expected, actual })
    }
}

/// A named JSON Schema document with cached compilation.
///
/// Compilation happens once per schema instance; schemas are immutable
/// static data, so the compiled validator is safely shared across calls
/// and test cases.
pub struct Schema {
    name: String,
    document: Value,
    compiled: OnceLock<jsonschema::Validator>,
}

impl Schema {
    pub fn new(name: impl Into<String>, document: Value) -> Self {
        Self {
            name: name.into(),
            document,
            compiled: OnceLock::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn validator(&self) -> Result<&jsonschema::Validator, ApiError> {
        if let Some(validator) = self.compiled.get() {
            return Ok(validator);
        }
        // format assertions (email, date-time, uri) are part of the contract
        let validator = jsonschema::options()
            .should_validate_formats(true)
            .build(&self.document)
            .map_err(|e| {
                ApiError::SchemaCompilation(format!("invalid schema '{}': {e}", self.name))
            })?;
        Ok(self.compiled.get_or_init(|| validator))
    }

    /// Validate `instance`, aggregating every violation into one error.
    pub fn validate(&self, instance: &Value) -> Result<(), ApiError> {
        let validator = self.validator()?;
        if validator.is_valid(instance) {
            return Ok(());
        }
        let violations: Vec<Violation> = validator
            .iter_errors(instance)
            .map(|err| {
                let path = err.instance_path.to_string();
                Violation {
                    path: if path.is_empty() { "(root)".into() } else { path },
                    message: err.to_string(),
                }
            })
            .collect();
        Err(ApiError::SchemaValidation {
            context: self.name.clone(),
            violations,
        })
    }

    /// Validate a response body directly.
    pub fn validate_response(&self, response: &ApiResponse) -> Result<(), ApiError> {
        self.validate(&response.body_value())
    }
}

/// Ad-hoc shape checks that name the offending property.
pub mod shape {
    use super::*;

    pub fn require_property<'a>(body: &'a Value, name: &str) -> Result<&'a Value, ApiError> {
        body.get(name)
            .ok_or_else(|| ApiError::ShapeAssertion(format!("missing property `{name}`")))
    }

    pub fn require_string<'a>(body: &'a Value, name: &str) -> Result<&'a str, ApiError> {
        require_property(body, name)?.as_str().ok_or_else(|| {
            ApiError::ShapeAssertion(format!("property `{name}` is not a string"))
        })
    }

    pub fn require_non_empty_string<'a>(body: &'a Value, name: &str) -> Result<&'a str, ApiError> {
        let value = require_string(body, name)?;
        if value.is_empty() {
            return Err(ApiError::ShapeAssertion(format!(
                "property `{name}` is an empty string"
            )));
        }
        Ok(value)
    }

    pub fn require_array<'a>(body: &'a Value, name: &str) -> Result<&'a Vec<Value>, ApiError> {
        require_property(body, name)?.as_array().ok_or_else(|| {
            ApiError::ShapeAssertion(format!("property `{name}` is not an array"))
        })
    }

    pub fn require_matches(body: &Value, name: &str, expected: &Value) -> Result<(), ApiError> {
        let value = require_property(body, name)?;
        if value != expected {
            return Err(ApiError::ShapeAssertion(format!(
                "property `{name}` is {value}, expected {expected}"
            )));
        }
        Ok(())
    }
}
