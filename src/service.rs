//! Typed endpoint layer for the demo user/auth API.
//!
//! Thin wrappers over [`ApiClient`] returning both the raw response and the
//! parsed body, so scenarios can judge status and shape independently.
//! `login` stores the bearer token on success, authenticating subsequent
//! calls through the same client.

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::request::RequestOptions;
use crate::response::ApiResponse;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Login credentials. `password` is omitted from the payload when `None`,
/// which the API rejects with 400 `Missing password`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: Some(password.into()),
        }
    }

    pub fn without_password(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: None,
        }
    }
}

/// Create/update payload: the API echoes these fields back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserPayload {
    pub name: String,
    pub job: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreatedUser {
    pub name: String,
    pub job: String,
    pub id: Value,
    #[serde(rename = "createdAt")]
    pub created_at: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdatedUser {
    pub name: String,
    pub job: String,
    #[serde(rename = "updatedAt")]
    pub updated_at: String,
}

/// Raw response paired with its parsed body.
#[derive(Debug)]
pub struct ServiceOutcome {
    pub response: ApiResponse,
    pub body: Value,
}

impl ServiceOutcome {
    fn from_response(response: ApiResponse) -> Self {
        let body = response.body_value();
        Self { response, body }
    }
}

pub struct UserService<'a> {
    client: &'a ApiClient,
}

impl<'a> UserService<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Log in and, on a 2xx response carrying a token, store it for
    /// subsequent calls through this client.
    pub async fn login(&self, credentials: &Credentials) -> Result<ServiceOutcome, ApiError> {
        let body = serde_json::to_value(credentials)?;
        let response = self.client.post("/api/login", Some(body), None).await?;
        let outcome = ServiceOutcome::from_response(response);
        if outcome.response.is_success()
            && let Some(token) = outcome.body.get("token").and_then(Value::as_str)
        {
            self.client.set_auth_token(token);
        }
        Ok(outcome)
    }

    pub async fn list_users(&self, page: u32) -> Result<ServiceOutcome, ApiError> {
        let options = RequestOptions::new().param("page", page);
        let response = self.client.get("/api/users", Some(options)).await?;
        Ok(ServiceOutcome::from_response(response))
    }

    pub async fn get_user(&self, id: u32) -> Result<ServiceOutcome, ApiError> {
        let response = self
            .client
            .get(&format!("/api/users/{id}"), None)
            .await?;
        Ok(ServiceOutcome::from_response(response))
    }

    pub async fn create_user(&self, user: &UserPayload) -> Result<ServiceOutcome, ApiError> {
        let body = serde_json::to_value(user)?;
        let response = self.client.post("/api/users", Some(body), None).await?;
        Ok(ServiceOutcome::from_response(response))
    }

    pub async fn update_user(
        &self,
        id: u32,
        user: &UserPayload,
    ) -> Result<ServiceOutcome, ApiError> {
        let body = serde_json::to_value(user)?;
        let response = self
            .client
            .put(&format!("/api/users/{id}"), Some(body), None)
            .await?;
        Ok(ServiceOutcome::from_response(response))
    }

    pub async fn delete_user(&self, id: u32) -> Result<ServiceOutcome, ApiError> {
        let response = self
            .client
            .delete(&format!("/api/users/{id}"), None)
            .await?;
        Ok(ServiceOutcome::from_response(response))
    }
}
