//! The request helper.
//!
//! [`ApiClient`] owns its configuration, token store, transport, observer,
//! and retry executor. Every verb funnels through one `send` path: compose
//! the request, record it, execute it through the retry loop, record the
//! response, return the outcome. A client is built per test case; nothing
//! here is shared across cases.

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::observe::{CallObserver, StepOutcome, TracingObserver};
use crate::request::{RequestOptions, RequestSpec, build_request, headermap_to_hashmap};
use crate::response::ApiResponse;
use crate::retry::{BackoffPolicy, RetryExecutor, Sleeper};
use crate::token::TokenStore;
use crate::transport::{HttpTransport, ReqwestTransport};
use reqwest::Method;
use secrecy::SecretString;
use serde_json::Value;
use std::sync::Arc;

pub struct ApiClient {
    config: ClientConfig,
    tokens: TokenStore,
    transport: Arc<dyn HttpTransport>,
    observer: Arc<dyn CallObserver>,
    retry: RetryExecutor,
}

impl ApiClient {
    /// Client with the production transport and tracing observer.
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        let transport = Arc::new(ReqwestTransport::new()?);
        Ok(Self::assemble(config, transport, Arc::new(TracingObserver), None))
    }

    pub fn builder() -> ApiClientBuilder {
        ApiClientBuilder::default()
    }

    fn assemble(
        config: ClientConfig,
        transport: Arc<dyn HttpTransport>,
        observer: Arc<dyn CallObserver>,
        sleeper: Option<Arc<dyn Sleeper>>,
    ) -> Self {
        let policy = BackoffPolicy::new()
            .with_retry_count(config.retry_count)
            .with_initial_backoff(config.initial_backoff);
        let mut retry = RetryExecutor::new(policy);
        if let Some(sleeper) = sleeper {
            retry = retry.with_sleeper(sleeper);
        }
        Self {
            config,
            tokens: TokenStore::new(),
            transport,
            observer,
            retry,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Store the bearer token injected into subsequent calls.
    pub fn set_auth_token(&self, token: impl Into<String>) {
        self.tokens.set(token);
    }

    pub fn clear_auth_token(&self) {
        self.tokens.clear();
    }

    pub fn auth_token(&self) -> Option<SecretString> {
        self.tokens.get()
    }

    pub async fn get(
        &self,
        target: &str,
        options: Option<RequestOptions>,
    ) -> Result<ApiResponse, ApiError> {
        self.send(Method::GET, target, None, options).await
    }

    pub async fn post(
        &self,
        target: &str,
        body: Option<Value>,
        options: Option<RequestOptions>,
    ) -> Result<ApiResponse, ApiError> {
        self.send(Method::POST, target, body, options).await
    }

    pub async fn put(
        &self,
        target: &str,
        body: Option<Value>,
        options: Option<RequestOptions>,
    ) -> Result<ApiResponse, ApiError> {
        self.send(Method::PUT, target, body, options).await
    }

    pub async fn delete(
        &self,
        target: &str,
        options: Option<RequestOptions>,
    ) -> Result<ApiResponse, ApiError> {
        self.send(Method::DELETE, target, None, options).await
    }

    /// Core path: build, record, execute with retry, record, judge.
    async fn send(
        &self,
        method: Method,
        target: &str,
        body: Option<Value>,
        options: Option<RequestOptions>,
    ) -> Result<ApiResponse, ApiError> {
        let options = options.unwrap_or_default();
        let step = format!("{method} {target}");
        tracing::info!(%method, url = target, "request");

        let spec = build_request(
            &self.config,
            self.tokens.bearer_value().as_deref(),
            method,
            target,
            body,
            &options,
        )?;

        self.observer.begin_step(&step);
        self.record_request(&spec);

        let result = self
            .retry
            .execute(|| {
                let transport = Arc::clone(&self.transport);
                let spec = &spec;
                async move { transport.execute(spec).await }
            })
            .await;

        match result {
            Ok(raw) => {
                let response = ApiResponse::from(raw);
                self.record_response(&response);
                self.observer.end_step(
                    &step,
                    &StepOutcome::Succeeded {
                        status: response.status(),
                    },
                );
                if options.strict_status && !response.is_success() {
                    return Err(ApiError::HttpStatus {
                        status: response.status(),
                        body: response.text(),
                    });
                }
                Ok(response)
            }
            Err(error) => {
                self.observer.end_step(
                    &step,
                    &StepOutcome::Failed {
                        error: error.to_string(),
                    },
                );
                Err(error)
            }
        }
    }

    fn record_request(&self, spec: &RequestSpec) {
        let headers = headermap_to_hashmap(&spec.headers);
        match serde_json::to_string_pretty(&headers) {
            Ok(rendered) => self.attach("Request Headers", "application/json", &rendered),
            Err(e) => self.diagnostic(&format!("failed to render request headers: {e}")),
        }
        if let Some(body) = &spec.body {
            match serde_json::to_string_pretty(body) {
                Ok(rendered) => self.attach("Request Body", "application/json", &rendered),
                Err(e) => self.diagnostic(&format!("failed to render request body: {e}")),
            }
        }
    }

    fn record_response(&self, response: &ApiResponse) {
        let body = response.text();
        if !body.is_empty() {
            // raw text: not every endpoint answers JSON
            self.attach("Response Body", "text/plain", &body);
        }
        match serde_json::to_string_pretty(response.headers()) {
            Ok(rendered) => self.attach("Response Headers", "application/json", &rendered),
            Err(e) => self.diagnostic(&format!("failed to render response headers: {e}")),
        }
        self.attach("Response Status", "text/plain", &response.status().to_string());
    }

    /// Attach an artifact; a failing sink is demoted to a diagnostic and
    /// never escalated.
    fn attach(&self, name: &str, mime: &str, content: &str) {
        if let Err(e) = self.observer.attach(name, mime, content) {
            self.diagnostic(&format!("attachment '{name}' failed: {e}"));
        }
    }

    fn diagnostic(&self, message: &str) {
        tracing::warn!(message, "observability degraded");
        let _ = self.observer.attach("diagnostic", "text/plain", message);
    }
}

/// Builder for wiring a client with a custom transport, observer, or
/// sleeper (tests replace all three).
#[derive(Default)]
pub struct ApiClientBuilder {
    config: Option<ClientConfig>,
    transport: Option<Arc<dyn HttpTransport>>,
    observer: Option<Arc<dyn CallObserver>>,
    sleeper: Option<Arc<dyn Sleeper>>,
}

impl ApiClientBuilder {
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn observer(mut self, observer: Arc<dyn CallObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = Some(sleeper);
        self
    }

    pub fn build(self) -> Result<ApiClient, ApiError> {
        let config = self.config.unwrap_or_default();
        let transport: Arc<dyn HttpTransport> = match self.transport {
            Some(transport) => transport,
            None => Arc::new(ReqwestTransport::new()?),
        };
        let observer: Arc<dyn CallObserver> = self
            .observer
            .unwrap_or_else(|| Arc::new(TracingObserver));
        Ok(ApiClient::assemble(config, transport, observer, self.sleeper))
    }
}
