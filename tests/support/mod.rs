//! Shared test doubles: a mock transport emulating the demo API contract,
//! plus flaky/failing transports and a recording sleeper for retry tests.
#![allow(dead_code)]

use async_trait::async_trait;
use reqprobe::client::ApiClient;
use reqprobe::config::ClientConfig;
use reqprobe::error::ApiError;
use reqprobe::observe::{CallObserver, MemoryObserver, ObserveError, StepOutcome};
use reqprobe::request::RequestSpec;
use reqprobe::retry::Sleeper;
use reqprobe::transport::{HttpTransport, TransportResponse};
use serde_json::{Value, json};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const VALID_EMAIL: &str = "eve.holt@reqres.in";
pub const VALID_PASSWORD: &str = "cityslicka";
pub const VALID_TOKEN: &str = "QpwL5tke4Pnpja7X4";
pub const EXPECTED_API_KEY: &str = "reqres-free-v1";

/// Hermetic stand-in for the demo API: routes on method + path and records
/// every request it receives.
#[derive(Default)]
pub struct MockApi {
    seen: Mutex<Vec<RequestSpec>>,
}

impl MockApi {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn seen(&self) -> Vec<RequestSpec> {
        self.seen.lock().unwrap().clone()
    }

    pub fn last_seen(&self) -> RequestSpec {
        self.seen.lock().unwrap().last().cloned().expect("no request recorded")
    }

    fn route(&self, spec: &RequestSpec) -> TransportResponse {
        let method = spec.method.as_str();
        let path = path_of(&spec.url);

        let api_key = spec
            .headers
            .get("x-api-key")
            .and_then(|v| v.to_str().ok());
        if api_key != Some(EXPECTED_API_KEY) {
            return TransportResponse::json(403, &json!({"error": "Invalid or missing API key"}));
        }

        match (method, path) {
            ("POST", "/api/login") => self.login(spec.body.as_ref()),
            ("GET", "/api/users") => self.list_users(&spec.query),
            ("POST", "/api/users") => self.create_user(spec.body.as_ref()),
            ("GET", p) if p.starts_with("/api/users/") => self.get_user(p),
            ("PUT", p) if p.starts_with("/api/users/") => self.update_user(spec.body.as_ref()),
            ("DELETE", p) if p.starts_with("/api/users/") => TransportResponse::empty(204),
            _ => TransportResponse::json(404, &json!({})),
        }
    }

    fn login(&self, body: Option<&Value>) -> TransportResponse {
        let body = body.cloned().unwrap_or(Value::Null);
        let email = body.get("email").and_then(Value::as_str);
        let password = body.get("password").and_then(Value::as_str);
        match (email, password) {
            (None, _) => {
                TransportResponse::json(400, &json!({"error": "Missing email or username"}))
            }
            (Some(_), None) => TransportResponse::json(400, &json!({"error": "Missing password"})),
            (Some(VALID_EMAIL), Some(VALID_PASSWORD)) => {
                TransportResponse::json(200, &json!({"token": VALID_TOKEN}))
            }
            _ => TransportResponse::json(400, &json!({"error": "user not found"})),
        }
    }

    fn list_users(&self, query: &[(String, String)]) -> TransportResponse {
        let page: u32 = query
            .iter()
            .find(|(k, _)| k == "page")
            .and_then(|(_, v)| v.parse().ok())
            .unwrap_or(1);
        TransportResponse::json(
            200,
            &json!({
                "page": page,
                "per_page": 6,
                "total": 12,
                "total_pages": 2,
                "data": [
                    {
                        "id": 1,
                        "email": "george.bluth@reqres.in",
                        "first_name": "George",
                        "last_name": "Bluth",
                        "avatar": "https://reqres.in/img/faces/1-image.jpg"
                    },
                    {
                        "id": 2,
                        "email": "janet.weaver@reqres.in",
                        "first_name": "Janet",
                        "last_name": "Weaver",
                        "avatar": "https://reqres.in/img/faces/2-image.jpg"
                    }
                ]
            }),
        )
    }

    fn get_user(&self, path: &str) -> TransportResponse {
        let id: u32 = path
            .trim_start_matches("/api/users/")
            .parse()
            .unwrap_or(0);
        if (1..=12).contains(&id) {
            TransportResponse::json(
                200,
                &json!({
                    "data": {
                        "id": id,
                        "email": "janet.weaver@reqres.in",
                        "first_name": "Janet",
                        "last_name": "Weaver",
                        "avatar": "https://reqres.in/img/faces/2-image.jpg"
                    }
                }),
            )
        } else {
            TransportResponse::json(404, &json!({}))
        }
    }

    fn create_user(&self, body: Option<&Value>) -> TransportResponse {
        let body = body.cloned().unwrap_or(Value::Null);
        TransportResponse::json(
            201,
            &json!({
                "name": body.get("name").cloned().unwrap_or(Value::Null),
                "job": body.get("job").cloned().unwrap_or(Value::Null),
                "id": "713",
                "createdAt": "2026-08-29T09:00:00.000Z"
            }),
        )
    }

    fn update_user(&self, body: Option<&Value>) -> TransportResponse {
        let body = body.cloned().unwrap_or(Value::Null);
        TransportResponse::json(
            200,
            &json!({
                "name": body.get("name").cloned().unwrap_or(Value::Null),
                "job": body.get("job").cloned().unwrap_or(Value::Null),
                "updatedAt": "2026-08-29T09:05:00.000Z"
            }),
        )
    }
}

#[async_trait]
impl HttpTransport for MockApi {
    async fn execute(&self, spec: &RequestSpec) -> Result<TransportResponse, ApiError> {
        self.seen.lock().unwrap().push(spec.clone());
        Ok(self.route(spec))
    }
}

fn path_of(url: &str) -> &str {
    let rest = url.split_once("://").map_or(url, |(_, rest)| rest);
    rest.find('/').map_or("/", |p| &rest[p..])
}

/// Fails with a transport error a fixed number of times, then answers.
pub struct FlakyTransport {
    failures: u32,
    attempts: AtomicU32,
    response: TransportResponse,
}

impl FlakyTransport {
    pub fn new(failures: u32, response: TransportResponse) -> Arc<Self> {
        Arc::new(Self {
            failures,
            attempts: AtomicU32::new(0),
            response,
        })
    }

    pub fn attempts(&self) -> u32 {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HttpTransport for FlakyTransport {
    async fn execute(&self, _spec: &RequestSpec) -> Result<TransportResponse, ApiError> {
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst);
        if attempt < self.failures {
            Err(ApiError::Transport("connection reset by peer".into()))
        } else {
            Ok(self.response.clone())
        }
    }
}

/// Always fails at the transport level; counts attempts.
pub struct DeadTransport {
    attempts: AtomicU32,
}

impl DeadTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            attempts: AtomicU32::new(0),
        })
    }

    pub fn attempts(&self) -> u32 {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HttpTransport for DeadTransport {
    async fn execute(&self, _spec: &RequestSpec) -> Result<TransportResponse, ApiError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(ApiError::Timeout("deadline elapsed".into()))
    }
}

/// Answers every request with a fixed response; counts attempts.
pub struct FixedTransport {
    response: TransportResponse,
    attempts: AtomicU32,
}

impl FixedTransport {
    pub fn new(response: TransportResponse) -> Arc<Self> {
        Arc::new(Self {
            response,
            attempts: AtomicU32::new(0),
        })
    }

    pub fn attempts(&self) -> u32 {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HttpTransport for FixedTransport {
    async fn execute(&self, _spec: &RequestSpec) -> Result<TransportResponse, ApiError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Ok(self.response.clone())
    }
}

/// Records requested delays instead of sleeping.
#[derive(Default)]
pub struct RecordingSleeper {
    delays: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn delays(&self) -> Vec<Duration> {
        self.delays.lock().unwrap().clone()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.delays.lock().unwrap().push(duration);
    }
}

/// Observer whose attachments always fail; proves recording stays cosmetic.
pub struct BrokenObserver;

impl CallObserver for BrokenObserver {
    fn begin_step(&self, _name: &str) {}

    fn attach(&self, _name: &str, _mime: &str, _content: &str) -> Result<(), ObserveError> {
        Err(ObserveError("sink unavailable".into()))
    }

    fn end_step(&self, _name: &str, _outcome: &StepOutcome) {}
}

/// Install a test subscriber once so `RUST_LOG` surfaces the call narrative.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Client wired to the mock API with an in-memory report sink.
pub fn mock_client(transport: Arc<MockApi>) -> (ApiClient, Arc<MemoryObserver>) {
    let observer = Arc::new(MemoryObserver::new());
    let client = ApiClient::builder()
        .config(ClientConfig::default())
        .transport(transport)
        .observer(observer.clone())
        .build()
        .expect("client assembly cannot fail with an injected transport");
    (client, observer)
}
