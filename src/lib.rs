//! reqprobe
//!
//! Resilient authenticated HTTP client for exercising REST API contracts,
//! with retry-on-transport-failure, structured observability hooks, and
//! JSON Schema response validation.
//!
//! The crate is organized leaf to root: [`request`] composes a call,
//! [`retry`] executes it reliably, [`observe`] records a narrative around
//! it, [`token`] holds the bearer credential, and [`validate`] judges the
//! result. [`client::ApiClient`] wires them together; [`service`] adds a
//! typed endpoint layer for the demo user/auth API on top.
#![deny(unsafe_code)]

pub mod client;
pub mod config;
pub mod data;
pub mod error;
pub mod observe;
pub mod request;
pub mod response;
pub mod retry;
pub mod schemas;
pub mod service;
pub mod token;
pub mod transport;
pub mod validate;

pub use client::ApiClient;
pub use config::ClientConfig;
pub use error::ApiError;
pub use request::RequestOptions;
pub use response::ApiResponse;
