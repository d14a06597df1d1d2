//! Retry with exponential backoff.
//!
//! The backoff schedule is a pure function of the attempt index so it can be
//! tested without real delays; sleeping goes through the [`Sleeper`] trait
//! for the same reason. Attempts are strictly sequential.

use crate::error::ApiError;
use async_trait::async_trait;
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;

/// Backoff policy configuration.
#[derive(Debug, Clone)]
pub struct BackoffPolicy {
    /// Retries after the first attempt; total tries = `retry_count + 1`.
    pub retry_count: u32,
    /// Delay between the first and second attempt.
    pub initial_backoff: Duration,
    /// Ceiling for the computed delay.
    pub max_backoff: Duration,
    /// Multiplier applied per attempt (exponential backoff).
    pub backoff_multiplier: f64,
    /// Whether to add jitter to delays. Off by default: the documented
    /// schedule is exact.
    pub use_jitter: bool,
    /// Maximum jitter fraction (0.0 to 1.0).
    pub jitter_factor: f64,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self {
            retry_count: crate::config::defaults::RETRY_COUNT,
            initial_backoff: crate::config::defaults::INITIAL_BACKOFF,
            max_backoff: crate::config::defaults::MAX_BACKOFF,
            backoff_multiplier: 2.0,
            use_jitter: false,
            jitter_factor: 0.1,
        }
    }
}

impl BackoffPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    pub const fn with_retry_count(mut self, retry_count: u32) -> Self {
        self.retry_count = retry_count;
        self
    }

    pub const fn with_initial_backoff(mut self, delay: Duration) -> Self {
        self.initial_backoff = delay;
        self
    }

    pub const fn with_max_backoff(mut self, delay: Duration) -> Self {
        self.max_backoff = delay;
        self
    }

    pub const fn with_jitter(mut self, use_jitter: bool) -> Self {
        self.use_jitter = use_jitter;
        self
    }

    /// Delay between attempt `attempt` (0-indexed) and the next one:
    /// `initial_backoff * multiplier^attempt`, capped at `max_backoff`.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let base = self.initial_backoff.as_millis() as f64
            * self.backoff_multiplier.powi(attempt as i32);
        let delay = Duration::from_millis(base as u64).min(self.max_backoff);

        if self.use_jitter {
            self.add_jitter(delay)
        } else {
            delay
        }
    }

    fn add_jitter(&self, delay: Duration) -> Duration {
        let mut rng = rand::thread_rng();
        let jitter_range = delay.as_millis() as f64 * self.jitter_factor;
        let jitter = rng.gen_range(-jitter_range..=jitter_range);
        Duration::from_millis((delay.as_millis() as f64 + jitter).max(0.0) as u64)
    }
}

/// Suspension point between attempts, injectable for tests.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Production sleeper backed by the tokio timer.
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Drives a fallible async operation through the bounded-attempt loop.
pub struct RetryExecutor {
    policy: BackoffPolicy,
    sleeper: Arc<dyn Sleeper>,
}

impl RetryExecutor {
    pub fn new(policy: BackoffPolicy) -> Self {
        Self {
            policy,
            sleeper: Arc::new(TokioSleeper),
        }
    }

    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    pub fn policy(&self) -> &BackoffPolicy {
        &self.policy
    }

    /// Execute `operation`, retrying retryable failures up to
    /// `retry_count + 1` total tries with the full backoff elapsed between
    /// them. Non-retryable errors return immediately; on exhaustion the
    /// last error is surfaced.
    pub async fn execute<F, Fut, T>(&self, mut operation: F) -> Result<T, ApiError>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<T, ApiError>>,
    {
        let mut last_error = None;

        for attempt in 0..=self.policy.retry_count {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(error) => {
                    if !error.is_retryable() {
                        return Err(error);
                    }
                    tracing::warn!(
                        attempt = attempt + 1,
                        total = self.policy.retry_count + 1,
                        error = %error,
                        "attempt failed"
                    );
                    last_error = Some(error);

                    if attempt == self.policy.retry_count {
                        break;
                    }
                    self.sleeper.sleep(self.policy.delay_for(attempt)).await;
                }
            }
        }

        Err(last_error
            .unwrap_or_else(|| ApiError::Transport("retry executor exhausted without error".into())))
    }
}
