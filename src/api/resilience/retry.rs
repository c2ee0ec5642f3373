//! Retry policy with exponential backoff
//!
//! Retries rate-limited (429) and server-error (5xx) responses by resubmitting
//! the identical request. Each call to [`RetryPolicy::send`] owns its own
//! attempt counter, so unrelated requests never share retry state.

use async_trait::async_trait;
use log::{debug, warn};
use rand::Rng;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Configuration for retry behavior
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Retries after the first attempt (3 means up to 4 requests in total)
    pub max_retries: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
    pub backoff_multiplier: f64,
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_millis(1000),
            max_delay: Duration::from_secs(30),
            backoff_multiplier: 2.0,
            jitter: false,
        }
    }
}

impl RetryConfig {
    /// No retries at all
    pub fn disabled() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }
}

/// How a response status behaves with respect to retrying
#[derive(Debug, Clone, PartialEq)]
pub enum RetryableError {
    /// HTTP 429 Too Many Requests
    RateLimited,
    /// HTTP 5xx server errors
    ServerError(u16),
    /// Non-retryable client errors (4xx except 429)
    ClientError(u16),
    /// Anything else that is not a success
    Unknown(u16),
}

impl RetryableError {
    pub fn should_retry(&self) -> bool {
        match self {
            RetryableError::RateLimited => true,
            RetryableError::ServerError(_) => true,
            RetryableError::ClientError(_) => false,
            RetryableError::Unknown(_) => false,
        }
    }

    /// Classify a non-success status code. Returns `None` for 2xx.
    pub fn from_status_code(status: u16) -> Option<Self> {
        match status {
            200..=299 => None,
            429 => Some(RetryableError::RateLimited),
            400..=499 => Some(RetryableError::ClientError(status)),
            500..=u16::MAX => Some(RetryableError::ServerError(status)),
            _ => Some(RetryableError::Unknown(status)),
        }
    }
}

/// Suspends the caller between attempts
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, delay: Duration);
}

/// Sleeps on the tokio timer
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, delay: Duration) {
        tokio::time::sleep(delay).await;
    }
}

/// Records requested delays and returns immediately
#[derive(Debug, Default)]
pub struct RecordingSleeper {
    delays: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn delays(&self) -> Vec<Duration> {
        self.delays.lock().map(|d| d.clone()).unwrap_or_default()
    }

    pub fn total(&self) -> Duration {
        self.delays().iter().sum()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, delay: Duration) {
        if let Ok(mut delays) = self.delays.lock() {
            delays.push(delay);
        }
    }
}

/// Retry policy that implements exponential backoff
#[derive(Clone)]
pub struct RetryPolicy {
    config: RetryConfig,
    sleeper: Arc<dyn Sleeper>,
}

impl RetryPolicy {
    pub fn new(config: RetryConfig) -> Self {
        Self::with_sleeper(config, Arc::new(TokioSleeper))
    }

    pub fn with_sleeper(config: RetryConfig, sleeper: Arc<dyn Sleeper>) -> Self {
        Self { config, sleeper }
    }

    pub fn config(&self) -> &RetryConfig {
        &self.config
    }

    /// Send a request, resubmitting it while the response is retryable.
    ///
    /// Returns the first non-retryable response, or the last response once the
    /// retry ceiling is reached. Transport failures (no response at all) are
    /// returned as `Err` without retrying.
    pub async fn send(
        &self,
        client: &reqwest::Client,
        request: reqwest::Request,
    ) -> Result<reqwest::Response, reqwest::Error> {
        let method = request.method().clone();
        let url = request.url().clone();
        let mut retry_count: u32 = 0;

        loop {
            // Streaming bodies cannot be replayed; such requests get exactly one attempt
            let Some(attempt) = request.try_clone() else {
                debug!("{} {} has a non-replayable body, sending without retry", method, url);
                return client.execute(request).await;
            };

            let response = client.execute(attempt).await?;
            let status = response.status().as_u16();

            let Some(kind) = RetryableError::from_status_code(status) else {
                if retry_count > 0 {
                    debug!("{} {} succeeded after {} retries", method, url, retry_count);
                }
                return Ok(response);
            };

            if !kind.should_retry() {
                return Ok(response);
            }

            if retry_count >= self.config.max_retries {
                warn!(
                    "{} {} still failing with HTTP {} after {} retries, giving up",
                    method, url, status, retry_count
                );
                return Ok(response);
            }

            retry_count += 1;
            let delay = self.calculate_delay(retry_count);
            warn!(
                "{} {} returned HTTP {}, retry {}/{} in {:?}",
                method, url, status, retry_count, self.config.max_retries, delay
            );
            self.sleeper.sleep(delay).await;
        }
    }

    /// Delay before retry number `retry` (1-based): `base * multiplier^(retry-1)`
    pub fn calculate_delay(&self, retry: u32) -> Duration {
        let exponent = retry.saturating_sub(1) as i32;
        let delay_ms = (self.config.base_delay.as_millis() as f64)
            * self.config.backoff_multiplier.powi(exponent);

        let mut delay = Duration::from_millis(delay_ms as u64);

        if delay > self.config.max_delay {
            delay = self.config.max_delay;
        }

        if self.config.jitter {
            let jitter_factor = rand::thread_rng().gen_range(0.5..=1.5);
            let jittered_ms = (delay.as_millis() as f64 * jitter_factor) as u64;
            delay = Duration::from_millis(jittered_ms);
        }

        delay
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(RetryConfig::default())
    }
}
