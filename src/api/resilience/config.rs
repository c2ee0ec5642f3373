//! Resilience configuration with builder pattern
//!
//! Bundles the retry policy with the per-request timeouts used for token
//! exchanges and API calls.

use super::retry::RetryConfig;
use crate::api::constants::{AUTH_TIMEOUT, REQUEST_TIMEOUT};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct ResilienceConfig {
    pub retry: RetryConfig,
    /// Timeout for a single token request
    pub auth_timeout: Duration,
    /// Timeout for a single API request (each retry gets its own)
    pub request_timeout: Duration,
}

impl Default for ResilienceConfig {
    fn default() -> Self {
        Self {
            retry: RetryConfig::default(),
            auth_timeout: AUTH_TIMEOUT,
            request_timeout: REQUEST_TIMEOUT,
        }
    }
}

impl ResilienceConfig {
    pub fn builder() -> ResilienceConfigBuilder {
        ResilienceConfigBuilder::new()
    }

    /// Single attempt per request, default timeouts
    pub fn disabled() -> Self {
        Self {
            retry: RetryConfig::disabled(),
            ..Self::default()
        }
    }
}

#[derive(Debug)]
pub struct ResilienceConfigBuilder {
    config: ResilienceConfig,
}

impl ResilienceConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: ResilienceConfig::default(),
        }
    }

    pub fn retry_config(mut self, retry: RetryConfig) -> Self {
        self.config.retry = retry;
        self
    }

    pub fn max_retries(mut self, retries: u32) -> Self {
        self.config.retry.max_retries = retries;
        self
    }

    pub fn base_delay(mut self, delay: Duration) -> Self {
        self.config.retry.base_delay = delay;
        self
    }

    pub fn auth_timeout(mut self, timeout: Duration) -> Self {
        self.config.auth_timeout = timeout;
        self
    }

    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.config.request_timeout = timeout;
        self
    }

    pub fn build(self) -> ResilienceConfig {
        self.config
    }
}

impl Default for ResilienceConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
