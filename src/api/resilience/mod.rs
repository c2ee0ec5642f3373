//! Resilience features for PingOne API access
//!
//! Provides the retry policy and timeout configuration shared by the token
//! exchange and the forms client.

pub mod config;
pub mod retry;

pub use config::{ResilienceConfig, ResilienceConfigBuilder};
pub use retry::{RecordingSleeper, RetryConfig, RetryPolicy, RetryableError, Sleeper, TokioSleeper};
