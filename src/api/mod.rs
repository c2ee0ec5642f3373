//! PingOne API access layer
//!
//! Token acquisition with caching, an HTTP client with retry on rate limiting
//! and server errors, and the form operations built on top of it.

pub mod auth;
pub mod client;
pub mod constants;
pub mod error;
pub mod manager;
pub mod models;
pub mod operations;
pub mod resilience;

pub use auth::{AuthManager, Clock, ManualClock, SystemClock, TokenCache};
pub use client::FormsClient;
pub use constants::Platform;
pub use error::{ApiError, AuthError, FormOperation};
pub use manager::ClientManager;
pub use models::{CachedToken, EnvironmentCredential, FormSummary, Region, TokenCacheKey};
pub use operations::FormsApi;
pub use resilience::{RecordingSleeper, ResilienceConfig, RetryConfig, RetryPolicy, Sleeper, TokioSleeper};
