//! OAuth client-credentials token acquisition with an explicit token cache

use super::constants::{headers, Platform, AUTH_TIMEOUT, TOKEN_EXPIRY_BUFFER_MILLIS, USER_AGENT};
use super::error::{platform_message, AuthError};
use super::models::{CachedToken, EnvironmentCredential, TokenCacheKey, TokenResponse};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use log::{debug, info, warn};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::sync::RwLock;

/// Source of the current time in epoch milliseconds
pub trait Clock: Send + Sync {
    fn now_millis(&self) -> i64;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as i64)
            .unwrap_or_default()
    }
}

/// Clock that only moves when told to
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicI64,
}

impl ManualClock {
    pub fn new(now_millis: i64) -> Self {
        Self {
            now: AtomicI64::new(now_millis),
        }
    }

    pub fn set(&self, now_millis: i64) {
        self.now.store(now_millis, Ordering::SeqCst);
    }

    pub fn advance(&self, by: Duration) {
        self.now.fetch_add(by.as_millis() as i64, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }
}

/// Process-lifetime token cache keyed by `(tenant_id, client_id)`.
///
/// Entries are overwritten on refresh and never removed.
#[derive(Debug, Default)]
pub struct TokenCache {
    entries: RwLock<HashMap<TokenCacheKey, CachedToken>>,
}

impl TokenCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached token for `key` if it is still good for more than the expiry buffer
    pub async fn get_valid(&self, key: &TokenCacheKey, now_millis: i64) -> Option<String> {
        let entries = self.entries.read().await;
        let token = entries.get(key)?;
        if token.expires_at_millis.saturating_sub(now_millis) > TOKEN_EXPIRY_BUFFER_MILLIS {
            Some(token.access_token.clone())
        } else {
            None
        }
    }

    pub async fn store(&self, key: TokenCacheKey, token: CachedToken) {
        self.entries.write().await.insert(key, token);
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

/// Obtains bearer tokens for environment credentials, reusing cached ones
pub struct AuthManager {
    http_client: reqwest::Client,
    platform: Platform,
    cache: Arc<TokenCache>,
    clock: Arc<dyn Clock>,
    timeout: Duration,
}

impl AuthManager {
    pub fn new(platform: Platform, cache: Arc<TokenCache>) -> Result<Self, reqwest::Error> {
        Self::with_clock(platform, cache, Arc::new(SystemClock), AUTH_TIMEOUT)
    }

    pub fn with_clock(
        platform: Platform,
        cache: Arc<TokenCache>,
        clock: Arc<dyn Clock>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            http_client,
            platform,
            cache,
            clock,
            timeout,
        })
    }

    pub fn platform(&self) -> &Platform {
        &self.platform
    }

    pub fn cache(&self) -> &Arc<TokenCache> {
        &self.cache
    }

    /// Return a usable bearer token, exchanging client credentials only when
    /// no cached token has more than 30 seconds left.
    pub async fn get_access_token(
        &self,
        credential: &EnvironmentCredential,
    ) -> Result<String, AuthError> {
        let key = credential.cache_key();

        if let Some(token) = self.cache.get_valid(&key, self.clock.now_millis()).await {
            debug!("Using cached token for environment: {}", credential.name);
            return Ok(token);
        }

        info!("Requesting access token for environment: {}", credential.name);
        let response = self.request_token(credential).await?;

        let expires_at_millis = self
            .clock
            .now_millis()
            .saturating_add(response.expires_in.saturating_mul(1000));
        self.cache
            .store(
                key,
                CachedToken {
                    access_token: response.access_token.clone(),
                    expires_at_millis,
                },
            )
            .await;

        debug!(
            "Cached token for environment {} (expires in {}s)",
            credential.name, response.expires_in
        );
        Ok(response.access_token)
    }

    async fn request_token(
        &self,
        credential: &EnvironmentCredential,
    ) -> Result<TokenResponse, AuthError> {
        let env = credential.name.clone();
        let token_url = self.platform.token_url(credential.region, &credential.tenant_id);
        let basic = STANDARD.encode(format!("{}:{}", credential.client_id, credential.client_secret));

        debug!("POST {} (timeout {:?})", token_url, self.timeout);

        let response = self
            .http_client
            .post(&token_url)
            .header("Authorization", format!("Basic {}", basic))
            .header("Content-Type", headers::CONTENT_TYPE_FORM)
            .body("grant_type=client_credentials")
            .send()
            .await
            .map_err(|source| AuthError::Network {
                env: env.clone(),
                source,
            })?;

        let status = response.status();
        debug!("Token request status: {}", status);

        if status.is_success() {
            let body = response.text().await.map_err(|source| AuthError::Network {
                env: env.clone(),
                source,
            })?;
            return serde_json::from_str::<TokenResponse>(&body).map_err(|e| {
                AuthError::InvalidResponse {
                    env,
                    message: e.to_string(),
                }
            });
        }

        let body = response.text().await.unwrap_or_default();
        warn!("Token request for {} failed with HTTP {}", env, status);

        Err(match status.as_u16() {
            401 => AuthError::InvalidClient { env },
            403 => AuthError::InsufficientPermissions { env },
            code => AuthError::Failed {
                env,
                status: code,
                description: platform_message(&body),
            },
        })
    }
}
