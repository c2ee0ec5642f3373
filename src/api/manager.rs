use super::auth::{AuthManager, Clock, SystemClock, TokenCache};
use super::client::FormsClient;
use super::constants::Platform;
use super::error::{ApiError, AuthError};
use super::models::EnvironmentCredential;
use super::resilience::{ResilienceConfig, RetryPolicy, Sleeper, TokioSleeper};
use std::sync::Arc;

/// Builds authenticated [`FormsClient`]s for environment credentials.
///
/// Owns the token manager (and through it the token cache) for the session;
/// every client it creates shares the same retry configuration and sleeper.
pub struct ClientManager {
    auth_manager: AuthManager,
    resilience: ResilienceConfig,
    sleeper: Arc<dyn Sleeper>,
}

impl ClientManager {
    pub fn new(platform: Platform, resilience: ResilienceConfig) -> Result<Self, reqwest::Error> {
        Self::with_parts(
            platform,
            resilience,
            Arc::new(TokenCache::new()),
            Arc::new(SystemClock),
            Arc::new(TokioSleeper),
        )
    }

    /// Assemble a manager from explicit collaborators (cache, clock, sleeper)
    pub fn with_parts(
        platform: Platform,
        resilience: ResilienceConfig,
        cache: Arc<TokenCache>,
        clock: Arc<dyn Clock>,
        sleeper: Arc<dyn Sleeper>,
    ) -> Result<Self, reqwest::Error> {
        let auth_manager = AuthManager::with_clock(platform, cache, clock, resilience.auth_timeout)?;
        Ok(Self {
            auth_manager,
            resilience,
            sleeper,
        })
    }

    pub fn auth_manager(&self) -> &AuthManager {
        &self.auth_manager
    }

    pub fn resilience(&self) -> &ResilienceConfig {
        &self.resilience
    }

    /// Bearer token for a credential, from cache when still fresh
    pub async fn get_access_token(
        &self,
        credential: &EnvironmentCredential,
    ) -> Result<String, AuthError> {
        self.auth_manager.get_access_token(credential).await
    }

    /// Create a client bound to the credential's API root and a token
    /// obtained now.
    pub async fn create_client(
        &self,
        credential: &EnvironmentCredential,
    ) -> Result<FormsClient, ApiError> {
        let token = self.auth_manager.get_access_token(credential).await?;
        let base_url = self.auth_manager.platform().api_root(credential.region);
        let retry_policy =
            RetryPolicy::with_sleeper(self.resilience.retry.clone(), self.sleeper.clone());

        FormsClient::new(
            credential.name.clone(),
            base_url,
            token,
            retry_policy,
            self.resilience.request_timeout,
        )
        .map_err(|source| ApiError::ClientBuild {
            env: credential.name.clone(),
            source,
        })
    }
}
