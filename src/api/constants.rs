//! Endpoint layout and protocol constants for the PingOne platform

use super::models::Region;
use std::time::Duration;

/// Default platform host component (`auth.<host>.<region>`, `api.<host>.<region>`)
pub const DEFAULT_PLATFORM_HOST: &str = "pingone";

/// API version path appended to the API host
pub const API_VERSION_PATH: &str = "/v1";

/// Timeout for token requests
pub const AUTH_TIMEOUT: Duration = Duration::from_secs(10);

/// Default timeout for API requests
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Cached tokens are only used while they have more than this left
pub const TOKEN_EXPIRY_BUFFER_MILLIS: i64 = 30_000;

pub const USER_AGENT: &str = concat!("pingone-forms/", env!("CARGO_PKG_VERSION"));

pub mod headers {
    pub const CONTENT_TYPE_JSON: &str = "application/json";
    pub const CONTENT_TYPE_FORM: &str = "application/x-www-form-urlencoded";
}

/// Resolves auth and API roots for a region
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Platform {
    pub host: String,
    /// Replaces `https://auth.<host>.<region>` when set
    pub auth_url: Option<String>,
    /// Replaces `https://api.<host>.<region>/v1` when set
    pub api_url: Option<String>,
}

impl Default for Platform {
    fn default() -> Self {
        Self {
            host: DEFAULT_PLATFORM_HOST.to_string(),
            auth_url: None,
            api_url: None,
        }
    }
}

impl Platform {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            ..Self::default()
        }
    }

    /// Platform with fixed roots, ignoring the region
    pub fn with_urls(auth_url: impl Into<String>, api_url: impl Into<String>) -> Self {
        Self {
            host: DEFAULT_PLATFORM_HOST.to_string(),
            auth_url: Some(auth_url.into()),
            api_url: Some(api_url.into()),
        }
    }

    pub fn auth_root(&self, region: Region) -> String {
        match &self.auth_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!("https://auth.{}.{}", self.host, region.suffix()),
        }
    }

    pub fn api_root(&self, region: Region) -> String {
        match &self.api_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!("https://api.{}.{}{}", self.host, region.suffix(), API_VERSION_PATH),
        }
    }

    /// OAuth token endpoint for a tenant
    pub fn token_url(&self, region: Region, tenant_id: &str) -> String {
        format!("{}/{}/as/token", self.auth_root(region), tenant_id)
    }
}

/// Forms collection path, relative to the API root
pub fn forms_path(tenant_id: &str) -> String {
    format!("/environments/{}/forms", tenant_id)
}

/// Single form path, relative to the API root
pub fn form_path(tenant_id: &str, form_id: &str) -> String {
    format!("{}/{}", forms_path(tenant_id), urlencoding::encode(form_id))
}
