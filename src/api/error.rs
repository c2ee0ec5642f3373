//! Typed errors for token acquisition and form operations
//!
//! Every variant names the environment it happened in so that a failure in a
//! multi-environment session can be traced back without extra context.

use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// Which form operation failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormOperation {
    List,
    Download,
    Upload,
}

impl fmt::Display for FormOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            FormOperation::List => "list forms",
            FormOperation::Download => "download form",
            FormOperation::Upload => "upload form",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("[{env}] Invalid client credentials (check client id and secret)")]
    InvalidClient { env: String },

    #[error("[{env}] Insufficient permissions to obtain a token for this application")]
    InsufficientPermissions { env: String },

    #[error("[{env}] Authentication failed (HTTP {status}): {description}")]
    Failed {
        env: String,
        status: u16,
        description: String,
    },

    #[error("[{env}] Network error during authentication: {source}")]
    Network {
        env: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("[{env}] Unexpected token response: {message}")]
    InvalidResponse { env: String, message: String },
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("[{env}] Access token expired or invalid while trying to {operation}")]
    Unauthorized { env: String, operation: FormOperation },

    #[error("[{env}] Insufficient permissions to {operation}")]
    Forbidden { env: String, operation: FormOperation },

    #[error("[{env}] Form '{id}' not found")]
    NotFound { env: String, id: String },

    #[error("[{env}] Form payload rejected: {message}")]
    Validation { env: String, message: String },

    #[error("[{env}] A form with this name already exists: {message}")]
    Conflict { env: String, message: String },

    #[error("[{env}] Failed to {operation} (HTTP {status}): {message}")]
    Api {
        env: String,
        operation: FormOperation,
        status: u16,
        message: String,
    },

    #[error("[{env}] Network error while trying to {operation}: {source}")]
    Network {
        env: String,
        operation: FormOperation,
        #[source]
        source: reqwest::Error,
    },

    #[error("[{env}] Unexpected response while trying to {operation}: {message}")]
    InvalidResponse {
        env: String,
        operation: FormOperation,
        message: String,
    },

    #[error("[{env}] Failed to build HTTP client: {source}")]
    ClientBuild {
        env: String,
        #[source]
        source: reqwest::Error,
    },

    #[error(transparent)]
    Authentication(#[from] AuthError),
}

impl ApiError {
    /// Classify a non-success HTTP status for an operation.
    ///
    /// 404 is only "not found" for downloads and 400/409 only carry their
    /// specific meaning for uploads; everything else becomes a generic API error.
    pub fn from_status(
        env: &str,
        operation: FormOperation,
        status: u16,
        body: &str,
        form_id: Option<&str>,
    ) -> Self {
        let env = env.to_string();
        let message = platform_message(body);
        match (status, operation) {
            (401, _) => ApiError::Unauthorized { env, operation },
            (403, _) => ApiError::Forbidden { env, operation },
            (404, FormOperation::Download) => ApiError::NotFound {
                env,
                id: form_id.unwrap_or_default().to_string(),
            },
            (400, FormOperation::Upload) => ApiError::Validation { env, message },
            (409, FormOperation::Upload) => ApiError::Conflict { env, message },
            _ => ApiError::Api {
                env,
                operation,
                status,
                message,
            },
        }
    }

    /// HTTP status behind this error, when there was one
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Unauthorized { .. } => Some(401),
            ApiError::Forbidden { .. } => Some(403),
            ApiError::NotFound { .. } => Some(404),
            ApiError::Validation { .. } => Some(400),
            ApiError::Conflict { .. } => Some(409),
            ApiError::Api { status, .. } => Some(*status),
            ApiError::Network { .. }
            | ApiError::InvalidResponse { .. }
            | ApiError::ClientBuild { .. }
            | ApiError::Authentication(_) => None,
        }
    }
}

/// Extract a human readable message from a PingOne error body.
///
/// PingOne errors look like `{"code": ..., "message": ..., "details": [{"message": ...}]}`,
/// OAuth errors carry `error_description`. Falls back to the raw body.
pub fn platform_message(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "no details provided".to_string();
    }

    let Ok(json) = serde_json::from_str::<Value>(trimmed) else {
        return trimmed.to_string();
    };

    let mut parts = Vec::new();
    for key in ["error_description", "message"] {
        if let Some(text) = json.get(key).and_then(Value::as_str) {
            parts.push(text.to_string());
            break;
        }
    }
    if let Some(details) = json.get("details").and_then(Value::as_array) {
        parts.extend(
            details
                .iter()
                .filter_map(|d| d.get("message").and_then(Value::as_str))
                .map(str::to_string),
        );
    }

    if parts.is_empty() {
        trimmed.to_string()
    } else {
        parts.join("; ")
    }
}
