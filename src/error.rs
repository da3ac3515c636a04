//! Error types for configuration loading and remote data access.

use std::time::Duration;

use thiserror::Error;

/// Configuration error with field path and constraint description.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("config error: {field} - {message}")]
pub struct ConfigError {
    /// Dotted field path (e.g., `"gateway.max_attempts"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl ConfigError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Failure of a single remote call. Never surfaced past the gateway: every
/// variant routes the request to its deterministic fallback.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("{0} credential not configured")]
    MissingCredential(&'static str),

    #[error("remote calls disabled (offline mode)")]
    Offline,

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("upstream returned status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("JSON parsing error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("projection unavailable: {0}")]
    Projection(String),
}

impl GatewayError {
    /// Whether another attempt could plausibly succeed.
    ///
    /// Precondition failures and client-side (4xx) statuses are final;
    /// transport errors, timeouts and server-side statuses are retried.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::MissingCredential(_) | Self::Offline | Self::Decode(_) | Self::Projection(_) => {
                false
            }
            Self::Status { status, .. } => *status >= 500 || *status == 429,
            Self::Http(_) | Self::Timeout(_) => true,
        }
    }
}

pub type GatewayResult<T> = Result<T, GatewayError>;

/// Failure to set up the engine.
#[derive(Debug, Error)]
pub enum OutlookError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to initialise data sources: {0}")]
    Gateway(#[from] GatewayError),
}
