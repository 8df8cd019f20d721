//! Error Types
//!
//! Failures surfaced by the remote resource client and configuration.

use thiserror::Error;

/// Common result type for remote operations
pub type ApiResult<T> = Result<T, ApiError>;

/// Remote resource errors
///
/// Kept `Clone` so a failure can sit in query state and be handed to every subscriber.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Server unreachable, connection dropped or transport timeout
    #[error("network error: {0}")]
    Network(String),
    /// Response body was not the expected JSON
    #[error("malformed response: {0}")]
    Decode(String),
    /// The addressed record no longer exists
    #[error("not found: {0}")]
    NotFound(String),
    /// Any other non-2xx status
    #[error("server responded with status {status}")]
    Server { status: u16 },
}

impl ApiError {
    pub(crate) fn network(err: impl std::fmt::Display) -> Self {
        Self::Network(err.to_string())
    }

    pub(crate) fn decode(err: impl std::fmt::Display) -> Self {
        Self::Decode(err.to_string())
    }
}

/// Invalid client configuration
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid base url `{url}`: {reason}")]
    InvalidBaseUrl { url: String, reason: String },
    #[error("display limit must be at least 1")]
    ZeroDisplayLimit,
}

impl ConfigError {
    pub(crate) fn invalid_url(url: &str, reason: impl Into<String>) -> Self {
        Self::InvalidBaseUrl {
            url: url.to_string(),
            reason: reason.into(),
        }
    }
}
