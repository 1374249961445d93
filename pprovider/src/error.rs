//! Provider error kinds and error value helpers.
//!
//! ```rust
//! use pprovider::{ProviderError, ProviderErrorKind};
//!
//! let api = ProviderError::api(401, "invalid key");
//! assert_eq!(api.kind(), ProviderErrorKind::Api);
//! assert!(!api.is_retryable());
//!
//! let timeout = ProviderError::timeout("request timed out");
//! assert!(timeout.is_retryable());
//! ```

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderErrorKind {
    Transport,
    Api,
    Parse,
    InvalidRequest,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// The endpoint could not be reached (connect, DNS, TLS, timeout).
    #[error("transport error: {message}")]
    Transport { message: String, timed_out: bool },

    /// The endpoint answered with a non-success status.
    #[error("API request failed with status {status}: {body}")]
    Api { status: u16, body: String },

    /// The endpoint answered with a success status but an unusable body.
    #[error("could not parse API response: {0}")]
    Parse(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl ProviderError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
            timed_out: false,
        }
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
            timed_out: true,
        }
    }

    pub fn api(status: u16, body: impl Into<String>) -> Self {
        Self::Api {
            status,
            body: body.into(),
        }
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    pub fn kind(&self) -> ProviderErrorKind {
        match self {
            Self::Transport { .. } => ProviderErrorKind::Transport,
            Self::Api { .. } => ProviderErrorKind::Api,
            Self::Parse(_) => ProviderErrorKind::Parse,
            Self::InvalidRequest(_) => ProviderErrorKind::InvalidRequest,
        }
    }

    /// Whether sending the same request again could plausibly succeed.
    ///
    /// Nothing in this workspace retries; callers use this to pick their own
    /// policy.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport { .. } => true,
            Self::Api { status, .. } => is_retryable_status(*status),
            Self::Parse(_) | Self::InvalidRequest(_) => false,
        }
    }
}

/// Statuses worth retrying: request timeout, rate limiting, server errors.
pub fn is_retryable_status(status: u16) -> bool {
    matches!(status, 408 | 429 | 500..=599)
}
