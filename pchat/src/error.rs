//! Chat-layer errors and classification.

use pprovider::{ProviderError, is_retryable_status};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExchangeErrorKind {
    InvalidRequest,
    Transport,
    Api,
    Parse,
}

/// Failure of a single exchange. None of these end the session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExchangeError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("could not reach the endpoint: {message}")]
    Transport { message: String, timed_out: bool },

    #[error("API request failed with status {status}: {body}")]
    Api { status: u16, body: String },

    #[error("could not parse API response: {0}")]
    Parse(String),
}

impl ExchangeError {
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    pub fn kind(&self) -> ExchangeErrorKind {
        match self {
            Self::InvalidRequest(_) => ExchangeErrorKind::InvalidRequest,
            Self::Transport { .. } => ExchangeErrorKind::Transport,
            Self::Api { .. } => ExchangeErrorKind::Api,
            Self::Parse(_) => ExchangeErrorKind::Parse,
        }
    }

    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport { .. } => true,
            Self::Api { status, .. } => is_retryable_status(*status),
            Self::InvalidRequest(_) | Self::Parse(_) => false,
        }
    }
}

impl From<ProviderError> for ExchangeError {
    fn from(value: ProviderError) -> Self {
        match value {
            ProviderError::Transport { message, timed_out } => {
                Self::Transport { message, timed_out }
            }
            ProviderError::Api { status, body } => Self::Api { status, body },
            ProviderError::Parse(message) => Self::Parse(message),
            ProviderError::InvalidRequest(message) => Self::InvalidRequest(message),
        }
    }
}

/// Settings problems. Any of these stops the program before the first
/// exchange.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("API key is not configured")]
    MissingApiKey,

    #[error("API URL `{url}` is invalid: {reason}")]
    InvalidApiUrl { url: String, reason: String },

    #[error("model must not be empty")]
    EmptyModel,

    #[error("max tokens must be greater than zero")]
    InvalidMaxTokens,

    #[error("temperature {0} is outside the range 0.0..=2.0")]
    InvalidTemperature(f32),

    #[error("could not load configuration: {0}")]
    Load(String),
}
