//! Error types for REST operations.

use thiserror::Error;

/// Errors returned by [`crate::InteractionClient`].
#[derive(Debug, Error)]
pub enum ClientError {
    /// The platform answered with a non-success status.
    #[error("HTTP error: {status} - {body}")]
    HttpError { status: u16, body: String },

    /// Rate limit exceeded. The request may be retried after the given delay.
    #[error("Rate limit exceeded. Retry after: {retry_after_seconds:?}s")]
    RateLimited {
        retry_after_seconds: Option<f64>,
        body: String,
    },

    /// The request was rejected before it was sent.
    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },

    /// Client construction failed.
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Request to the platform timed out.
    #[error("Request timeout")]
    Timeout,

    /// Failed to parse a JSON response.
    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// HTTP client error (network, TLS, etc.).
    #[error("HTTP client error: {0}")]
    HttpClientError(reqwest::Error),
}

impl ClientError {
    /// Status code of the response, when the platform answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::HttpError { status, .. } => Some(*status),
            Self::RateLimited { .. } => Some(429),
            _ => None,
        }
    }

    /// Check if this error represents a transient condition that may succeed if retried.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::HttpError { status, .. } => *status >= 500,
            Self::RateLimited { .. } => true,
            Self::Timeout => true,
            Self::HttpClientError(_) => true,
            Self::InvalidRequest { .. } | Self::Configuration { .. } | Self::JsonError(_) => false,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout
        } else {
            Self::HttpClientError(error)
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
