//! Error types for the interaction receiver

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use interaction_mux_core::{ClassifyError, InnerKind, Route, RouteNamespace};
use tracing::{debug, error, warn};

/// Request-level failures with HTTP status code mapping
///
/// - `401 Unauthorized`: signature missing or invalid; nothing else ran
/// - `400 Bad Request`: body is not a valid interaction
/// - `413 Payload Too Large`: body exceeds the configured limit
/// - `500 Internal Server Error`: the response could not be produced
#[derive(Debug, thiserror::Error)]
pub enum InteractionError {
    /// Signature verification failed
    ///
    /// Maps to: `401 Unauthorized`
    #[error("Unauthorized: {0}")]
    Unauthorized(#[from] VerifyError),

    /// Body is not a well-formed interaction of a supported type
    ///
    /// Maps to: `400 Bad Request`
    #[error("Malformed interaction: {message}")]
    MalformedBody { message: String },

    /// Body exceeds the configured maximum size
    ///
    /// Maps to: `413 Payload Too Large`
    #[error("Payload too large (max: {max_size} bytes)")]
    PayloadTooLarge { max_size: usize },

    /// Response serialization failed before anything was written
    ///
    /// Maps to: `500 Internal Server Error`
    #[error("Response encoding failed: {0}")]
    Encoding(#[from] EncodeError),

    /// The handler finished without answering the interaction
    ///
    /// Maps to: `500 Internal Server Error`
    #[error("No response was produced for route '{route}'")]
    NoResponse { route: String },
}

impl From<ClassifyError> for InteractionError {
    fn from(e: ClassifyError) -> Self {
        Self::MalformedBody {
            message: e.to_string(),
        }
    }
}

impl From<DispatchError> for InteractionError {
    fn from(e: DispatchError) -> Self {
        Self::MalformedBody {
            message: e.to_string(),
        }
    }
}

impl IntoResponse for InteractionError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::Unauthorized(ref e) => {
                debug!(error = %e, "Rejected interaction signature");
                (StatusCode::UNAUTHORIZED, "invalid request signature".to_string())
            }
            Self::MalformedBody { .. } => {
                warn!(error = %self, "Malformed interaction body");
                (StatusCode::BAD_REQUEST, self.to_string())
            }
            Self::PayloadTooLarge { max_size } => {
                warn!(max_size = max_size, "Payload too large");
                (StatusCode::PAYLOAD_TOO_LARGE, self.to_string())
            }
            Self::Encoding(ref e) => {
                error!(error = %e, "Failed to encode interaction response");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error occurred".to_string(),
                )
            }
            Self::NoResponse { ref route } => {
                error!(route = %route, "Interaction was not answered");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Interaction was not answered".to_string(),
                )
            }
        };

        let body = serde_json::json!({
            "error": message,
            "status": status.as_u16(),
            "timestamp": chrono::Utc::now().to_rfc3339(),
        });

        (status, Json(body)).into_response()
    }
}

/// Signature verification failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VerifyError {
    #[error("Invalid public key: {message}")]
    InvalidPublicKey { message: String },

    #[error("Missing header: {header}")]
    MissingHeader { header: &'static str },

    #[error("Invalid signature format: {message}")]
    InvalidSignatureFormat { message: String },

    #[error("Signature does not match payload")]
    SignatureMismatch,
}

/// Routing and decoding failures inside the dispatcher
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("No {kind} handler registered for '{route}' in the {namespace} routes")]
    RouteNotFound {
        namespace: RouteNamespace,
        route: Route,
        kind: InnerKind,
    },

    #[error("Failed to decode {kind} payload: {source}")]
    Decode {
        kind: InnerKind,
        #[source]
        source: serde_json::Error,
    },
}

/// The interaction can no longer be answered
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResponseError {
    /// The HTTP request was abandoned before the response was sent
    #[error("Interaction request is closed")]
    Closed,
}

/// Response encoding failures
#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid header value: {0}")]
    Header(#[from] axum::http::header::InvalidHeaderValue),

    #[error("Failed to stream attachment {index}: {source}")]
    Io {
        index: usize,
        #[source]
        source: std::io::Error,
    },
}

/// Service-level errors
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Failed to bind to address {address}: {message}")]
    BindFailed { address: String, message: String },

    #[error("Server failed: {message}")]
    ServerFailed { message: String },

    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {message}")]
    Invalid { message: String },

    #[error("Missing required configuration: {key}")]
    Missing { key: String },
}

impl From<VerifyError> for ConfigError {
    fn from(e: VerifyError) -> Self {
        Self::Invalid {
            message: e.to_string(),
        }
    }
}

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;
