//! # Interaction-Mux HTTP Service
//!
//! HTTP receiver for platform interactions delivered over a webhook.
//!
//! Every request passes through the same pipeline:
//! - Ed25519 signature verification over `timestamp ‖ body`
//! - classification into a route and a handler kind
//! - longest-prefix route lookup in the namespace of that kind
//! - typed decoding and handler invocation on its own task
//! - JSON or multipart encoding of the handler's single response
//!
//! Handlers are registered through the [`Mount`] trait on a [`Mux`], which
//! also produces the axum [`Router`] serving them.

pub mod config;
pub mod dispatch;
pub mod encode;
pub mod errors;
pub mod handler;
pub mod mount;
pub mod mux;
pub mod responder;
pub mod table;
pub mod verify;

pub use config::{ApplicationConfig, LoggingConfig, ServerConfig, ServiceConfig};
pub use interaction_mux_core::BotToken;
pub use dispatch::Dispatcher;
pub use encode::ResponseEncoder;
pub use errors::{
    ConfigError, DispatchError, EncodeError, InteractionError, ResponseError, ServiceError,
    VerifyError,
};
pub use handler::{BoxedHandler, HandlerError, HandlerSet, InteractionHandler, InteractionRequest};
pub use mount::{Mount, RouteBuilder};
pub use mux::Mux;
pub use responder::ResponseWriter;
pub use table::{RouteInfo, RouteTable};
pub use verify::{verify_signature, SignatureVerifier, SIGNATURE_HEADER, TIMESTAMP_HEADER};

use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, State},
    middleware,
    response::Response,
    routing::post,
    Router,
};
use std::future::{Future, IntoFuture};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};
use tracing::{error, info, instrument, warn};

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;

// ============================================================================
// HTTP Server
// ============================================================================

/// Create the HTTP router serving `mux` at the configured base path.
///
/// Signature verification is a route layer, so requests to unknown paths are
/// rejected with 404 before any body is read. Bodies are capped at
/// `config.max_body_size`.
#[allow(deprecated)]
pub fn create_router(mux: Mux, config: &ServerConfig) -> Router {
    let verifier = Arc::new(
        mux.verifier()
            .as_ref()
            .clone()
            .with_max_body_size(config.max_body_size),
    );

    Router::new()
        .route(&config.base_path, post(handle_interaction))
        .route_layer(middleware::from_fn_with_state(verifier, verify_signature))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(TimeoutLayer::new(Duration::from_secs(config.timeout_seconds)))
                .layer(DefaultBodyLimit::max(config.max_body_size))
                .layer(middleware::from_fn(request_logging_middleware))
                .into_inner(),
        )
        .with_state(mux)
}

/// Start the HTTP server and run until `shutdown` completes.
///
/// After `shutdown` completes the server stops accepting connections and
/// waits up to `shutdown_timeout_seconds` for in-flight interactions.
///
/// # Errors
///
/// - `ServiceError::BindFailed` if the listener cannot be bound
/// - `ServiceError::ServerFailed` if the server stops with an I/O error
pub async fn start_server<F>(mux: Mux, config: &ServerConfig, shutdown: F) -> Result<(), ServiceError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = create_router(mux, config);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| ServiceError::BindFailed {
            address: addr.clone(),
            message: e.to_string(),
        })?;

    info!(
        address = %addr,
        base_path = %config.base_path,
        "Starting interaction server"
    );

    let shutdown_timeout = Duration::from_secs(config.shutdown_timeout_seconds);
    let (signalled_tx, signalled_rx) = tokio::sync::oneshot::channel::<()>();
    let signal = async move {
        shutdown.await;
        info!(
            timeout_seconds = shutdown_timeout.as_secs(),
            "Shutdown requested, draining in-flight requests"
        );
        let _ = signalled_tx.send(());
    };

    let drain_deadline = async move {
        match signalled_rx.await {
            Ok(()) => tokio::time::sleep(shutdown_timeout).await,
            Err(_) => std::future::pending::<()>().await,
        }
    };

    let server = axum::serve(listener, app)
        .with_graceful_shutdown(signal)
        .into_future();

    tokio::select! {
        result = server => {
            result.map_err(|e| ServiceError::ServerFailed {
                message: e.to_string(),
            })?;
        }
        _ = drain_deadline => {
            warn!(
                timeout_seconds = shutdown_timeout.as_secs(),
                "Graceful shutdown timed out, dropping in-flight requests"
            );
        }
    }

    info!("HTTP server shutdown complete");
    Ok(())
}

// ============================================================================
// Interaction Handler
// ============================================================================

/// Handle a verified interaction request
#[instrument(skip_all)]
async fn handle_interaction(
    State(mux): State<Mux>,
    body: Bytes,
) -> Result<Response, InteractionError> {
    mux.handle(&body).await
}

// ============================================================================
// Middleware
// ============================================================================

/// Request logging middleware
///
/// Propagates `x-correlation-id`, generating one when absent, and logs the
/// outcome of every request at a level matching its status class.
#[instrument(skip(request, next), fields(
    method = %request.method(),
    uri = %request.uri(),
    correlation_id
))]
async fn request_logging_middleware(
    mut request: axum::extract::Request,
    next: axum::middleware::Next,
) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = std::time::Instant::now();

    let correlation_id = request
        .headers()
        .get("x-correlation-id")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    tracing::Span::current().record("correlation_id", correlation_id.as_str());
    request.extensions_mut().insert(correlation_id.clone());

    info!(
        correlation_id = %correlation_id,
        method = %method,
        uri = %uri,
        "Request started"
    );

    let mut response = next.run(request).await;
    let duration = start.elapsed();

    if let Ok(header_value) = correlation_id.parse() {
        response
            .headers_mut()
            .insert("x-correlation-id", header_value);
    }

    let status = response.status();
    if status.is_server_error() {
        error!(
            correlation_id = %correlation_id,
            status = %status,
            duration_ms = %duration.as_millis(),
            "Request completed with server error"
        );
    } else if status.is_client_error() {
        warn!(
            correlation_id = %correlation_id,
            status = %status,
            duration_ms = %duration.as_millis(),
            "Request completed with client error"
        );
    } else {
        info!(
            correlation_id = %correlation_id,
            status = %status,
            duration_ms = %duration.as_millis(),
            "Request completed successfully"
        );
    }

    response
}
