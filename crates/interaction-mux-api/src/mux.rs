//! Composition root tying verification, routing, dispatch and encoding
//! together.

use crate::{
    config::{ServerConfig, ServiceConfig},
    dispatch::Dispatcher,
    encode::ResponseEncoder,
    errors::{ConfigError, InteractionError, VerifyError},
    handler::{BoxedHandler, InteractionHandler},
    mount::Mount,
    table::{RouteInfo, RouteTable},
    verify::SignatureVerifier,
};
use axum::{response::Response, Router};
use interaction_mux_core::{classify, RawData, Route, Snowflake};
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Interaction multiplexer.
///
/// Owns the route table and everything needed to turn a verified request body
/// into an HTTP response. Cloning is cheap; clones share the route table.
///
/// # Examples
///
/// ```rust
/// use interaction_mux_api::{HandlerError, InteractionRequest, Mount, Mux, ResponseWriter, ServerConfig};
/// use interaction_mux_core::{ButtonData, Snowflake};
///
/// async fn click(writer: ResponseWriter, _request: InteractionRequest<ButtonData>) -> Result<(), HandlerError> {
///     writer.respond("clicked")?;
///     Ok(())
/// }
///
/// # let public_key = hex::encode(ed25519_dalek::SigningKey::from_bytes(&[1u8; 32]).verifying_key().as_bytes());
/// let mut mux = Mux::new(&public_key, Snowflake::new(42)).unwrap();
/// mux.button("click_one", click);
///
/// let router = mux.router(&ServerConfig::default());
/// # drop(router);
/// ```
#[derive(Clone)]
pub struct Mux {
    table: Arc<RouteTable>,
    dispatcher: Dispatcher,
    verifier: Arc<SignatureVerifier>,
    encoder: ResponseEncoder,
    application_id: Snowflake,
}

impl Mux {
    /// Create a multiplexer with default server limits.
    ///
    /// # Errors
    ///
    /// Returns `VerifyError::InvalidPublicKey` if `public_key_hex` is not a
    /// valid Ed25519 public key.
    pub fn new(public_key_hex: &str, application_id: Snowflake) -> Result<Self, VerifyError> {
        let verifier =
            SignatureVerifier::new(public_key_hex, ServerConfig::default().max_body_size)?;
        Ok(Self::with_verifier(verifier, application_id))
    }

    /// Create a multiplexer from the service configuration
    pub fn from_config(config: &ServiceConfig) -> Result<Self, ConfigError> {
        let verifier = SignatureVerifier::new(
            &config.application.public_key,
            config.server.max_body_size,
        )?;
        Ok(Self::with_verifier(
            verifier,
            config.application.application_id,
        ))
    }

    fn with_verifier(verifier: SignatureVerifier, application_id: Snowflake) -> Self {
        let table = Arc::new(RouteTable::new());
        Self {
            dispatcher: Dispatcher::new(Arc::clone(&table)),
            table,
            verifier: Arc::new(verifier),
            encoder: ResponseEncoder::default(),
            application_id,
        }
    }

    /// Replace the response encoder, e.g. to change the attachment buffer size
    pub fn with_encoder(mut self, encoder: ResponseEncoder) -> Self {
        self.encoder = encoder;
        self
    }

    /// Handler invoked when no route matches. The default only logs.
    ///
    /// Clones, and routers built from them, share the hook.
    pub fn on_not_found<H>(&mut self, handler: H)
    where
        H: InteractionHandler<RawData>,
    {
        self.dispatcher.set_not_found(handler);
    }

    /// Copy every route of `sub` under `prefix`
    pub fn mount_table(&mut self, prefix: impl Into<Route>, sub: &RouteTable) {
        let prefix = prefix.into();
        self.table.mount(&prefix, sub);
        debug!(prefix = %prefix, routes = sub.len(), "Mounted route table");
    }

    /// Registered routes, for startup logging
    pub fn routes(&self) -> Vec<RouteInfo> {
        self.table.entries()
    }

    pub fn table(&self) -> &Arc<RouteTable> {
        &self.table
    }

    pub fn verifier(&self) -> Arc<SignatureVerifier> {
        Arc::clone(&self.verifier)
    }

    pub fn application_id(&self) -> Snowflake {
        self.application_id
    }

    /// Axum router serving this multiplexer.
    ///
    /// The request body cap comes from `config`, not from the limit the
    /// multiplexer was created with.
    pub fn router(&self, config: &ServerConfig) -> Router {
        crate::create_router(self.clone(), config)
    }

    /// Classify, dispatch and encode an already verified request body.
    ///
    /// # Errors
    ///
    /// See [`InteractionError`] for the status each failure maps to.
    #[instrument(skip_all, fields(body_size = body.len()))]
    pub async fn handle(&self, body: &[u8]) -> Result<Response, InteractionError> {
        let classification = classify(body)?;
        debug!(
            interaction_type = %classification.interaction_type,
            route = %classification.route,
            kind = ?classification.kind,
            "Interaction classified"
        );

        let response = self.dispatcher.dispatch(&classification, body).await?;
        let callback_type = response.callback_type();
        let http = self.encoder.encode(response)?;

        info!(
            interaction_type = %classification.interaction_type,
            route = %classification.route,
            callback_type = callback_type,
            "Interaction answered"
        );
        Ok(http)
    }
}

impl Mount for Mux {
    fn mount_handler(&mut self, route: &Route, handler: BoxedHandler) {
        debug!(route = %route, kind = %handler.kind(), "Registering handler");
        self.table.insert_handler(route, handler);
    }
}

impl std::fmt::Debug for Mux {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mux")
            .field("application_id", &self.application_id)
            .field("routes", &self.table.entries())
            .field("encoder", &self.encoder)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "mux_tests.rs"]
mod tests;
