//! Route lookup, typed decoding and handler invocation.
//!
//! Each handler runs on its own task and answers through a one-shot channel.
//! The dispatcher returns as soon as an answer arrives, so a handler may keep
//! working after a deferred response without holding up the HTTP request.

use crate::{
    errors::{DispatchError, InteractionError},
    handler::{BoxedHandler, HandlerError, InteractionHandler, InteractionRequest},
    responder::ResponseWriter,
    table::RouteTable,
};
use interaction_mux_core::{
    Classification, InnerKind, Interaction, InteractionResponse, RawData, Route,
};
use serde::de::DeserializeOwned;
use std::sync::{Arc, PoisonError, RwLock};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info_span, instrument, warn, Instrument};

type NotFoundHook = Arc<dyn InteractionHandler<RawData>>;

/// Routes classified interactions to their handlers.
///
/// Clones share the route table and the not-found hook.
#[derive(Clone)]
pub struct Dispatcher {
    table: Arc<RouteTable>,
    not_found: Arc<RwLock<NotFoundHook>>,
}

impl Dispatcher {
    /// Create a dispatcher whose route misses are only logged
    pub fn new(table: Arc<RouteTable>) -> Self {
        let hook: NotFoundHook = Arc::new(log_not_found);
        Self {
            table,
            not_found: Arc::new(RwLock::new(hook)),
        }
    }

    /// Replace the handler that runs when no route matches.
    ///
    /// It receives the untyped interaction and is expected to acknowledge it.
    pub fn set_not_found<H>(&self, handler: H)
    where
        H: InteractionHandler<RawData>,
    {
        let mut hook = self.not_found.write().unwrap_or_else(PoisonError::into_inner);
        *hook = Arc::new(handler);
    }

    fn not_found(&self) -> NotFoundHook {
        let hook = self.not_found.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&hook)
    }

    pub fn table(&self) -> &Arc<RouteTable> {
        &self.table
    }

    /// Dispatch one classified interaction and wait for its response.
    ///
    /// Pings are answered directly. Otherwise the handler registered for the
    /// classified kind at the longest matching prefix is invoked with the
    /// payload decoded into that kind's type.
    ///
    /// # Errors
    ///
    /// - `InteractionError::MalformedBody` if the payload does not decode into
    ///   the type of the matched handler; the handler is not invoked
    /// - `InteractionError::NoResponse` if the handler finished without
    ///   answering
    #[instrument(skip_all, fields(route = %classification.route, kind = ?classification.kind))]
    pub async fn dispatch(
        &self,
        classification: &Classification,
        raw: &[u8],
    ) -> Result<InteractionResponse, InteractionError> {
        let Some(kind) = classification.kind else {
            return Ok(InteractionResponse::Pong);
        };

        let route = classification.route.clone();
        let (writer, rx) = ResponseWriter::channel();
        let cancellation = CancellationToken::new();
        let guard = cancellation.clone().drop_guard();

        match self.table.lookup(kind, &route) {
            Some((matched, handler)) => {
                debug!(matched = %matched, "Route matched");
                let call = Call {
                    kind,
                    raw,
                    route: route.clone(),
                    matched,
                    cancellation,
                    writer,
                };
                spawn_boxed(handler, call)?;
            }
            None => {
                let miss = DispatchError::RouteNotFound {
                    namespace: kind.namespace(),
                    route: route.clone(),
                    kind,
                };
                debug!(error = %miss, "Falling back to not-found handler");
                let call = Call {
                    kind,
                    raw,
                    route: route.clone(),
                    matched: Route::root(),
                    cancellation,
                    writer,
                };
                spawn_handler(self.not_found(), call)?;
            }
        }

        let response = rx.await.map_err(|_| InteractionError::NoResponse {
            route: route.to_string(),
        })?;

        guard.disarm();
        Ok(response)
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("table", &self.table)
            .finish_non_exhaustive()
    }
}

struct Call<'a> {
    kind: InnerKind,
    raw: &'a [u8],
    route: Route,
    matched: Route,
    cancellation: CancellationToken,
    writer: ResponseWriter,
}

fn spawn_boxed(handler: BoxedHandler, call: Call<'_>) -> Result<(), DispatchError> {
    match handler {
        BoxedHandler::Button(h) => spawn_handler(h, call),
        BoxedHandler::Select(h) => spawn_handler(h, call),
        BoxedHandler::TextInput(h) => spawn_handler(h, call),
        BoxedHandler::Modal(h) => spawn_handler(h, call),
        BoxedHandler::Autocomplete(h) => spawn_handler(h, call),
        BoxedHandler::SlashCommand(h) => spawn_handler(h, call),
        BoxedHandler::UserCommand(h) => spawn_handler(h, call),
        BoxedHandler::MessageCommand(h) => spawn_handler(h, call),
    }
}

/// Decode the payload for `handler` and run it on its own task
fn spawn_handler<T>(
    handler: Arc<dyn InteractionHandler<T>>,
    call: Call<'_>,
) -> Result<(), DispatchError>
where
    T: Send + 'static,
    Interaction<T>: DeserializeOwned,
{
    let interaction: Interaction<T> =
        serde_json::from_slice(call.raw).map_err(|source| DispatchError::Decode {
            kind: call.kind,
            source,
        })?;

    let span = info_span!(
        "interaction_handler",
        interaction_id = %interaction.id,
        route = %call.route,
        kind = %call.kind,
    );

    let request = InteractionRequest::new(interaction, call.route, call.matched, call.cancellation);
    let writer = call.writer;

    tokio::spawn(
        async move {
            if let Err(e) = handler.handle(writer, request).await {
                error!(error = %e, "Handler execution failed");
            }
        }
        .instrument(span),
    );

    Ok(())
}

/// Default not-found hook: log and leave the interaction unanswered
async fn log_not_found(
    writer: ResponseWriter,
    request: InteractionRequest<RawData>,
) -> Result<(), HandlerError> {
    warn!(
        interaction_id = %request.id,
        interaction_type = %request.interaction_type,
        route = %request.route(),
        "No handler registered for route"
    );
    drop(writer);
    Ok(())
}

#[cfg(test)]
#[path = "dispatch_tests.rs"]
mod tests;
