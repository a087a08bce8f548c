//! Handler abstraction and the typed request handed to handlers.
//!
//! Every inner interaction kind has its own payload type, and a handler is
//! registered for exactly one of them. [`BoxedHandler`] is the closed set of
//! registered handlers; the dispatcher matches on it to pick the payload type
//! to decode, so a handler can never receive a payload of the wrong kind.

use crate::responder::ResponseWriter;
use async_trait::async_trait;
use interaction_mux_core::{
    AutocompleteData, ButtonData, InnerKind, Interaction, MessageCommandData, ModalData, Route,
    SelectData, SlashCommandData, TextInputData, UserCommandData,
};
use std::{collections::BTreeMap, fmt, future::Future, ops::Deref, sync::Arc};
use tokio_util::sync::CancellationToken;

/// Error returned by handlers. Logged by the dispatcher, never propagated to
/// the platform.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

// ============================================================================
// Handler trait
// ============================================================================

/// Handles one kind of interaction.
///
/// Implemented for every `async fn(ResponseWriter, InteractionRequest<T>) ->
/// Result<(), HandlerError>` and for closures with the same shape.
///
/// # Examples
///
/// ```rust
/// use interaction_mux_api::{HandlerError, InteractionRequest, ResponseWriter};
/// use interaction_mux_core::ButtonData;
///
/// async fn click(writer: ResponseWriter, request: InteractionRequest<ButtonData>) -> Result<(), HandlerError> {
///     writer.respond(format!("clicked {}", request.data.custom_id))?;
///     Ok(())
/// }
/// ```
#[async_trait]
pub trait InteractionHandler<T: Send + 'static>: Send + Sync + 'static {
    /// Answer the interaction through `writer`.
    ///
    /// The HTTP response is sent as soon as `writer` is used. Work done after
    /// that point does not delay the platform.
    async fn handle(
        &self,
        writer: ResponseWriter,
        request: InteractionRequest<T>,
    ) -> Result<(), HandlerError>;
}

#[async_trait]
impl<T, F, Fut> InteractionHandler<T> for F
where
    T: Send + 'static,
    F: Fn(ResponseWriter, InteractionRequest<T>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), HandlerError>> + Send + 'static,
{
    async fn handle(
        &self,
        writer: ResponseWriter,
        request: InteractionRequest<T>,
    ) -> Result<(), HandlerError> {
        (self)(writer, request).await
    }
}

// ============================================================================
// Typed request
// ============================================================================

/// A decoded interaction together with its routing context.
///
/// Dereferences to the [`Interaction`] so payload fields are reachable as
/// `request.data`.
#[derive(Debug)]
pub struct InteractionRequest<T> {
    interaction: Interaction<T>,
    route: Route,
    matched: Route,
    cancellation: CancellationToken,
}

impl<T> InteractionRequest<T> {
    pub fn new(
        interaction: Interaction<T>,
        route: Route,
        matched: Route,
        cancellation: CancellationToken,
    ) -> Self {
        Self {
            interaction,
            route,
            matched,
            cancellation,
        }
    }

    /// Full route the interaction was classified to
    pub fn route(&self) -> &Route {
        &self.route
    }

    /// Registered prefix that matched the route
    pub fn matched_prefix(&self) -> &Route {
        &self.matched
    }

    /// Route segments below the matched prefix, e.g. `["next", "42"]` for
    /// `list/next/42` matched by `list`
    pub fn remainder(&self) -> Vec<&str> {
        let depth = self.matched.segments().count();
        self.route.segments().skip(depth).collect()
    }

    /// Cancelled when the inbound HTTP request goes away before it is answered
    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancellation
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }

    pub fn into_interaction(self) -> Interaction<T> {
        self.interaction
    }
}

impl<T> Deref for InteractionRequest<T> {
    type Target = Interaction<T>;

    fn deref(&self) -> &Self::Target {
        &self.interaction
    }
}

// ============================================================================
// Registered handlers
// ============================================================================

/// A registered handler, tagged with the payload kind it accepts.
#[derive(Clone)]
pub enum BoxedHandler {
    Button(Arc<dyn InteractionHandler<ButtonData>>),
    Select(Arc<dyn InteractionHandler<SelectData>>),
    TextInput(Arc<dyn InteractionHandler<TextInputData>>),
    Modal(Arc<dyn InteractionHandler<ModalData>>),
    Autocomplete(Arc<dyn InteractionHandler<AutocompleteData>>),
    SlashCommand(Arc<dyn InteractionHandler<SlashCommandData>>),
    UserCommand(Arc<dyn InteractionHandler<UserCommandData>>),
    MessageCommand(Arc<dyn InteractionHandler<MessageCommandData>>),
}

impl BoxedHandler {
    pub fn kind(&self) -> InnerKind {
        match self {
            Self::Button(_) => InnerKind::Button,
            Self::Select(_) => InnerKind::Select,
            Self::TextInput(_) => InnerKind::TextInput,
            Self::Modal(_) => InnerKind::Modal,
            Self::Autocomplete(_) => InnerKind::Autocomplete,
            Self::SlashCommand(_) => InnerKind::SlashCommand,
            Self::UserCommand(_) => InnerKind::UserCommand,
            Self::MessageCommand(_) => InnerKind::MessageCommand,
        }
    }
}

impl fmt::Debug for BoxedHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("BoxedHandler").field(&self.kind()).finish()
    }
}

/// Handlers registered at one route, at most one per kind.
#[derive(Clone, Default)]
pub struct HandlerSet {
    handlers: BTreeMap<InnerKind, BoxedHandler>,
}

impl HandlerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// A set holding a single handler
    pub fn single(handler: BoxedHandler) -> Self {
        let mut set = Self::new();
        set.insert(handler);
        set
    }

    /// Add a handler, returning the one it replaces for the same kind
    pub fn insert(&mut self, handler: BoxedHandler) -> Option<BoxedHandler> {
        self.handlers.insert(handler.kind(), handler)
    }

    pub fn get(&self, kind: InnerKind) -> Option<&BoxedHandler> {
        self.handlers.get(&kind)
    }

    /// Kinds with a registered handler, in a stable order
    pub fn kinds(&self) -> impl Iterator<Item = InnerKind> + '_ {
        self.handlers.keys().copied()
    }

    /// Add every handler of `other`; `other` wins on conflicting kinds
    pub fn merge(&mut self, other: HandlerSet) {
        self.handlers.extend(other.handlers);
    }

    pub fn into_handlers(self) -> impl Iterator<Item = BoxedHandler> {
        self.handlers.into_values()
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl fmt::Debug for HandlerSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.kinds()).finish()
    }
}

#[cfg(test)]
#[path = "handler_tests.rs"]
mod tests;
