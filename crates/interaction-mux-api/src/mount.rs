//! Kind-specific registration and hierarchical route composition.

use crate::handler::{BoxedHandler, HandlerSet, InteractionHandler};
use interaction_mux_core::{
    AutocompleteData, ButtonData, MessageCommandData, ModalData, Route, SelectData,
    SlashCommandData, TextInputData, UserCommandData,
};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Registration surface shared by [`Mux`](crate::Mux), [`RouteTable`](crate::RouteTable)
/// and [`RouteBuilder`].
///
/// There is one method per inner kind, so a handler is always registered for
/// the payload type it accepts.
///
/// # Examples
///
/// ```rust
/// use interaction_mux_api::{HandlerError, InteractionRequest, Mount, ResponseWriter, RouteBuilder};
/// use interaction_mux_core::SlashCommandData;
///
/// async fn add(writer: ResponseWriter, _request: InteractionRequest<SlashCommandData>) -> Result<(), HandlerError> {
///     writer.respond("added")?;
///     Ok(())
/// }
///
/// let mut builder = RouteBuilder::new();
/// builder.route("todo", |r| r.command("add", add));
///
/// let routes = builder.into_routes();
/// assert!(routes.contains_key(&"todo/add".into()));
/// ```
pub trait Mount {
    /// Register a handler of any kind at `route`
    fn mount_handler(&mut self, route: &Route, handler: BoxedHandler);

    fn button<H>(&mut self, route: impl Into<Route>, handler: H)
    where
        H: InteractionHandler<ButtonData>,
    {
        self.mount_handler(&route.into(), BoxedHandler::Button(Arc::new(handler)));
    }

    /// Register a handler for every select menu flavour
    fn select<H>(&mut self, route: impl Into<Route>, handler: H)
    where
        H: InteractionHandler<SelectData>,
    {
        self.mount_handler(&route.into(), BoxedHandler::Select(Arc::new(handler)));
    }

    fn text_input<H>(&mut self, route: impl Into<Route>, handler: H)
    where
        H: InteractionHandler<TextInputData>,
    {
        self.mount_handler(&route.into(), BoxedHandler::TextInput(Arc::new(handler)));
    }

    /// Register a modal submission handler, routed by the modal's `custom_id`
    fn modal<H>(&mut self, route: impl Into<Route>, handler: H)
    where
        H: InteractionHandler<ModalData>,
    {
        self.mount_handler(&route.into(), BoxedHandler::Modal(Arc::new(handler)));
    }

    /// Register an autocomplete handler. The route ends with the focused
    /// option name, e.g. `todo/remove/item`.
    fn autocomplete<H>(&mut self, route: impl Into<Route>, handler: H)
    where
        H: InteractionHandler<AutocompleteData>,
    {
        self.mount_handler(
            &route.into(),
            BoxedHandler::Autocomplete(Arc::new(handler)),
        );
    }

    /// Register a slash command handler
    fn command<H>(&mut self, route: impl Into<Route>, handler: H)
    where
        H: InteractionHandler<SlashCommandData>,
    {
        self.mount_handler(
            &route.into(),
            BoxedHandler::SlashCommand(Arc::new(handler)),
        );
    }

    /// Register a user context menu command. Names containing spaces are
    /// routed by their words, so `High Five` is registered as `High/Five`.
    fn user_command<H>(&mut self, route: impl Into<Route>, handler: H)
    where
        H: InteractionHandler<UserCommandData>,
    {
        self.mount_handler(
            &split_words(route.into()),
            BoxedHandler::UserCommand(Arc::new(handler)),
        );
    }

    /// Register a message context menu command
    fn message_command<H>(&mut self, route: impl Into<Route>, handler: H)
    where
        H: InteractionHandler<MessageCommandData>,
    {
        self.mount_handler(
            &split_words(route.into()),
            BoxedHandler::MessageCommand(Arc::new(handler)),
        );
    }

    /// Register every route built by `build` under `prefix`
    fn route<F>(&mut self, prefix: impl Into<Route>, build: F)
    where
        F: FnOnce(&mut RouteBuilder),
    {
        let prefix = prefix.into();
        let mut builder = RouteBuilder::new();
        build(&mut builder);

        for (route, set) in builder.into_routes() {
            let full = prefix.join(&route);
            for handler in set.into_handlers() {
                self.mount_handler(&full, handler);
            }
        }
    }
}

fn split_words(route: Route) -> Route {
    Route::from_segments(route.segments().flat_map(str::split_whitespace))
}

/// Collects routes relative to a prefix; see [`Mount::route`].
#[derive(Debug, Default)]
pub struct RouteBuilder {
    routes: BTreeMap<Route, HandlerSet>,
}

impl RouteBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// The flattened routes, relative to the builder's prefix
    pub fn into_routes(self) -> BTreeMap<Route, HandlerSet> {
        self.routes
    }
}

impl Mount for RouteBuilder {
    fn mount_handler(&mut self, route: &Route, handler: BoxedHandler) {
        self.routes.entry(route.clone()).or_default().insert(handler);
    }
}

impl Mount for crate::table::RouteTable {
    fn mount_handler(&mut self, route: &Route, handler: BoxedHandler) {
        self.insert_handler(route, handler);
    }
}

#[cfg(test)]
#[path = "mount_tests.rs"]
mod tests;
