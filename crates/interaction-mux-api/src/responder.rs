//! One-shot response capability handed to handlers.
//!
//! Every method consumes the writer, so answering an interaction twice does
//! not compile:
//!
//! ```compile_fail
//! use interaction_mux_api::ResponseWriter;
//!
//! let (writer, _rx) = ResponseWriter::channel();
//! writer.ack().unwrap();
//! writer.respond("again").unwrap();
//! ```

use crate::errors::ResponseError;
use interaction_mux_core::{Choice, InteractionResponse, Message, MessageFlags, Modal};
use tokio::sync::oneshot;

/// Sends exactly one [`InteractionResponse`] back to the HTTP layer.
#[derive(Debug)]
pub struct ResponseWriter {
    tx: oneshot::Sender<InteractionResponse>,
}

impl ResponseWriter {
    /// Create a writer and the receiving end the HTTP layer waits on
    pub fn channel() -> (Self, oneshot::Receiver<InteractionResponse>) {
        let (tx, rx) = oneshot::channel();
        (Self { tx }, rx)
    }

    /// True when the request has been abandoned and nothing can be sent
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    /// Send any response
    pub fn send(self, response: InteractionResponse) -> Result<(), ResponseError> {
        self.tx.send(response).map_err(|_| ResponseError::Closed)
    }

    /// Acknowledge a ping (type 1)
    pub fn ack(self) -> Result<(), ResponseError> {
        self.send(InteractionResponse::Pong)
    }

    /// Reply with a message (type 4)
    pub fn respond(self, message: impl Into<Message>) -> Result<(), ResponseError> {
        self.send(InteractionResponse::Message(message.into()))
    }

    /// Acknowledge now and send the message later as a follow-up (type 5)
    pub fn deferred_respond(self) -> Result<(), ResponseError> {
        self.send(InteractionResponse::DeferredMessage {
            flags: MessageFlags::empty(),
        })
    }

    /// Like [`deferred_respond`](Self::deferred_respond) but the follow-up is
    /// only visible to the invoking user
    pub fn deferred_respond_ephemeral(self) -> Result<(), ResponseError> {
        self.send(InteractionResponse::DeferredMessage {
            flags: MessageFlags::EPHEMERAL,
        })
    }

    /// Acknowledge a component interaction and edit the message later (type 6)
    pub fn deferred_update(self) -> Result<(), ResponseError> {
        self.send(InteractionResponse::DeferredUpdate)
    }

    /// Edit the message the component is attached to (type 7)
    pub fn update(self, message: impl Into<Message>) -> Result<(), ResponseError> {
        self.send(InteractionResponse::Update(message.into()))
    }

    /// Suggest values for the focused option (type 8)
    pub fn autocomplete<I>(self, choices: I) -> Result<(), ResponseError>
    where
        I: IntoIterator<Item = Choice>,
    {
        self.send(InteractionResponse::Autocomplete(
            choices.into_iter().collect(),
        ))
    }

    /// Open a modal dialog (type 9)
    pub fn modal(self, modal: Modal) -> Result<(), ResponseError> {
        self.send(InteractionResponse::Modal(modal))
    }
}

#[cfg(test)]
#[path = "responder_tests.rs"]
mod tests;
