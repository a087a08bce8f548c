//! # Interaction-Mux REST Client
//!
//! Outbound calls that accompany interaction handling: registering
//! application commands and managing follow-up messages after a deferred
//! response.
//!
//! Every request is authenticated with `Authorization: Bot <token>` and
//! bounded by the configured timeout.

pub mod client;
pub mod commands;
pub mod error;
pub mod followup;

pub use client::{ClientConfig, InteractionClient, DEFAULT_API_URL};
pub use commands::CommandScope;
pub use followup::SentMessage;
pub use error::ClientError;
