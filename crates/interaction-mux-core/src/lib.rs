//! # Interaction-Mux Core
//!
//! Domain types and pure logic for receiving platform interactions over an
//! HTTP webhook.
//!
//! This crate has no HTTP server dependency. It contains:
//! - the interaction envelope and the typed payload for every inner kind
//! - the classifier that turns a raw envelope into a route and a kind
//! - a segment-aware prefix tree used by the route table
//! - the response payloads a handler can send back
//! - the command schema used when registering commands with the platform
//!
//! ## Usage
//!
//! ```rust
//! use interaction_mux_core::{classify, InnerKind, InteractionType};
//!
//! let body = br#"{"type":3,"id":"1","application_id":"2","token":"t","version":1,
//!     "data":{"custom_id":"list/next/42","component_type":2}}"#;
//!
//! let classification = classify(body).unwrap();
//! assert_eq!(classification.interaction_type, InteractionType::MessageComponent);
//! assert_eq!(classification.kind, Some(InnerKind::Button));
//! assert_eq!(classification.route.as_str(), "list/next/42");
//! ```

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Declares a fieldless enum that travels over the wire as its integer code.
///
/// Unknown codes fail deserialization; `TryFrom<u8>` hands the unknown code
/// back so callers can report it.
macro_rules! integer_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $($(#[$vmeta:meta])* $variant:ident = $value:literal,)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[repr(u8)]
        $vis enum $name {
            $($(#[$vmeta])* $variant = $value,)+
        }

        impl $name {
            /// Integer code used on the wire
            pub const fn code(self) -> u8 {
                self as u8
            }
        }

        impl TryFrom<u8> for $name {
            type Error = u8;

            fn try_from(value: u8) -> Result<Self, Self::Error> {
                match value {
                    $($value => Ok(Self::$variant),)+
                    other => Err(other),
                }
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_u8(self.code())
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let value = <u8 as serde::Deserialize>::deserialize(deserializer)?;
                Self::try_from(value).map_err(|code| {
                    serde::de::Error::custom(format!(
                        "unknown {} code {}",
                        stringify!($name),
                        code
                    ))
                })
            }
        }
    };
}

pub mod classify;
pub mod command;
pub mod component;
pub mod interaction;
pub mod options;
pub mod response;
pub mod route;
pub mod token;

pub use classify::{classify, Classification};
pub use command::{ApplicationCommand, CommandOption, CommandType, CreateCommand, OptionType};
pub use component::{
    ButtonStyle, Component, ComponentType, Embed, EmbedField, Emoji, SelectOption, TextInputStyle,
};
pub use interaction::{
    AutocompleteData, ButtonData, InnerKind, Interaction, InteractionType, Member,
    MessageCommandData, ModalData, RawData, Resolved, Role, RouteNamespace, SelectData,
    SlashCommandData, TextInputData, User, UserCommandData,
};
pub use options::{OptionValue, Options};
pub use response::{
    AllowedMentions, Attachment, AttachmentBody, Choice, ChoiceValue, InteractionResponse, Message,
    MessageFlags, Modal,
};
pub use route::{Route, RouteTree};
pub use token::BotToken;

// ============================================================================
// Snowflake
// ============================================================================

/// A 64-bit platform identifier.
///
/// The platform sends snowflakes as decimal strings so that JavaScript clients
/// do not lose precision. Deserialization accepts both strings and numbers;
/// serialization always produces a string.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Snowflake(u64);

impl Snowflake {
    /// Create a snowflake from its numeric value
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get numeric value
    pub const fn as_u64(&self) -> u64 {
        self.0
    }

    /// True for the zero value, which the platform never assigns
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl From<u64> for Snowflake {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl fmt::Display for Snowflake {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Snowflake {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = s.parse::<u64>().map_err(|_| ParseError::InvalidFormat {
            expected: "decimal snowflake".to_string(),
            actual: s.to_string(),
        })?;
        Ok(Self(id))
    }
}

impl Serialize for Snowflake {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Snowflake {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Text(String),
            Number(u64),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Text(s) => s.parse().map_err(serde::de::Error::custom),
            Repr::Number(n) => Ok(Self(n)),
        }
    }
}

// ============================================================================
// Error Types
// ============================================================================

/// Error type for string parsing failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("Invalid format: expected {expected}, got '{actual}'")]
    InvalidFormat { expected: String, actual: String },
}

/// Errors produced while classifying a raw interaction envelope
#[derive(Debug, thiserror::Error)]
pub enum ClassifyError {
    #[error("Malformed interaction envelope: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Unsupported interaction type: {0}")]
    UnsupportedInteractionType(u8),

    #[error("Unsupported component type: {0}")]
    UnsupportedComponentType(u8),

    #[error("Interaction of type {interaction_type} is missing field '{field}'")]
    MissingField {
        interaction_type: InteractionType,
        field: &'static str,
    },
}

/// Errors produced by the typed option accessors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OptionError {
    #[error("Option '{name}' was not provided")]
    Missing { name: String },

    #[error("Option '{name}' is not a {expected}")]
    WrongType { name: String, expected: &'static str },

    #[error("Option '{name}' has no resolved {kind} entry")]
    NotResolved { name: String, kind: &'static str },
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
