//! Interaction response payloads.
//!
//! An [`InteractionResponse`] serializes to the callback object the platform
//! expects, `{"type": N, "data": {...}}`. Attachment bodies are not part of the
//! JSON; the HTTP layer streams them as multipart parts after `payload_json`.

use crate::{component::Component, Embed, Snowflake};
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::ops::BitOr;
use std::pin::Pin;
use tokio::io::AsyncRead;

// ============================================================================
// Callback
// ============================================================================

/// Every reply a handler can give to an interaction.
#[derive(Debug)]
pub enum InteractionResponse {
    /// Answer to a ping
    Pong,
    /// Reply with a message
    Message(Message),
    /// Acknowledge now, send the message later as a follow-up
    DeferredMessage { flags: MessageFlags },
    /// Acknowledge a component interaction, edit the message later
    DeferredUpdate,
    /// Edit the message the component is attached to
    Update(Message),
    /// Suggestions for the focused option
    Autocomplete(Vec<Choice>),
    /// Open a modal dialog
    Modal(Modal),
}

impl InteractionResponse {
    /// Callback type code sent in the `type` field
    pub fn callback_type(&self) -> u8 {
        match self {
            Self::Pong => 1,
            Self::Message(_) => 4,
            Self::DeferredMessage { .. } => 5,
            Self::DeferredUpdate => 6,
            Self::Update(_) => 7,
            Self::Autocomplete(_) => 8,
            Self::Modal(_) => 9,
        }
    }

    /// Message carried by this response, if any
    pub fn message(&self) -> Option<&Message> {
        match self {
            Self::Message(message) | Self::Update(message) => Some(message),
            _ => None,
        }
    }

    pub fn message_mut(&mut self) -> Option<&mut Message> {
        match self {
            Self::Message(message) | Self::Update(message) => Some(message),
            _ => None,
        }
    }

    /// True when the response must be sent as multipart form data
    pub fn has_attachments(&self) -> bool {
        self.message()
            .map(|m| !m.attachments.is_empty())
            .unwrap_or(false)
    }
}

impl Serialize for InteractionResponse {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct Choices<'a> {
            choices: &'a [Choice],
        }

        #[derive(Serialize)]
        struct Flags {
            flags: MessageFlags,
        }

        let has_data = match self {
            Self::Pong | Self::DeferredUpdate => false,
            Self::DeferredMessage { flags } => !flags.is_empty(),
            _ => true,
        };

        let mut state = serializer.serialize_struct("InteractionResponse", 1 + has_data as usize)?;
        state.serialize_field("type", &self.callback_type())?;
        match self {
            Self::Message(message) | Self::Update(message) => {
                state.serialize_field("data", message)?;
            }
            Self::DeferredMessage { flags } if !flags.is_empty() => {
                state.serialize_field("data", &Flags { flags: *flags })?;
            }
            Self::Autocomplete(choices) => {
                state.serialize_field("data", &Choices { choices })?;
            }
            Self::Modal(modal) => {
                state.serialize_field("data", modal)?;
            }
            _ => {}
        }
        state.end()
    }
}

// ============================================================================
// Message
// ============================================================================

/// Message content sent as a reply or an update.
#[derive(Debug, Default, Serialize)]
pub struct Message {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub tts: bool,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub embeds: Vec<Embed>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_mentions: Option<AllowedMentions>,

    #[serde(skip_serializing_if = "MessageFlags::is_empty")]
    pub flags: MessageFlags,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub components: Vec<Component>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
}

impl Message {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Self::default()
        }
    }

    /// Only the invoking user sees the message
    pub fn ephemeral(mut self) -> Self {
        self.flags = self.flags | MessageFlags::EPHEMERAL;
        self
    }

    pub fn embed(mut self, embed: Embed) -> Self {
        self.embeds.push(embed);
        self
    }

    pub fn component(mut self, component: Component) -> Self {
        self.components.push(component);
        self
    }

    pub fn attachment(mut self, attachment: Attachment) -> Self {
        self.attachments.push(attachment);
        self
    }

    pub fn allowed_mentions(mut self, allowed_mentions: AllowedMentions) -> Self {
        self.allowed_mentions = Some(allowed_mentions);
        self
    }

    /// Give every attachment without an id its position as id
    pub fn assign_attachment_ids(&mut self) {
        for (index, attachment) in self.attachments.iter_mut().enumerate() {
            if attachment.id.is_none() {
                attachment.id = Some(Snowflake::new(index as u64));
            }
        }
    }
}

impl From<&str> for Message {
    fn from(content: &str) -> Self {
        Self::new(content)
    }
}

impl From<String> for Message {
    fn from(content: String) -> Self {
        Self::new(content)
    }
}

/// Message flag bit set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageFlags(u64);

impl MessageFlags {
    pub const SUPPRESS_EMBEDS: Self = Self(1 << 2);
    pub const EPHEMERAL: Self = Self(1 << 6);

    pub const fn empty() -> Self {
        Self(0)
    }

    pub const fn bits(&self) -> u64 {
        self.0
    }

    pub const fn contains(&self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

impl BitOr for MessageFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// Which mentions in the content are allowed to ping.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllowedMentions {
    pub parse: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub roles: Vec<Snowflake>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub users: Vec<Snowflake>,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub replied_user: bool,
}

impl AllowedMentions {
    /// Suppress every ping
    pub fn none() -> Self {
        Self::default()
    }
}

// ============================================================================
// Attachments
// ============================================================================

/// Byte source of an attachment.
pub type AttachmentBody = Pin<Box<dyn AsyncRead + Send + 'static>>;

/// A file uploaded together with the response.
///
/// Only the metadata is serialized into `payload_json`; the body is streamed
/// as its own multipart part.
pub struct Attachment {
    pub id: Option<Snowflake>,
    pub filename: String,
    pub description: Option<String>,
    pub body: AttachmentBody,
}

impl Attachment {
    pub fn new<R>(filename: impl Into<String>, body: R) -> Self
    where
        R: AsyncRead + Send + 'static,
    {
        Self {
            id: None,
            filename: filename.into(),
            description: None,
            body: Box::pin(body),
        }
    }

    /// Attachment backed by an in-memory buffer
    pub fn from_bytes(filename: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self::new(filename, std::io::Cursor::new(bytes.into()))
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

impl fmt::Debug for Attachment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Attachment")
            .field("id", &self.id)
            .field("filename", &self.filename)
            .field("description", &self.description)
            .field("body", &"<stream>")
            .finish()
    }
}

impl Serialize for Attachment {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let fields = 1 + self.id.is_some() as usize + self.description.is_some() as usize;
        let mut state = serializer.serialize_struct("Attachment", fields)?;
        if let Some(id) = &self.id {
            state.serialize_field("id", id)?;
        }
        state.serialize_field("filename", &self.filename)?;
        if let Some(description) = &self.description {
            state.serialize_field("description", description)?;
        }
        state.end()
    }
}

// ============================================================================
// Autocomplete and modals
// ============================================================================

/// A named value offered to the user, either as an autocomplete suggestion or
/// as a fixed option choice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Choice {
    pub name: String,
    pub value: ChoiceValue,
}

impl Choice {
    pub fn string(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: ChoiceValue::String(value.into()),
        }
    }

    pub fn integer(name: impl Into<String>, value: i64) -> Self {
        Self {
            name: name.into(),
            value: ChoiceValue::Integer(value),
        }
    }

    pub fn number(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            value: ChoiceValue::Number(value),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChoiceValue {
    String(String),
    Integer(i64),
    Number(f64),
}

/// A modal dialog made of text inputs.
///
/// The inputs are listed directly; serialization wraps them in the single
/// action row the platform requires.
#[derive(Debug, Clone, PartialEq)]
pub struct Modal {
    pub custom_id: String,
    pub title: String,
    pub components: Vec<Component>,
}

impl Modal {
    pub fn new(custom_id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            custom_id: custom_id.into(),
            title: title.into(),
            components: Vec::new(),
        }
    }

    pub fn input(mut self, component: Component) -> Self {
        self.components.push(component);
        self
    }
}

impl Serialize for Modal {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let row = [Component::action_row(self.components.clone())];

        let mut state = serializer.serialize_struct("Modal", 3)?;
        state.serialize_field("custom_id", &self.custom_id)?;
        state.serialize_field("title", &self.title)?;
        state.serialize_field("components", &row)?;
        state.end()
    }
}

#[cfg(test)]
#[path = "response_tests.rs"]
mod tests;
