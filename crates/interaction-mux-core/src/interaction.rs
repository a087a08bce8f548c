//! Interaction envelope and the typed payload for each inner kind.
//!
//! The envelope is generic over its `data` payload. The dispatcher decodes the
//! raw body a second time into `Interaction<T>` where `T` is the payload type
//! that matches the handler kind found by the classifier.

use crate::{
    component::{Component, ComponentType},
    options::{OptionValue, Options, RawOption},
    Snowflake,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

// ============================================================================
// Discriminators
// ============================================================================

integer_enum! {
    /// Outer interaction type
    pub enum InteractionType {
        Ping = 1,
        ApplicationCommand = 2,
        MessageComponent = 3,
        Autocomplete = 4,
        ModalSubmit = 5,
    }
}

impl fmt::Display for InteractionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Ping => "ping",
            Self::ApplicationCommand => "application_command",
            Self::MessageComponent => "message_component",
            Self::Autocomplete => "autocomplete",
            Self::ModalSubmit => "modal_submit",
        };
        f.write_str(name)
    }
}

/// Handler kind an interaction is dispatched to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum InnerKind {
    Button,
    Select,
    TextInput,
    Modal,
    Autocomplete,
    SlashCommand,
    UserCommand,
    MessageCommand,
}

impl InnerKind {
    pub const ALL: [InnerKind; 8] = [
        Self::Button,
        Self::Select,
        Self::TextInput,
        Self::Modal,
        Self::Autocomplete,
        Self::SlashCommand,
        Self::UserCommand,
        Self::MessageCommand,
    ];

    /// Route tree this kind is registered in
    pub const fn namespace(self) -> RouteNamespace {
        match self {
            Self::Button | Self::Select | Self::TextInput | Self::Modal => {
                RouteNamespace::Component
            }
            Self::Autocomplete => RouteNamespace::Autocomplete,
            Self::SlashCommand | Self::UserCommand | Self::MessageCommand => {
                RouteNamespace::Command
            }
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Button => "button",
            Self::Select => "select",
            Self::TextInput => "text_input",
            Self::Modal => "modal",
            Self::Autocomplete => "autocomplete",
            Self::SlashCommand => "slash_command",
            Self::UserCommand => "user_command",
            Self::MessageCommand => "message_command",
        }
    }
}

impl fmt::Display for InnerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Top-level route trees. Routes in different namespaces never shadow each
/// other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RouteNamespace {
    Command,
    Component,
    Autocomplete,
}

impl RouteNamespace {
    pub const ALL: [RouteNamespace; 3] = [Self::Command, Self::Component, Self::Autocomplete];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Command => "command",
            Self::Component => "component",
            Self::Autocomplete => "autocomplete",
        }
    }
}

impl fmt::Display for RouteNamespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Envelope
// ============================================================================

/// Untyped payload used before a handler kind is known.
pub type RawData = serde_json::Value;

/// An interaction as delivered by the platform.
#[derive(Debug, Clone, Deserialize)]
pub struct Interaction<T> {
    pub id: Snowflake,
    pub application_id: Snowflake,

    #[serde(rename = "type")]
    pub interaction_type: InteractionType,

    /// Absent on pings
    #[serde(default)]
    pub data: T,

    #[serde(default)]
    pub guild_id: Option<Snowflake>,

    #[serde(default)]
    pub channel_id: Option<Snowflake>,

    /// Set when invoked inside a guild
    #[serde(default)]
    pub member: Option<Member>,

    /// Set when invoked in a direct message
    #[serde(default)]
    pub user: Option<User>,

    /// Continuation token for follow-up messages, valid for 15 minutes
    pub token: String,

    #[serde(default)]
    pub version: u8,

    /// Message a component is attached to
    #[serde(default)]
    pub message: Option<serde_json::Value>,

    #[serde(default)]
    pub locale: Option<String>,

    #[serde(default)]
    pub guild_locale: Option<String>,
}

impl<T> Interaction<T> {
    /// The user who triggered the interaction, in a guild or a direct message
    pub fn invoker(&self) -> Option<&User> {
        self.member
            .as_ref()
            .and_then(|m| m.user.as_ref())
            .or(self.user.as_ref())
    }

    pub fn in_guild(&self) -> bool {
        self.guild_id.is_some()
    }
}

// ============================================================================
// Component payloads
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ButtonData {
    pub custom_id: String,
    pub component_type: Option<ComponentType>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SelectData {
    pub custom_id: String,
    pub component_type: Option<ComponentType>,

    /// Selected option values, or snowflakes for user, role and channel selects
    #[serde(default)]
    pub values: Vec<String>,

    #[serde(default)]
    pub resolved: Resolved,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TextInputData {
    pub custom_id: String,
    pub component_type: Option<ComponentType>,

    #[serde(default)]
    pub value: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ModalData {
    pub custom_id: String,

    #[serde(default)]
    pub components: Vec<Component>,
}

impl ModalData {
    /// Submitted value of the text input with `custom_id`
    pub fn value(&self, custom_id: &str) -> Option<&str> {
        self.components
            .iter()
            .find_map(|c| c.find(custom_id))
            .and_then(|c| c.value.as_deref())
    }
}

// ============================================================================
// Command payloads
// ============================================================================

/// Wire shape shared by every application command payload.
#[derive(Debug, Default, Deserialize)]
struct RawCommandData {
    #[serde(default)]
    id: Snowflake,
    #[serde(default)]
    name: String,
    #[serde(default)]
    guild_id: Option<Snowflake>,
    #[serde(default)]
    target_id: Option<Snowflake>,
    #[serde(default)]
    options: Vec<RawOption>,
    #[serde(default)]
    resolved: Resolved,
}

/// Deserialize a command payload through [`RawCommandData`].
macro_rules! decode_via_raw_command {
    ($name:ident, |$raw:ident| $body:expr) => {
        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let $raw = RawCommandData::deserialize(deserializer)?;
                Ok($body)
            }
        }
    };
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SlashCommandData {
    pub id: Snowflake,
    pub name: String,
    pub guild_id: Option<Snowflake>,
    pub options: Options,
}

decode_via_raw_command!(SlashCommandData, |raw| SlashCommandData {
    id: raw.id,
    name: raw.name,
    guild_id: raw.guild_id,
    options: Options::from_raw(raw.options, raw.resolved),
});

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AutocompleteData {
    pub id: Snowflake,
    pub name: String,
    pub guild_id: Option<Snowflake>,
    pub options: Options,
}

impl AutocompleteData {
    /// Name and current partial input of the focused option
    pub fn focused(&self) -> Option<(&str, &OptionValue)> {
        self.options.focused()
    }
}

decode_via_raw_command!(AutocompleteData, |raw| AutocompleteData {
    id: raw.id,
    name: raw.name,
    guild_id: raw.guild_id,
    options: Options::from_raw(raw.options, raw.resolved),
});

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserCommandData {
    pub id: Snowflake,
    pub name: String,
    pub target_id: Snowflake,
    pub resolved: Resolved,
}

impl UserCommandData {
    pub fn target_user(&self) -> Option<&User> {
        self.resolved.users.get(&self.target_id)
    }

    /// Guild member for the target, with its user filled in
    pub fn target_member(&self) -> Option<Member> {
        self.resolved.member_with_user(self.target_id)
    }
}

decode_via_raw_command!(UserCommandData, |raw| UserCommandData {
    id: raw.id,
    name: raw.name,
    target_id: raw.target_id.unwrap_or_default(),
    resolved: raw.resolved,
});

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MessageCommandData {
    pub id: Snowflake,
    pub name: String,
    pub target_id: Snowflake,
    pub resolved: Resolved,
}

impl MessageCommandData {
    pub fn target_message(&self) -> Option<&serde_json::Value> {
        self.resolved.messages.get(&self.target_id)
    }
}

decode_via_raw_command!(MessageCommandData, |raw| MessageCommandData {
    id: raw.id,
    name: raw.name,
    target_id: raw.target_id.unwrap_or_default(),
    resolved: raw.resolved,
});

// ============================================================================
// Users, members and resolved data
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Snowflake,
    pub username: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discriminator: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub global_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub bot: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    /// Absent on members inside resolved data
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nick: Option<String>,

    #[serde(default)]
    pub roles: Vec<Snowflake>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub joined_at: Option<String>,

    /// Permission bit set of the member in the channel, as a decimal string
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permissions: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: Snowflake,
    pub name: String,

    #[serde(default)]
    pub color: u32,

    #[serde(default)]
    pub position: i32,

    #[serde(default)]
    pub permissions: String,
}

/// Full objects for ids referenced by options, selects and context-menu
/// targets.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Resolved {
    #[serde(default)]
    pub users: HashMap<Snowflake, User>,

    #[serde(default)]
    pub members: HashMap<Snowflake, Member>,

    #[serde(default)]
    pub roles: HashMap<Snowflake, Role>,

    #[serde(default)]
    pub channels: HashMap<Snowflake, serde_json::Value>,

    #[serde(default)]
    pub messages: HashMap<Snowflake, serde_json::Value>,

    #[serde(default)]
    pub attachments: HashMap<Snowflake, serde_json::Value>,
}

impl Resolved {
    /// Resolved member for `id` with the matching resolved user attached
    pub fn member_with_user(&self, id: Snowflake) -> Option<Member> {
        let mut member = self.members.get(&id)?.clone();
        if member.user.is_none() {
            member.user = self.users.get(&id).cloned();
        }
        Some(member)
    }
}

#[cfg(test)]
#[path = "interaction_tests.rs"]
mod tests;
