//! Application command schema.
//!
//! [`CreateCommand`] is what gets sent to the platform when registering a
//! command; [`ApplicationCommand`] is what the platform returns. Validation of
//! names and descriptions is left to the platform.

use crate::{response::Choice, Snowflake};
use serde::{Deserialize, Serialize};

integer_enum! {
    /// Application command flavour
    pub enum CommandType {
        ChatInput = 1,
        User = 2,
        Message = 3,
    }
}

integer_enum! {
    /// Type code of a command option
    pub enum OptionType {
        SubCommand = 1,
        SubCommandGroup = 2,
        String = 3,
        Integer = 4,
        Boolean = 5,
        User = 6,
        Channel = 7,
        Role = 8,
        Mentionable = 9,
        Number = 10,
        Attachment = 11,
    }
}

// ============================================================================
// Registration
// ============================================================================

/// A command definition ready for registration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateCommand {
    pub name: String,

    #[serde(rename = "type")]
    pub command_type: CommandType,

    /// Required for chat-input commands; must be empty for user and message commands
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<CommandOption>,
}

impl CreateCommand {
    /// Chat-input (slash) command
    pub fn slash(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            command_type: CommandType::ChatInput,
            description: description.into(),
            options: Vec::new(),
        }
    }

    /// Context-menu command on a user
    pub fn user(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            command_type: CommandType::User,
            description: String::new(),
            options: Vec::new(),
        }
    }

    /// Context-menu command on a message
    pub fn message(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            command_type: CommandType::Message,
            description: String::new(),
            options: Vec::new(),
        }
    }

    pub fn option(mut self, option: CommandOption) -> Self {
        self.options.push(option);
        self
    }
}

/// One option, subcommand or subcommand group of a command definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandOption {
    pub name: String,

    #[serde(rename = "type")]
    pub option_type: OptionType,

    #[serde(default)]
    pub description: String,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub required: bool,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub autocomplete: bool,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<Choice>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub channel_types: Vec<u8>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_value: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_value: Option<f64>,

    /// Nested options of a subcommand or subcommand group
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<CommandOption>,
}

impl CommandOption {
    pub fn new(option_type: OptionType, name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            option_type,
            description: description.into(),
            required: false,
            autocomplete: false,
            choices: Vec::new(),
            channel_types: Vec::new(),
            min_value: None,
            max_value: None,
            options: Vec::new(),
        }
    }

    pub fn subcommand(
        name: impl Into<String>,
        description: impl Into<String>,
        options: Vec<CommandOption>,
    ) -> Self {
        Self {
            options,
            ..Self::new(OptionType::SubCommand, name, description)
        }
    }

    pub fn subcommand_group(
        name: impl Into<String>,
        description: impl Into<String>,
        subcommands: Vec<CommandOption>,
    ) -> Self {
        Self {
            options: subcommands,
            ..Self::new(OptionType::SubCommandGroup, name, description)
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn autocomplete(mut self) -> Self {
        self.autocomplete = true;
        self
    }

    pub fn choice(mut self, choice: Choice) -> Self {
        self.choices.push(choice);
        self
    }

    pub fn range(mut self, min: f64, max: f64) -> Self {
        self.min_value = Some(min);
        self.max_value = Some(max);
        self
    }
}

// ============================================================================
// Registered commands
// ============================================================================

/// A command as returned by the platform after registration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ApplicationCommand {
    pub id: Snowflake,
    pub application_id: Snowflake,

    #[serde(rename = "type", default = "default_command_type")]
    pub command_type: CommandType,

    #[serde(default)]
    pub guild_id: Option<Snowflake>,

    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub options: Vec<CommandOption>,

    #[serde(default)]
    pub version: Option<Snowflake>,
}

fn default_command_type() -> CommandType {
    CommandType::ChatInput
}

#[cfg(test)]
#[path = "command_tests.rs"]
mod tests;
