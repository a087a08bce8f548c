//! Flattened command options.
//!
//! The platform nests option values under a subcommand group and a
//! subcommand. [`Options`] flattens that tree into a name → value map and
//! remembers which group, subcommand and focused option were on the path.

use crate::{
    command::OptionType,
    interaction::{Member, Resolved, Role, User},
    OptionError, Snowflake,
};
use serde::Deserialize;
use std::collections::HashMap;

/// Group, subcommand and plain options; anything deeper is ignored.
const MAX_OPTION_DEPTH: usize = 3;

/// One option as sent by the platform.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RawOption {
    pub(crate) name: String,

    #[serde(rename = "type")]
    pub(crate) option_type: OptionType,

    #[serde(default)]
    pub(crate) value: Option<serde_json::Value>,

    #[serde(default)]
    pub(crate) focused: bool,

    #[serde(default)]
    pub(crate) options: Vec<RawOption>,
}

/// A single option value.
#[derive(Debug, Clone, PartialEq)]
pub enum OptionValue {
    String(String),
    Integer(i64),
    Number(f64),
    Boolean(bool),
    /// User, channel, role, mentionable or attachment id
    Snowflake(Snowflake),
}

impl OptionValue {
    /// Convert a wire value according to its declared option type.
    ///
    /// Autocomplete sends the partial input of the focused option as typed by
    /// the user, so values that do not fit their type fall back to a string.
    fn from_wire(option_type: OptionType, value: serde_json::Value) -> Self {
        use serde_json::Value;

        match (option_type, value) {
            (OptionType::Integer, Value::Number(n)) if n.is_i64() => {
                Self::Integer(n.as_i64().unwrap_or_default())
            }
            (OptionType::Number, Value::Number(n)) => Self::Number(n.as_f64().unwrap_or_default()),
            (OptionType::Boolean, Value::Bool(b)) => Self::Boolean(b),
            (
                OptionType::User
                | OptionType::Channel
                | OptionType::Role
                | OptionType::Mentionable
                | OptionType::Attachment,
                Value::String(s),
            ) => match s.parse::<Snowflake>() {
                Ok(id) => Self::Snowflake(id),
                Err(_) => Self::String(s),
            },
            (_, Value::String(s)) => Self::String(s),
            (_, Value::Number(n)) => match n.as_i64() {
                Some(i) => Self::Integer(i),
                None => Self::Number(n.as_f64().unwrap_or_default()),
            },
            (_, Value::Bool(b)) => Self::Boolean(b),
            (_, other) => Self::String(other.to_string()),
        }
    }
}

/// Flattened options of an application command or autocomplete interaction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Options {
    values: HashMap<String, OptionValue>,
    group: Option<String>,
    subcommand: Option<String>,
    focused: Option<String>,
    resolved: Resolved,
}

impl Options {
    pub(crate) fn from_raw(raw: Vec<RawOption>, resolved: Resolved) -> Self {
        let mut options = Self {
            resolved,
            ..Self::default()
        };
        options.flatten(raw, 1);
        options
    }

    fn flatten(&mut self, raw: Vec<RawOption>, depth: usize) {
        if depth > MAX_OPTION_DEPTH {
            return;
        }

        for option in raw {
            match option.option_type {
                OptionType::SubCommandGroup => {
                    self.group = Some(option.name);
                    self.flatten(option.options, depth + 1);
                }
                OptionType::SubCommand => {
                    self.subcommand = Some(option.name);
                    self.flatten(option.options, depth + 1);
                }
                option_type => {
                    if option.focused {
                        self.focused = Some(option.name.clone());
                    }
                    if let Some(value) = option.value {
                        self.values
                            .insert(option.name, OptionValue::from_wire(option_type, value));
                    }
                }
            }
        }
    }

    /// Subcommand group on the invoked path
    pub fn group(&self) -> Option<&str> {
        self.group.as_deref()
    }

    /// Subcommand on the invoked path
    pub fn subcommand(&self) -> Option<&str> {
        self.subcommand.as_deref()
    }

    /// Focused option name and its partial value
    pub fn focused(&self) -> Option<(&str, &OptionValue)> {
        let name = self.focused.as_deref()?;
        self.values.get(name).map(|v| (name, v))
    }

    pub fn get(&self, name: &str) -> Option<&OptionValue> {
        self.values.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &OptionValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn resolved(&self) -> &Resolved {
        &self.resolved
    }

    // ------------------------------------------------------------------------
    // Typed accessors
    // ------------------------------------------------------------------------

    fn require(&self, name: &str) -> Result<&OptionValue, OptionError> {
        self.values.get(name).ok_or_else(|| OptionError::Missing {
            name: name.to_string(),
        })
    }

    fn wrong_type(name: &str, expected: &'static str) -> OptionError {
        OptionError::WrongType {
            name: name.to_string(),
            expected,
        }
    }

    pub fn string(&self, name: &str) -> Result<&str, OptionError> {
        match self.require(name)? {
            OptionValue::String(s) => Ok(s),
            _ => Err(Self::wrong_type(name, "string")),
        }
    }

    pub fn int(&self, name: &str) -> Result<i64, OptionError> {
        match self.require(name)? {
            OptionValue::Integer(i) => Ok(*i),
            _ => Err(Self::wrong_type(name, "integer")),
        }
    }

    /// Numeric option; integer values are widened
    pub fn float(&self, name: &str) -> Result<f64, OptionError> {
        match self.require(name)? {
            OptionValue::Number(n) => Ok(*n),
            OptionValue::Integer(i) => Ok(*i as f64),
            _ => Err(Self::wrong_type(name, "number")),
        }
    }

    pub fn bool(&self, name: &str) -> Result<bool, OptionError> {
        match self.require(name)? {
            OptionValue::Boolean(b) => Ok(*b),
            _ => Err(Self::wrong_type(name, "boolean")),
        }
    }

    pub fn snowflake(&self, name: &str) -> Result<Snowflake, OptionError> {
        match self.require(name)? {
            OptionValue::Snowflake(id) => Ok(*id),
            _ => Err(Self::wrong_type(name, "snowflake")),
        }
    }

    // ------------------------------------------------------------------------
    // Resolved lookups
    // ------------------------------------------------------------------------

    fn not_resolved(name: &str, kind: &'static str) -> OptionError {
        OptionError::NotResolved {
            name: name.to_string(),
            kind,
        }
    }

    pub fn user(&self, name: &str) -> Result<&User, OptionError> {
        let id = self.snowflake(name)?;
        self.resolved
            .users
            .get(&id)
            .ok_or_else(|| Self::not_resolved(name, "user"))
    }

    /// Resolved guild member with its user attached
    pub fn member(&self, name: &str) -> Result<Member, OptionError> {
        let id = self.snowflake(name)?;
        self.resolved
            .member_with_user(id)
            .ok_or_else(|| Self::not_resolved(name, "member"))
    }

    pub fn role(&self, name: &str) -> Result<&Role, OptionError> {
        let id = self.snowflake(name)?;
        self.resolved
            .roles
            .get(&id)
            .ok_or_else(|| Self::not_resolved(name, "role"))
    }
}

#[cfg(test)]
#[path = "options_tests.rs"]
mod tests;
