//! Message components and embeds.
//!
//! Components are kept as one flat structure because the platform uses a
//! single object shape for every component type, with fields that only apply
//! to some of them. Embeds carry the subset of fields handlers commonly set.

use crate::Snowflake;
use serde::{Deserialize, Serialize};

integer_enum! {
    /// Component type codes
    pub enum ComponentType {
        ActionRow = 1,
        Button = 2,
        StringSelect = 3,
        TextInput = 4,
        UserSelect = 5,
        RoleSelect = 6,
        MentionableSelect = 7,
        ChannelSelect = 8,
    }
}

impl ComponentType {
    /// True for every select menu flavour
    pub const fn is_select(self) -> bool {
        matches!(
            self,
            Self::StringSelect
                | Self::UserSelect
                | Self::RoleSelect
                | Self::MentionableSelect
                | Self::ChannelSelect
        )
    }
}

integer_enum! {
    /// Visual style of a button
    pub enum ButtonStyle {
        Primary = 1,
        Secondary = 2,
        Success = 3,
        Danger = 4,
        Link = 5,
    }
}

integer_enum! {
    /// Text input style inside a modal
    pub enum TextInputStyle {
        Short = 1,
        Paragraph = 2,
    }
}

/// A message or modal component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    #[serde(rename = "type")]
    pub component_type: ComponentType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_id: Option<String>,

    /// Button or text input style code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<u8>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emoji: Option<Emoji>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub disabled: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_values: Option<u8>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_values: Option<u8>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u16>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u16>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,

    /// Current value of a text input; set by the platform on modal submit
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<SelectOption>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub components: Vec<Component>,
}

impl Component {
    fn empty(component_type: ComponentType) -> Self {
        Self {
            component_type,
            custom_id: None,
            style: None,
            label: None,
            emoji: None,
            url: None,
            disabled: false,
            placeholder: None,
            min_values: None,
            max_values: None,
            min_length: None,
            max_length: None,
            required: None,
            value: None,
            options: Vec::new(),
            components: Vec::new(),
        }
    }

    /// Action row holding the given children
    pub fn action_row(components: Vec<Component>) -> Self {
        Self {
            components,
            ..Self::empty(ComponentType::ActionRow)
        }
    }

    /// Interactive button whose clicks are routed by `custom_id`
    pub fn button(style: ButtonStyle, label: impl Into<String>, custom_id: impl Into<String>) -> Self {
        Self {
            style: Some(style.code()),
            label: Some(label.into()),
            custom_id: Some(custom_id.into()),
            ..Self::empty(ComponentType::Button)
        }
    }

    /// Link button; never produces an interaction
    pub fn link_button(label: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            style: Some(ButtonStyle::Link.code()),
            label: Some(label.into()),
            url: Some(url.into()),
            ..Self::empty(ComponentType::Button)
        }
    }

    /// String select menu
    pub fn string_select(custom_id: impl Into<String>, options: Vec<SelectOption>) -> Self {
        Self {
            custom_id: Some(custom_id.into()),
            options,
            ..Self::empty(ComponentType::StringSelect)
        }
    }

    /// Text input for use inside a modal
    pub fn text_input(
        style: TextInputStyle,
        label: impl Into<String>,
        custom_id: impl Into<String>,
    ) -> Self {
        Self {
            style: Some(style.code()),
            label: Some(label.into()),
            custom_id: Some(custom_id.into()),
            ..Self::empty(ComponentType::TextInput)
        }
    }

    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }

    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = Some(required);
        self
    }

    /// Depth-first search for a component by `custom_id`
    pub fn find(&self, custom_id: &str) -> Option<&Component> {
        if self.custom_id.as_deref() == Some(custom_id) {
            return Some(self);
        }
        self.components.iter().find_map(|c| c.find(custom_id))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub label: String,
    pub value: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emoji: Option<Emoji>,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub default: bool,
}

impl SelectOption {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            description: None,
            emoji: None,
            default: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Emoji {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Snowflake>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub animated: bool,
}

/// Rich embed attached to a message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Embed {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<u32>,

    /// RFC3339 timestamp shown in the footer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<EmbedField>,
}

impl Embed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn color(mut self, color: u32) -> Self {
        self.color = Some(color);
        self
    }

    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>, inline: bool) -> Self {
        self.fields.push(EmbedField {
            name: name.into(),
            value: value.into(),
            inline,
        });
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub inline: bool,
}

#[cfg(test)]
#[path = "component_tests.rs"]
mod tests;
