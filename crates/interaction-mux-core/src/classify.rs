//! Interaction classification.
//!
//! [`classify`] reads only the discriminator fields of a raw envelope and
//! produces the route, the handler kind and the outer interaction type.
//! Option values are skipped without being decoded.

use crate::{
    command::OptionType,
    component::ComponentType,
    interaction::{InnerKind, InteractionType, RouteNamespace},
    route::Route,
    ClassifyError,
};
use serde::Deserialize;

/// Result of classifying an interaction envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub interaction_type: InteractionType,
    /// `None` for pings, which are answered without routing
    pub kind: Option<InnerKind>,
    pub route: Route,
}

impl Classification {
    pub fn namespace(&self) -> Option<RouteNamespace> {
        self.kind.map(InnerKind::namespace)
    }

    pub fn is_ping(&self) -> bool {
        self.interaction_type == InteractionType::Ping
    }
}

#[derive(Deserialize)]
struct Discriminators {
    #[serde(rename = "type")]
    interaction_type: u8,

    #[serde(default)]
    data: Option<DiscriminatorData>,
}

#[derive(Deserialize)]
struct DiscriminatorData {
    #[serde(rename = "type", default)]
    command_type: Option<u8>,

    #[serde(default)]
    name: Option<String>,

    #[serde(default)]
    custom_id: Option<String>,

    #[serde(default)]
    component_type: Option<u8>,

    #[serde(default)]
    options: Vec<PathOption>,
}

#[derive(Deserialize)]
struct PathOption {
    name: String,

    #[serde(rename = "type")]
    option_type: u8,

    #[serde(default)]
    focused: bool,

    #[serde(default)]
    options: Vec<PathOption>,
}

/// Subcommand group, subcommand and focused option on the invoked path.
#[derive(Default)]
struct CommandPath<'a> {
    group: Option<&'a str>,
    subcommand: Option<&'a str>,
    focused: Option<&'a str>,
}

impl<'a> CommandPath<'a> {
    fn walk(options: &'a [PathOption]) -> Self {
        let mut path = Self::default();
        path.visit(options, 1);
        path
    }

    fn visit(&mut self, options: &'a [PathOption], depth: usize) {
        if depth > 3 {
            return;
        }
        for option in options {
            match OptionType::try_from(option.option_type) {
                Ok(OptionType::SubCommandGroup) => {
                    self.group = Some(&option.name);
                    self.visit(&option.options, depth + 1);
                }
                Ok(OptionType::SubCommand) => {
                    self.subcommand = Some(&option.name);
                    self.visit(&option.options, depth + 1);
                }
                _ if option.focused => self.focused = Some(&option.name),
                _ => {}
            }
        }
    }
}

/// Classify a raw interaction body.
///
/// | Interaction | Route | Kind |
/// |---|---|---|
/// | ping | empty | none |
/// | application command | name / group / subcommand | slash, user or message command |
/// | message component | `custom_id` | button, select or text input |
/// | autocomplete | name / group / subcommand / focused | autocomplete |
/// | modal submit | `custom_id` | modal |
///
/// User and message command names may contain spaces; each word becomes a
/// route segment.
pub fn classify(raw: &[u8]) -> Result<Classification, ClassifyError> {
    let envelope: Discriminators = serde_json::from_slice(raw)?;
    let interaction_type = InteractionType::try_from(envelope.interaction_type)
        .map_err(ClassifyError::UnsupportedInteractionType)?;

    let missing = |field: &'static str| ClassifyError::MissingField {
        interaction_type,
        field,
    };
    let data = envelope.data;

    let (kind, route) = match interaction_type {
        InteractionType::Ping => {
            return Ok(Classification {
                interaction_type,
                kind: None,
                route: Route::root(),
            });
        }
        InteractionType::ApplicationCommand => {
            let data = data.ok_or_else(|| missing("data"))?;
            let name = data.name.as_deref().ok_or_else(|| missing("name"))?;
            let kind = match data.command_type {
                Some(2) => InnerKind::UserCommand,
                Some(3) => InnerKind::MessageCommand,
                _ => InnerKind::SlashCommand,
            };
            let path = CommandPath::walk(&data.options);

            let name_segments: Vec<&str> = match kind {
                InnerKind::SlashCommand => vec![name],
                _ => name.split_whitespace().collect(),
            };
            let route = Route::from_segments(
                name_segments
                    .into_iter()
                    .chain(path.group)
                    .chain(path.subcommand),
            );
            (kind, route)
        }
        InteractionType::Autocomplete => {
            let data = data.ok_or_else(|| missing("data"))?;
            let name = data.name.as_deref().ok_or_else(|| missing("name"))?;
            let path = CommandPath::walk(&data.options);
            let route = Route::from_segments(
                std::iter::once(name)
                    .chain(path.group)
                    .chain(path.subcommand)
                    .chain(path.focused),
            );
            (InnerKind::Autocomplete, route)
        }
        InteractionType::MessageComponent => {
            let data = data.ok_or_else(|| missing("data"))?;
            let custom_id = data.custom_id.as_deref().ok_or_else(|| missing("custom_id"))?;
            let code = data.component_type.ok_or_else(|| missing("component_type"))?;
            let component_type = ComponentType::try_from(code)
                .map_err(ClassifyError::UnsupportedComponentType)?;
            let kind = match component_type {
                ComponentType::Button => InnerKind::Button,
                ComponentType::TextInput => InnerKind::TextInput,
                t if t.is_select() => InnerKind::Select,
                _ => return Err(ClassifyError::UnsupportedComponentType(code)),
            };
            (kind, Route::new(custom_id))
        }
        InteractionType::ModalSubmit => {
            let data = data.ok_or_else(|| missing("data"))?;
            let custom_id = data.custom_id.as_deref().ok_or_else(|| missing("custom_id"))?;
            (InnerKind::Modal, Route::new(custom_id))
        }
    };

    Ok(Classification {
        interaction_type,
        kind: Some(kind),
        route,
    })
}

#[cfg(test)]
#[path = "classify_tests.rs"]
mod tests;
