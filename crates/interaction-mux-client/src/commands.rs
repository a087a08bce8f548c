//! Application command registration.

use crate::client::{json, InteractionClient};
use crate::error::ClientError;
use interaction_mux_core::{ApplicationCommand, CreateCommand, Snowflake};
use reqwest::Method;
use tracing::info;

/// Where a command is registered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandScope {
    /// Available in every guild and in direct messages
    Global,

    /// Available only in one guild; updates take effect immediately
    Guild(Snowflake),
}

impl CommandScope {
    fn path(&self, application_id: Snowflake) -> String {
        match self {
            Self::Global => format!("applications/{}/commands", application_id),
            Self::Guild(guild_id) => {
                format!("applications/{}/guilds/{}/commands", application_id, guild_id)
            }
        }
    }
}

impl InteractionClient {
    /// List the commands registered in `scope`.
    pub async fn list_commands(
        &self,
        scope: CommandScope,
    ) -> Result<Vec<ApplicationCommand>, ClientError> {
        let path = scope.path(self.application_id());
        let response = self.send(Method::GET, &path).await?;
        json(response).await
    }

    /// Create a command, or update the existing command with the same name.
    pub async fn create_command(
        &self,
        scope: CommandScope,
        command: &CreateCommand,
    ) -> Result<ApplicationCommand, ClientError> {
        let path = scope.path(self.application_id());
        let response = self.send_json(Method::POST, &path, command).await?;
        let created: ApplicationCommand = json(response).await?;

        info!(
            command = %created.name,
            command_id = %created.id,
            scope = ?scope,
            "Registered command"
        );
        Ok(created)
    }

    /// Replace every command in `scope` with `commands`.
    ///
    /// Commands missing from `commands` are deleted by the platform.
    pub async fn bulk_overwrite_commands(
        &self,
        scope: CommandScope,
        commands: &[CreateCommand],
    ) -> Result<Vec<ApplicationCommand>, ClientError> {
        let path = scope.path(self.application_id());
        let response = self.send_json(Method::PUT, &path, commands).await?;
        let registered: Vec<ApplicationCommand> = json(response).await?;

        info!(
            count = registered.len(),
            scope = ?scope,
            "Overwrote command set"
        );
        Ok(registered)
    }

    /// Delete one command.
    pub async fn delete_command(
        &self,
        scope: CommandScope,
        command_id: Snowflake,
    ) -> Result<(), ClientError> {
        let path = format!("{}/{}", scope.path(self.application_id()), command_id);
        self.send(Method::DELETE, &path).await?;

        info!(command_id = %command_id, scope = ?scope, "Deleted command");
        Ok(())
    }
}

#[cfg(test)]
#[path = "commands_tests.rs"]
mod tests;
