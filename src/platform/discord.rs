//! Serenity-backed command platform
//!
//! Guild scope updates instantly and is meant for development; global scope may
//! take up to an hour to propagate.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0

use anyhow::Result;
use async_trait::async_trait;
use serenity::builder::CreateApplicationCommand;
use serenity::http::Http;
use serenity::model::application::command::Command;
use serenity::model::id::{CommandId, GuildId};
use std::fmt;
use std::sync::Arc;

use super::{CommandDefinition, CommandPlatform, RemoteCommandRecord, RemoteId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandScope {
    Global,
    Guild(GuildId),
}

impl CommandScope {
    pub fn from_guild_id(guild_id: Option<u64>) -> Self {
        match guild_id {
            Some(id) => CommandScope::Guild(GuildId(id)),
            None => CommandScope::Global,
        }
    }
}

impl fmt::Display for CommandScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandScope::Global => f.write_str("global"),
            CommandScope::Guild(guild_id) => write!(f, "guild {guild_id}"),
        }
    }
}

pub struct DiscordPlatform {
    http: Arc<Http>,
    scope: CommandScope,
}

impl DiscordPlatform {
    /// Create a platform managing commands in `scope`
    pub fn new(http: Arc<Http>, scope: CommandScope) -> Self {
        Self { http, scope }
    }

    /// Scope this platform registers commands in
    pub fn scope(&self) -> CommandScope {
        self.scope
    }
}

fn apply_definition<'a>(
    builder: &'a mut CreateApplicationCommand,
    definition: &CommandDefinition,
) -> &'a mut CreateApplicationCommand {
    builder
        .name(&definition.name)
        .description(&definition.description)
}

fn to_records(commands: Vec<Command>) -> Vec<RemoteCommandRecord> {
    commands
        .into_iter()
        .map(|command| RemoteCommandRecord {
            name: command.name,
            id: RemoteId(command.id.0),
        })
        .collect()
}

#[async_trait]
impl CommandPlatform for DiscordPlatform {
    async fn list_commands(&self) -> Result<Vec<RemoteCommandRecord>> {
        let commands = match self.scope {
            CommandScope::Global => Command::get_global_application_commands(&self.http).await?,
            CommandScope::Guild(guild_id) => guild_id.get_application_commands(&self.http).await?,
        };
        Ok(to_records(commands))
    }

    async fn create_command(&self, definition: &CommandDefinition) -> Result<RemoteId> {
        let command = match self.scope {
            CommandScope::Global => {
                Command::create_global_application_command(&self.http, |c| {
                    apply_definition(c, definition)
                })
                .await?
            }
            CommandScope::Guild(guild_id) => {
                guild_id
                    .create_application_command(&self.http, |c| apply_definition(c, definition))
                    .await?
            }
        };
        Ok(RemoteId(command.id.0))
    }

    async fn update_command(&self, id: RemoteId, definition: &CommandDefinition) -> Result<()> {
        let command_id = CommandId(id.0);
        match self.scope {
            CommandScope::Global => {
                Command::edit_global_application_command(&self.http, command_id, |c| {
                    apply_definition(c, definition)
                })
                .await?;
            }
            CommandScope::Guild(guild_id) => {
                guild_id
                    .edit_application_command(&self.http, command_id, |c| {
                        apply_definition(c, definition)
                    })
                    .await?;
            }
        }
        Ok(())
    }

    async fn delete_command(&self, id: RemoteId) -> Result<()> {
        let command_id = CommandId(id.0);
        match self.scope {
            CommandScope::Global => {
                Command::delete_global_application_command(&self.http, command_id).await?
            }
            CommandScope::Guild(guild_id) => {
                guild_id
                    .delete_application_command(&self.http, command_id)
                    .await?
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_from_guild_id() {
        assert_eq!(CommandScope::from_guild_id(None), CommandScope::Global);
        assert_eq!(
            CommandScope::from_guild_id(Some(7)),
            CommandScope::Guild(GuildId(7))
        );
    }

    #[test]
    fn test_scope_display() {
        assert_eq!(CommandScope::Global.to_string(), "global");
        assert_eq!(CommandScope::Guild(GuildId(7)).to_string(), "guild 7");
    }
}
