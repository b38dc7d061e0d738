//! Bot command trait and capability model
//!
//! - **Version**: 2.0.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 2.0.0: Button and modal handling became explicit capabilities
//! - 1.0.0: Initial slash-only command trait

use anyhow::Result;
use async_trait::async_trait;
use std::fmt;

use super::response::{CommandResponse, Visibility};
use super::routing::ROUTING_SEPARATOR;
use crate::dispatch::{ButtonClick, ModalSubmit, SlashInvocation};
use crate::platform::CommandDefinition;

/// Discord command name limit
pub const NAME_LIMIT: usize = 32;
/// Discord command description limit
pub const DESCRIPTION_LIMIT: usize = 100;

/// Static options every command declares
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOptions {
    pub name: String,
    pub description: String,
    pub visibility: Visibility,
}

impl CommandOptions {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            visibility: Visibility::Public,
        }
    }

    pub fn visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    /// The platform-facing definition pushed on create/update
    pub fn definition(&self) -> CommandDefinition {
        CommandDefinition {
            name: self.name.clone(),
            description: self.description.clone(),
        }
    }
}

/// Check a definition against Discord's naming rules before any remote call
pub fn validate_definition(definition: &CommandDefinition) -> std::result::Result<(), String> {
    let name = &definition.name;
    if name.is_empty() || name.chars().count() > NAME_LIMIT {
        return Err(format!("name must be 1-{NAME_LIMIT} characters"));
    }
    if !name
        .chars()
        .all(|c| c.is_lowercase() || c.is_ascii_digit() || c == '_' || c == '-')
    {
        return Err("name must be lowercase letters, digits, '-' or '_'".to_string());
    }

    let description = definition.description.trim();
    if description.is_empty() || definition.description.chars().count() > DESCRIPTION_LIMIT {
        return Err(format!("description must be 1-{DESCRIPTION_LIMIT} characters"));
    }
    Ok(())
}

/// Validate a command as a whole: its definition, plus a routable name when
/// it owns buttons or modals
pub fn validate_command(command: &dyn BotCommand) -> std::result::Result<(), String> {
    validate_definition(&command.definition())?;
    let routes_components =
        command.supports(Capability::Button) || command.supports(Capability::Modal);
    if routes_components && command.name().contains(ROUTING_SEPARATOR) {
        return Err(format!(
            "commands with buttons or modals cannot use '{ROUTING_SEPARATOR}' in their name"
        ));
    }
    Ok(())
}

/// Event-handling capability a command may implement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    Slash,
    Button,
    Modal,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Capability::Slash => "slash",
            Capability::Button => "button",
            Capability::Modal => "modal",
        };
        f.write_str(label)
    }
}

/// Broad command category, derived from the implemented capabilities
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    SlashCommand,
    ButtonCommand,
    ModalCommand,
}

/// A registrable bot command
///
/// Every command answers slash invocations. Commands that own buttons or
/// modals expose those capabilities through `as_button` / `as_modal`; the
/// dispatcher refuses to route component events to commands that return `None`.
///
/// # Example
///
/// ```ignore
/// pub struct Ping { options: CommandOptions }
///
/// #[async_trait]
/// impl BotCommand for Ping {
///     fn options(&self) -> &CommandOptions {
///         &self.options
///     }
///
///     async fn run_slash(&self, _user_id: u64, _event: &SlashInvocation) -> Result<CommandResponse> {
///         Ok(CommandResponse::text("Pong!"))
///     }
/// }
/// ```
#[async_trait]
pub trait BotCommand: Send + Sync {
    fn options(&self) -> &CommandOptions;

    fn name(&self) -> &str {
        &self.options().name
    }

    fn definition(&self) -> CommandDefinition {
        self.options().definition()
    }

    /// Handle a slash invocation from `user_id`
    async fn run_slash(&self, user_id: u64, event: &SlashInvocation) -> Result<CommandResponse>;

    fn as_button(&self) -> Option<&dyn ButtonCommand> {
        None
    }

    fn as_modal(&self) -> Option<&dyn ModalCommand> {
        None
    }

    fn supports(&self, capability: Capability) -> bool {
        match capability {
            Capability::Slash => true,
            Capability::Button => self.as_button().is_some(),
            Capability::Modal => self.as_modal().is_some(),
        }
    }

    fn kind(&self) -> CommandKind {
        if self.as_modal().is_some() {
            CommandKind::ModalCommand
        } else if self.as_button().is_some() {
            CommandKind::ButtonCommand
        } else {
            CommandKind::SlashCommand
        }
    }
}

#[async_trait]
pub trait ButtonCommand: Send + Sync {
    async fn run_button(&self, event: &ButtonClick) -> Result<()>;
}

#[async_trait]
pub trait ModalCommand: Send + Sync {
    async fn run_modal(&self, event: &ModalSubmit) -> Result<()>;
}
