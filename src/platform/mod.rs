//! # Remote Command Platform
//!
//! The service the registry reconciles against: list, create, update and delete
//! application commands. `DiscordPlatform` talks to Discord through serenity's
//! HTTP client; tests use an in-memory stand-in.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false

pub mod discord;
#[cfg(test)]
pub(crate) mod memory;

use anyhow::Result;
use async_trait::async_trait;
use std::fmt;

pub use discord::{CommandScope, DiscordPlatform};

/// Platform-assigned command identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RemoteId(pub u64);

impl fmt::Display for RemoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A command as the platform currently knows it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteCommandRecord {
    pub name: String,
    pub id: RemoteId,
}

/// The definition pushed to the platform on create/update
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandDefinition {
    pub name: String,
    pub description: String,
}

#[async_trait]
pub trait CommandPlatform: Send + Sync {
    /// Fetch every command currently registered in this platform scope
    async fn list_commands(&self) -> Result<Vec<RemoteCommandRecord>>;

    async fn create_command(&self, definition: &CommandDefinition) -> Result<RemoteId>;

    async fn update_command(&self, id: RemoteId, definition: &CommandDefinition) -> Result<()>;

    async fn delete_command(&self, id: RemoteId) -> Result<()>;
}
