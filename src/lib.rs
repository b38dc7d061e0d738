// Core layer - config, errors, payload limits
pub mod core;

// Remote command service
pub mod platform;

// Application layer
pub mod commands;
pub mod dispatch;

// Serenity bridge
pub mod gateway;

// Re-export core config for the binary
pub use crate::core::Config;

pub use commands::{
    command_map, BotCommand, ButtonCommand, CommandMap, CommandOptions, CommandRegistry,
    CommandResponse, ModalCommand, ReconcileReport,
};
pub use dispatch::{EventDispatcher, InteractionEvent, WorkerPool};
pub use platform::{CommandPlatform, CommandScope, DiscordPlatform};
