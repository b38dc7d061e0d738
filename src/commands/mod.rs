//! # Command System
//!
//! Command contract, routing keys, and the registry that keeps Discord's
//! application commands in sync with the locally declared set.
//!
//! - **Version**: 3.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 3.0.0: Registry reconciles against the remote command list
//! - 2.0.0: Button and modal capabilities, component id routing
//! - 1.0.0: Initial slash command registry

pub mod handler;
pub mod handlers;
pub mod registry;
pub mod response;
pub mod routing;

pub use handler::{
    validate_command, validate_definition, BotCommand, ButtonCommand, Capability, CommandKind,
    CommandOptions, ModalCommand,
};
pub use handlers::create_default_commands;
pub use registry::{command_map, CommandMap, CommandRegistry, ReconcileReport};
pub use response::{CommandResponse, ResponseBody, ResponseEmbed, Visibility};
pub use routing::{component_id, routing_key};
