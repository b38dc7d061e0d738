//! Built-in command implementations
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0

pub mod about;

use std::sync::Arc;

use super::handler::BotCommand;

pub use about::About;

/// Create the built-in commands
///
/// `bot_name` is the connected bot user's name, known once the gateway is ready.
pub fn create_default_commands(bot_name: &str) -> Vec<Arc<dyn BotCommand>> {
    vec![Arc::new(About::new(bot_name))]
}
