//! /about command
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0

use anyhow::Result;
use async_trait::async_trait;

use crate::commands::handler::{BotCommand, CommandOptions};
use crate::commands::response::{CommandResponse, ResponseEmbed};
use crate::dispatch::SlashInvocation;

/// Embed accent color
const ABOUT_COLOR: u32 = 0x6F4E37;

/// Shows information about the bot
pub struct About {
    options: CommandOptions,
    bot_name: String,
}

impl About {
    pub fn new(bot_name: impl Into<String>) -> Self {
        Self {
            options: CommandOptions::new("about", "Shows information about the bot"),
            bot_name: bot_name.into(),
        }
    }
}

#[async_trait]
impl BotCommand for About {
    fn options(&self) -> &CommandOptions {
        &self.options
    }

    async fn run_slash(&self, _user_id: u64, _event: &SlashInvocation) -> Result<CommandResponse> {
        let embed = ResponseEmbed::new(format!(
            "This bot was built using Percolator v{}!",
            env!("CARGO_PKG_VERSION")
        ))
        .title(format!("About {}", self.bot_name))
        .color(ABOUT_COLOR);

        Ok(CommandResponse::embed(embed))
    }
}
