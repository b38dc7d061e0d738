//! Environment-driven bot configuration
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0

use anyhow::{anyhow, Context, Result};

/// Runtime configuration read from the process environment (and `.env`).
#[derive(Debug, Clone)]
pub struct Config {
    pub discord_token: String,
    /// When set, commands are reconciled against this guild only (instant updates)
    pub discord_guild_id: Option<u64>,
    pub log_level: String,
    /// Push local definitions over matched remote commands at startup
    pub update_commands_at_launch: bool,
    /// Include the built-in commands (`about`) in the desired set
    pub register_default_commands: bool,
    /// Upper bound on concurrently running handler tasks, 0 = unbounded
    pub max_concurrent_tasks: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let discord_token = lookup("DISCORD_TOKEN")
            .filter(|token| !token.trim().is_empty())
            .ok_or_else(|| anyhow!("DISCORD_TOKEN must be set"))?;

        let discord_guild_id = match lookup("DISCORD_GUILD_ID").filter(|v| !v.trim().is_empty()) {
            Some(raw) => Some(
                raw.trim()
                    .parse::<u64>()
                    .with_context(|| format!("DISCORD_GUILD_ID is not a valid id: {raw}"))?,
            ),
            None => None,
        };

        let max_concurrent_tasks = match lookup("MAX_CONCURRENT_TASKS") {
            Some(raw) => raw
                .trim()
                .parse::<usize>()
                .with_context(|| format!("MAX_CONCURRENT_TASKS is not a number: {raw}"))?,
            None => 0,
        };

        Ok(Self {
            discord_token,
            discord_guild_id,
            log_level: lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            update_commands_at_launch: parse_flag(&lookup, "UPDATE_COMMANDS_AT_LAUNCH", true)?,
            register_default_commands: parse_flag(&lookup, "REGISTER_DEFAULT_COMMANDS", true)?,
            max_concurrent_tasks,
        })
    }
}

fn parse_flag<F>(lookup: &F, key: &str, default: bool) -> Result<bool>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return Ok(default);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        "" => Ok(default),
        other => Err(anyhow!("{key} must be a boolean, got '{other}'")),
    }
}
