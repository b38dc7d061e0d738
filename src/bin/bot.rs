use anyhow::Result;
use dotenvy::dotenv;
use log::{error, info, warn};
use serenity::async_trait;
use serenity::model::application::interaction::Interaction;
use serenity::model::gateway::Ready;
use serenity::prelude::*;
use std::sync::Arc;

use percolator::commands::{command_map, create_default_commands};
use percolator::core::Config;
use percolator::dispatch::{EventDispatcher, WorkerPool};
use percolator::gateway::to_event;
use percolator::platform::{CommandScope, DiscordPlatform};
use percolator::CommandRegistry;

struct Handler {
    dispatcher: EventDispatcher,
    scope: CommandScope,
    update_commands_at_launch: bool,
    register_default_commands: bool,
}

#[async_trait]
impl EventHandler for Handler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        info!("🎉 {} is connected and ready!", ready.user.name);
        info!("📡 Connected to {} guilds", ready.guilds.len());
        info!("🤖 Bot ID: {}", ready.user.id);

        let desired = if self.register_default_commands {
            command_map(create_default_commands(&ready.user.name))
        } else {
            Default::default()
        };

        let platform = DiscordPlatform::new(ctx.http.clone(), self.scope);
        info!(
            "🔧 Reconciling {} commands ({} scope, update existing: {})",
            desired.len(),
            platform.scope(),
            self.update_commands_at_launch
        );

        let registry = self.dispatcher.registry();
        match registry
            .reconcile(&platform, desired, self.update_commands_at_launch)
            .await
        {
            Ok(report) if report.is_clean() => {
                info!(
                    "✅ Commands in sync: {}",
                    registry.command_names().join(", ")
                );
            }
            Ok(report) => {
                for failure in &report.failures {
                    warn!("⚠️ {failure}");
                }
                warn!(
                    "Commands partially in sync ({} failures)",
                    report.failures.len()
                );
            }
            Err(e) => {
                error!("❌ Failed to reconcile slash commands: {e}");
            }
        }
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        let Some(event) = to_event(interaction, ctx.http.clone()) else {
            return;
        };
        if let Err(e) = self.dispatcher.on_event(event) {
            error!("Interaction wiring error: {e}");
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    let config = Config::from_env()?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_level))
        .init();

    info!("Starting Percolator bot...");

    let registry = Arc::new(CommandRegistry::new());
    let pool = WorkerPool::current(config.max_concurrent_tasks);
    if pool.is_bounded() {
        info!(
            "🧵 Worker pool bounded to {} concurrent tasks",
            config.max_concurrent_tasks
        );
    }
    let dispatcher = EventDispatcher::new(registry, pool);

    let scope = CommandScope::from_guild_id(config.discord_guild_id);
    if let CommandScope::Guild(guild_id) = scope {
        info!("🔧 Development mode: commands are scoped to guild {guild_id}");
    } else {
        info!("🌍 Production mode: commands are registered globally");
    }

    let handler = Handler {
        dispatcher,
        scope,
        update_commands_at_launch: config.update_commands_at_launch,
        register_default_commands: config.register_default_commands,
    };

    let intents = GatewayIntents::GUILDS;

    let mut client = Client::builder(&config.discord_token, intents)
        .event_handler(handler)
        .await
        .map_err(|e| {
            error!("Failed to create Discord client: {e}");
            anyhow::anyhow!("Client creation failed: {}", e)
        })?;

    info!("Bot configured successfully. Connecting to Discord gateway...");

    if let Err(why) = client.start().await {
        error!("Gateway connection failed: {why:?}");
        return Err(anyhow::anyhow!(
            "Failed to establish gateway connection: {}",
            why
        ));
    }

    Ok(())
}
