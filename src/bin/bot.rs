use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use dotenvy::dotenv;
use log::{error, info, warn};
use serenity::async_trait;
use serenity::model::channel::Message;
use serenity::model::gateway::Ready;
use serenity::prelude::*;

use affirm::commands::{CommandContext, CommandHandler};
use affirm::core::Config;
use affirm::features::catalog::PhraseCatalog;
use affirm::features::dispatch::{DiscordDispatch, MessageDispatch};
use affirm::features::rate_limiting::RateLimiter;
use affirm::features::scheduling::DeliveryScheduler;
use affirm::features::users::UserStore;

/// Commands allowed per user within the limit window.
const COMMAND_LIMIT: usize = 5;
const COMMAND_LIMIT_WINDOW: Duration = Duration::from_secs(10);

struct Handler {
    command_handler: Arc<CommandHandler>,
}

#[async_trait]
impl EventHandler for Handler {
    async fn message(&self, ctx: Context, msg: Message) {
        if msg.author.bot {
            return;
        }
        // Subscriptions are personal - only DMs carry commands
        if msg.guild_id.is_some() {
            return;
        }

        let user_name = if msg.author.name.is_empty() {
            "Unknown".to_string()
        } else {
            msg.author.name.clone()
        };
        info!(
            "Message from user {} (@{}): {}",
            msg.author.id, user_name, msg.content
        );

        if let Some(reply) = self
            .command_handler
            .handle(msg.author.id.0, &user_name, &msg.content)
            .await
        {
            if let Err(e) = msg.channel_id.say(&ctx.http, reply).await {
                error!("Failed to reply to user {}: {e}", msg.author.id);
            }
        }
    }

    async fn ready(&self, _ctx: Context, ready: Ready) {
        info!("🎉 {} is connected and ready!", ready.user.name);
        info!("🤖 Bot ID: {}", ready.user.id);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    let config = Config::from_env();

    // The logging sink is the one piece of startup that may not fail
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_level))
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {e}"))?;

    info!("Starting affirmation bot...");

    if config.discord_token.is_empty() {
        warn!("DISCORD_TOKEN is not set - the transport will be inoperative");
    }

    let catalog = Arc::new(PhraseCatalog::load(&config.phrases_path));
    let store = Arc::new(UserStore::load(&config.users_path));
    info!(
        "Serving {} phrases to {} known users",
        catalog.len(),
        store.len().await
    );

    let rate_limiter = RateLimiter::new(COMMAND_LIMIT, COMMAND_LIMIT_WINDOW);
    let command_context = CommandContext::new(store.clone(), catalog.clone(), rate_limiter);
    let handler = Handler {
        command_handler: Arc::new(CommandHandler::new(command_context)),
    };

    let intents = GatewayIntents::DIRECT_MESSAGES | GatewayIntents::MESSAGE_CONTENT;

    let mut client = Client::builder(&config.discord_token, intents)
        .event_handler(handler)
        .await
        .map_err(|e| {
            error!("Failed to create Discord client: {e}");
            error!("This could indicate:");
            error!("  - Invalid or missing bot token");
            error!("  - Network issues reaching the Discord API");
            anyhow::anyhow!("Client creation failed: {}", e)
        })?;

    // Start the delivery scheduler
    let scheduler =
        DeliveryScheduler::new(store, catalog, Duration::from_secs(config.tick_seconds));
    let dispatch: Arc<dyn MessageDispatch> =
        Arc::new(DiscordDispatch::new(client.cache_and_http.http.clone()));
    tokio::spawn(async move {
        scheduler.run(dispatch).await;
    });

    info!("Bot configured successfully. Connecting to Discord gateway...");

    if let Err(why) = client.start().await {
        error!("Gateway connection failed: {why:?}");
        error!("This could be due to:");
        error!("  - Invalid bot token");
        error!("  - Network connectivity issues");
        error!("  - Missing required permissions");
        return Err(anyhow::anyhow!(
            "Failed to establish gateway connection: {}",
            why
        ));
    }

    Ok(())
}
