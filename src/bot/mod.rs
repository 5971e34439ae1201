//! Bot layer - Discord-specific interface and command handlers
//!
//! This module is the presentation layer of the clinic agenda: slash commands act
//! as the forms, embeds render the schedule grid and the cash report, and the
//! read cache keeps autocomplete cheap.

/// Short-TTL read cache owned by the presentation layer
pub mod cache;
/// Discord command implementations (agenda, patients, professionals, insurances, cash, general)
pub mod commands;
/// Discord interaction handlers (autocomplete, etc.)
pub mod handlers;

use crate::{
    config::clinic::ClinicConfig,
    errors::{Error, Result},
};
use cache::ReadCache;
use poise::serenity_prelude as serenity;
use sea_orm::DatabaseConnection;
use tracing::{error, info};

/// Shared data available to all bot commands.
pub struct BotData {
    /// Database connection for all database operations
    pub database: DatabaseConnection,
    /// Cached listings; invalidate after every write
    pub cache: ReadCache,
}

impl BotData {
    /// Creates a new `BotData` with an empty cache.
    #[must_use]
    pub fn new(database: DatabaseConnection, config: &ClinicConfig) -> Self {
        Self {
            database,
            cache: ReadCache::new(config.cache_ttl()),
        }
    }
}

/// Every slash command the bot registers.
#[must_use]
pub fn all_commands() -> Vec<poise::Command<BotData, Error>> {
    vec![
        commands::ping(),
        commands::help(),
        commands::agenda(),
        commands::book(),
        commands::appointment(),
        commands::patient(),
        commands::professional(),
        commands::insurance(),
        commands::cash(),
    ]
}

async fn on_error(error: poise::FrameworkError<'_, BotData, Error>) {
    match error {
        poise::FrameworkError::Command { error, ctx, .. } => {
            error!("Error in command `{}`: {:?}", ctx.command().name, error);
            let message = if error.is_unique_violation() {
                "❌ A record with that name already exists.".to_string()
            } else {
                format!("❌ {error}")
            };
            if let Err(e) = ctx.say(message).await {
                error!("Failed to send error message: {}", e);
            }
        }
        error => {
            if let Err(e) = poise::builtins::on_error(error).await {
                error!("Error while handling error: {}", e);
            }
        }
    }
}

/// Connects to Discord and serves commands until the client stops.
pub async fn run_bot(token: String, database: DatabaseConnection, config: &ClinicConfig) -> Result<()> {
    let data = BotData::new(database, config);

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: all_commands(),
            on_error: |error| Box::pin(on_error(error)),
            ..Default::default()
        })
        .setup(|ctx, ready, framework| {
            Box::pin(async move {
                info!("Logged in as {}", ready.user.name);
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                info!("Slash commands registered");
                Ok(data)
            })
        })
        .build();

    let intents = serenity::GatewayIntents::non_privileged();

    let mut client = serenity::ClientBuilder::new(token, intents)
        .framework(framework)
        .await?;

    info!("Starting bot client...");
    client.start().await?;
    Ok(())
}

pub use commands::*;
pub use handlers::*;
