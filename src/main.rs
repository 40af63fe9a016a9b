// This is the entry point of the red-text highlighter bot.
//
// **Architecture Overview:**
// - `core/` = Business logic (platform-agnostic): credentials, document
//   tree walking, the highlight workflow
// - `infra/` = Implementations of core traits (Google Docs + OAuth over HTTP)
// - `discord/` = Discord-specific adapters (the `/highlight` command)
//
// This file's job is to:
// 1. Load configuration
// 2. Initialize services (dependency injection)
// 3. Set up the Discord framework
// 4. Register commands

// These attrs point each module declaration at a more descriptive root file
// so we don't end up with half a dozen mod.rs files that all look the same.
#[path = "core/core_layer.rs"]
mod core;
#[path = "discord/discord_layer.rs"]
mod discord;
#[path = "infra/infra_layer.rs"]
mod infra;

use anyhow::Context as _;
use poise::serenity_prelude as serenity;
use std::sync::Arc;

use crate::core::auth::CredentialManager;
use crate::core::highlight::{HighlightConfig, HighlightService};
use crate::discord::commands::presence;
use crate::discord::{Data, Error};
use crate::infra::config::AppConfig;
use crate::infra::google_docs::{GoogleDocsClient, GoogleTokenClient};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging so we can see what's happening
    tracing_subscriber::fmt::init();

    // Load environment variables from .env file (if it exists)
    dotenv::dotenv().ok();

    let config = AppConfig::from_env()
        .await
        .context("Invalid configuration. Check your .env file.")?;

    // ========================================================================
    // DEPENDENCY INJECTION
    // ========================================================================
    // This is the "composition root" where we wire everything together.

    let mut docs_client = GoogleDocsClient::new(config.http_timeout)
        .context("Failed to create Google Docs client")?;
    if let Some(base) = &config.docs_api_base {
        tracing::info!("Using Docs API base {}", base);
        docs_client = docs_client.with_base_url(base.clone());
    }

    let token_client = GoogleTokenClient::new(config.http_timeout)
        .context("Failed to create OAuth token client")?;

    // The credential lives for the whole process; refreshes update it in place
    let credentials = CredentialManager::new(config.secrets.clone(), token_client)
        .context("Google credentials are incomplete")?;

    let highlight_service = Arc::new(HighlightService::new(
        docs_client,
        credentials,
        HighlightConfig::default(),
    ));

    let data = Data {
        highlight: Arc::clone(&highlight_service),
        api_key: config.api_key.clone(),
    };

    // ========================================================================
    // DISCORD FRAMEWORK SETUP
    // ========================================================================

    // Slash commands only, so no privileged intents are needed
    let intents = serenity::GatewayIntents::non_privileged();
    let guild_id = config.guild_id;

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: vec![discord::commands::highlight::highlight()],
            on_error: |error| {
                Box::pin(async move {
                    if let poise::FrameworkError::Command { error, ctx, .. } = error {
                        tracing::error!(
                            command = %ctx.command().name,
                            "Command failed: {}",
                            error
                        );
                    } else if let Err(e) = poise::builtins::on_error(error).await {
                        tracing::error!("Error while handling error: {}", e);
                    }
                })
            },
            ..Default::default()
        })
        .setup(move |ctx, _ready, framework| {
            Box::pin(async move {
                tracing::info!("🤖 Bot is starting up...");

                // Guild registration is instant; global can take up to an hour
                match guild_id {
                    Some(id) => {
                        poise::builtins::register_in_guild(
                            ctx,
                            &framework.options().commands,
                            serenity::GuildId::new(id),
                        )
                        .await?;
                    }
                    None => {
                        poise::builtins::register_globally(ctx, &framework.options().commands)
                            .await?;
                    }
                }

                tracing::info!("✅ Commands registered!");
                presence::on_ready(ctx);
                tracing::info!("🚀 Bot is ready!");

                Ok::<Data, Error>(data)
            })
        })
        .build();

    let mut client = serenity::ClientBuilder::new(&config.discord_token, intents)
        .framework(framework)
        .await
        .context("Error creating client")?;

    client.start().await.context("Error running bot")?;

    Ok(())
}
