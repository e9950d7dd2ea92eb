//! Bot layer - Discord-specific interface and command handlers
//!
//! Commands translate Discord input into calls on the core services held in
//! [`BotData`], and render the typed outcomes. Domain errors bubble up to
//! [`on_error`], which turns them into a `❌` reply.

/// Guild scoping, access checks and best-effort DMs
pub mod access;
/// Discord command implementations
pub mod commands;
/// Event, component and autocomplete handlers
pub mod handlers;

use crate::{
    config::settings::BotConfig,
    core::{
        applications::ApplicationDesk,
        ledger::Ledger,
        lottery::{LotteryDesk, spawn_lottery_scheduler},
        moderation::{Moderation, MuteBook},
    },
    errors::{Error, Result},
    games::{ExpiredGame, GameRegistry},
    store::{KeyLocks, Store},
};
use poise::serenity_prelude as serenity;
use std::{sync::Arc, time::Duration};
use tokio::sync::mpsc;
use tracing::{debug, error, info, instrument, warn};

/// Command context used by every handler.
pub type Context<'a> = poise::Context<'a, BotData, Error>;

/// Shared state available to all commands and event handlers.
pub struct BotData {
    /// Economy operations
    pub ledger: Ledger,
    /// Lottery operations
    pub lottery: LotteryDesk,
    /// Warnings, jail and guild settings
    pub moderation: Moderation,
    /// Live mini-games
    pub games: GameRegistry,
    /// Current mute per member
    pub mutes: MuteBook,
    /// Role applications awaiting review
    pub applications: ApplicationDesk,
    /// Settings from `config.toml`
    pub config: Arc<BotConfig>,
}

impl BotData {
    /// Wires the core services over `store`. Returns the receiver for game
    /// expiry notices, which the caller must drain.
    #[must_use]
    pub fn new(
        store: Arc<dyn Store>,
        config: Arc<BotConfig>,
    ) -> (Self, mpsc::UnboundedReceiver<ExpiredGame>) {
        let locks = KeyLocks::new();
        let ledger = Ledger::new(Arc::clone(&store), locks.clone());
        let moderation = Moderation::new(store, locks, config.moderation.default_warn_limit);
        let (games, expired) = GameRegistry::new();
        let data = Self {
            lottery: LotteryDesk::new(ledger.clone()),
            ledger,
            moderation,
            games,
            mutes: MuteBook::new(),
            applications: ApplicationDesk::new(),
            config,
        };
        (data, expired)
    }
}

async fn on_error(error: poise::FrameworkError<'_, BotData, Error>) {
    match error {
        poise::FrameworkError::Setup { error, .. } => {
            error!("Failed to start bot: {error:?}");
        }
        poise::FrameworkError::Command { error, ctx, .. } => {
            let reply = if error.is_user_facing() {
                debug!("Command `{}` denied: {error}", ctx.command().name);
                format!("❌ {error}")
            } else {
                error!("Error in command `{}`: {error:?}", ctx.command().name);
                "❌ Something went wrong while running that command.".to_string()
            };
            if let Err(e) = ctx.say(reply).await {
                warn!("Failed to send error message: {e}");
            }
        }
        error => {
            if let Err(e) = poise::builtins::on_error(error).await {
                error!("Error while handling error: {e}");
            }
        }
    }
}

/// Connects to Discord and runs until the gateway connection ends.
///
/// Spawns the lottery scheduler and the game-expiry announcer once the bot is ready.
#[instrument(skip(token, config, store))]
pub async fn run_bot(token: String, config: Arc<BotConfig>, store: Arc<dyn Store>) -> Result<()> {
    let (data, expired) = BotData::new(store, Arc::clone(&config));

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: commands::all(),
            prefix_options: poise::PrefixFrameworkOptions {
                prefix: Some(config.bot.prefix.clone()),
                ..Default::default()
            },
            on_error: |error| Box::pin(on_error(error)),
            event_handler: |ctx, event, framework, data| {
                Box::pin(handlers::events::event_handler(ctx, event, framework, data))
            },
            ..Default::default()
        })
        .setup(move |ctx, ready, framework| {
            Box::pin(async move {
                info!("Logged in as {}", ready.user.name);
                if let Some(guild_id) = config.bot.dev_guild_id {
                    info!("Registering commands in development guild {guild_id}...");
                    poise::builtins::register_in_guild(
                        ctx,
                        &framework.options().commands,
                        serenity::GuildId::new(guild_id),
                    )
                    .await?;
                } else {
                    info!("Registering commands globally...");
                    poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                }

                let (draws_tx, draws_rx) = mpsc::unbounded_channel();
                spawn_lottery_scheduler(
                    data.lottery.clone(),
                    Duration::from_secs(config.lottery.poll_interval_secs),
                    draws_tx,
                );
                handlers::expiry::spawn_announcers(ctx.clone(), expired, draws_rx);
                Ok(data)
            })
        })
        .build();

    let intents = serenity::GatewayIntents::GUILDS
        | serenity::GatewayIntents::GUILD_MEMBERS
        | serenity::GatewayIntents::GUILD_MESSAGES
        | serenity::GatewayIntents::DIRECT_MESSAGES
        | serenity::GatewayIntents::MESSAGE_CONTENT;

    info!("Setting up Serenity client for Poise framework...");
    let mut client = serenity::ClientBuilder::new(token, intents)
        .framework(framework)
        .await
        .inspect_err(|e| error!("Error creating client: {e:?}"))?;

    info!("Starting bot client...");
    client
        .start()
        .await
        .inspect_err(|e| error!("Client error: {e:?}"))?;
    Ok(())
}
