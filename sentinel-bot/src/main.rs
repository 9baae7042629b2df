use std::env;
use std::sync::Arc;

use tracing::{error, info, warn};
use twilight_gateway::{EventTypeFlags, Intents, Shard, ShardId, StreamExt as _};
use twilight_http::Client;
use twilight_model::gateway::event::Event;
use twilight_model::id::Id;

use rustls::crypto::ring::default_provider;
use sqlx::sqlite::SqlitePoolOptions;

use sentinel_commands::{gban, handle_message, status};
use sentinel_core::Context;
use sentinel_database::Database;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    default_provider()
        .install_default()
        .map_err(|_| anyhow::anyhow!("failed to install rustls ring provider"))?;

    // Load the .env file
    dotenvy::dotenv().ok();

    let token = env::var("DISCORD_TOKEN")?;
    let database_url =
        env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://sentinel.db?mode=rwc".to_owned());
    let owner_id = env::var("BOT_OWNER_ID")
        .ok()
        .and_then(|raw| raw.parse::<u64>().ok())
        .filter(|raw| *raw != 0)
        .map(Id::new);
    if owner_id.is_none() {
        warn!("BOT_OWNER_ID is not set; global denylist mutations are disabled");
    }

    // Create a single shared HTTP Client
    let http = Arc::new(Client::new(token.clone()));
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await?;
    let db = Database::new(pool);
    db.init().await?;
    info!("SQLite store ready.");

    let ctx = Context::new(Arc::clone(&http), db, owner_id);

    // Keep tracked channel names converging in the background.
    tokio::spawn(status::refresher::run(ctx.clone()));

    // Declare which intents the bot has
    let intents = Intents::GUILDS
        | Intents::GUILD_MEMBERS
        | Intents::GUILD_MESSAGES
        | Intents::MESSAGE_CONTENT;

    // A shard is one Gateway WebSocket connection to Discord
    let mut shard = Shard::new(ShardId::new(0, 1), token, intents);

    info!("Sentinel is connecting...");

    // Join enforcement stays off until the gateway finishes its startup
    // replay.
    let mut ready = false;

    while let Some(item) = shard.next_event(EventTypeFlags::all()).await {
        let event = match item {
            Ok(event) => event,
            Err(source) => {
                error!(?source, "gateway event stream error");
                continue;
            }
        };

        match event {
            Event::Ready(_) => {
                ready = true;
                info!("Sentinel has successfully awoken!");
            }

            Event::MemberAdd(member_add) if ready => {
                if let Err(source) =
                    gban::engine::enforce_member_add(&ctx, member_add.guild_id, &member_add.member)
                        .await
                {
                    error!(?source, "join-time denylist enforcement failed");
                }
            }

            Event::MessageCreate(msg) => {
                handle_message(ctx.clone(), msg).await?;
            }
            _ => {} // Ignore unused events
        }
    }

    Ok(()) // Return Success, shutdown cleanly
}
