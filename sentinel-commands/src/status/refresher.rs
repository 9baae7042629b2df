//! Periodic reconciliation of tracked channel names.
//!
//! One pass loads every stored template, recomputes the display string
//! from live counts, and renames only the channels whose current name
//! differs. Renames are best-effort: a failed one is logged and retried
//! no earlier than the next tick.

use std::time::Duration;

use tracing::{debug, error, warn};
use twilight_http::Client;
use twilight_model::channel::ChannelType;
use twilight_model::id::{Id, marker::GuildMarker};

use sentinel_core::Context;
use sentinel_database::channel_status::{self, ChannelStatusEntry};
use sentinel_utils::members::fetch_guild_members;
use sentinel_utils::template::{
    GuildCounts, render_status, rename_needed, wants_member_breakdown, wants_member_counts,
};

/// How often tracked channel names are recomputed.
pub const REFRESH_INTERVAL: Duration = Duration::from_secs(5 * 60);

/// Run the refresher forever. Intended to be spawned as a task; ticks
/// never overlap because each pass completes before the next is awaited.
pub async fn run(ctx: Context) {
    let mut ticker = tokio::time::interval(REFRESH_INTERVAL);

    loop {
        ticker.tick().await;
        if let Err(source) = refresh_all(&ctx).await {
            error!(?source, "channel status refresh pass failed");
        }
    }
}

/// One reconciliation pass over every tracked channel.
async fn refresh_all(ctx: &Context) -> anyhow::Result<()> {
    for entry in channel_status::entries(&ctx.db).await? {
        if let Err(source) = refresh_entry(ctx, &entry).await {
            warn!(
                guild_id = entry.guild_id,
                channel_id = entry.channel_id,
                ?source,
                "channel status refresh failed"
            );
        }
    }

    Ok(())
}

async fn refresh_entry(ctx: &Context, entry: &ChannelStatusEntry) -> anyhow::Result<()> {
    let http = &ctx.http;

    // A deleted or invisible channel is skipped, not cleaned up; the
    // entry stays until the operator turns it off.
    let Ok(response) = http.channel(Id::new(entry.channel_id)).await else {
        debug!(
            channel_id = entry.channel_id,
            "tracked channel not resolvable, skipping"
        );
        return Ok(());
    };
    let channel = response.model().await?;

    let counts = gather_counts(http, Id::new(entry.guild_id), &entry.template).await?;
    let computed = render_status(&entry.template, &counts);

    if rename_needed(channel.name.as_deref(), &computed) {
        http.update_channel(channel.id).name(&computed).await?;
    }

    Ok(())
}

/// Collect the counts a template actually needs.
///
/// Only the bot/human breakdown forces a full member scan; a plain
/// member count prefers the guild's approximate figure.
async fn gather_counts(
    http: &Client,
    guild_id: Id<GuildMarker>,
    template: &str,
) -> anyhow::Result<GuildCounts> {
    let channels = http.guild_channels(guild_id).await?.models().await?;
    let text_channels = channels
        .iter()
        .filter(|channel| channel.kind == ChannelType::GuildText)
        .count() as u64;

    let mut counts = GuildCounts {
        text_channels,
        ..Default::default()
    };

    if !wants_member_counts(template) {
        return Ok(counts);
    }

    if wants_member_breakdown(template) {
        let members = fetch_guild_members(http, guild_id).await?;
        counts.members = members.len() as u64;
        counts.bots = members.iter().filter(|member| member.user.bot).count() as u64;
        counts.humans = counts.members - counts.bots;
    } else {
        let guild = http
            .guild(guild_id)
            .with_counts(true)
            .await?
            .model()
            .await?;
        counts.members = match guild.approximate_member_count {
            Some(count) => count,
            None => fetch_guild_members(http, guild_id).await?.len() as u64,
        };
    }

    Ok(counts)
}
