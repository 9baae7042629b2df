//! Cross-guild denylist propagation and join-time enforcement.
//!
//! Everything here that touches more than one guild is fire-and-forget:
//! per-guild and per-member failures are logged and never surfaced to
//! the operator, unlike the batch executor's report-everything contract.

use tracing::{error, info};
use twilight_http::Client;
use twilight_http::request::AuditLogReason as _;
use twilight_model::channel::ChannelType;
use twilight_model::guild::Member;
use twilight_model::id::{
    Id,
    marker::{ChannelMarker, GuildMarker, UserMarker},
};

use sentinel_core::Context;
use sentinel_database::gban;
use sentinel_utils::members::{fetch_current_guilds, fetch_guild_members};

/// Ban a denylisted member the moment they join, unless their guild has
/// opted out.
///
/// Callers must gate this on gateway readiness so the startup replay of
/// join events is ignored.
pub async fn enforce_member_add(
    ctx: &Context,
    guild_id: Id<GuildMarker>,
    member: &Member,
) -> anyhow::Result<()> {
    let Some(reason) = gban::join_verdict(&ctx.db, guild_id.get(), member.user.id.get()).await?
    else {
        return Ok(());
    };

    ctx.http
        .create_ban(guild_id, member.user.id)
        .reason(&reason)
        .await?;
    info!(
        guild_id = guild_id.get(),
        user_id = member.user.id.get(),
        "denylisted member banned on join"
    );

    notify_guild(&ctx.http, guild_id, &ban_notice(&member.user.name, &reason)).await;

    Ok(())
}

/// Sweep every guild the bot is in and ban the denylisted user wherever
/// they are already a member. Guilds that opted out are skipped.
pub async fn propagate_ban(ctx: &Context, user_id: Id<UserMarker>, reason: &str) {
    let guilds = match fetch_current_guilds(&ctx.http).await {
        Ok(guilds) => guilds,
        Err(source) => {
            error!(?source, "denylist sweep could not enumerate guilds");
            return;
        }
    };

    for guild in guilds {
        match gban::enforcement_enabled(&ctx.db, guild.id.get()).await {
            Ok(true) => {}
            Ok(false) => continue,
            Err(source) => {
                error!(
                    guild_id = guild.id.get(),
                    ?source,
                    "denylist sweep could not read the enforcement flag"
                );
                continue;
            }
        }

        if let Err(source) = ban_in_guild(ctx, guild.id, user_id, reason).await {
            error!(
                guild_id = guild.id.get(),
                user_id = user_id.get(),
                ?source,
                "denylist ban sweep failed"
            );
        }
    }
}

/// Sweep every guild and lift the ban for a user removed from the
/// denylist. Guilds where no ban exists are skipped quietly.
pub async fn propagate_unban(ctx: &Context, user_id: Id<UserMarker>) {
    let guilds = match fetch_current_guilds(&ctx.http).await {
        Ok(guilds) => guilds,
        Err(source) => {
            error!(?source, "denylist unban sweep could not enumerate guilds");
            return;
        }
    };

    for guild in guilds {
        if let Err(source) = unban_in_guild(ctx, guild.id, user_id).await {
            error!(
                guild_id = guild.id.get(),
                user_id = user_id.get(),
                ?source,
                "denylist unban sweep failed"
            );
        }
    }
}

async fn ban_in_guild(
    ctx: &Context,
    guild_id: Id<GuildMarker>,
    user_id: Id<UserMarker>,
    reason: &str,
) -> anyhow::Result<()> {
    let members = fetch_guild_members(&ctx.http, guild_id).await?;
    let Some(member) = members.iter().find(|member| member.user.id == user_id) else {
        return Ok(());
    };

    ctx.http
        .create_ban(guild_id, user_id)
        .reason(reason)
        .await?;
    notify_guild(
        &ctx.http,
        guild_id,
        &ban_notice(&member.user.name, reason),
    )
    .await;

    Ok(())
}

async fn unban_in_guild(
    ctx: &Context,
    guild_id: Id<GuildMarker>,
    user_id: Id<UserMarker>,
) -> anyhow::Result<()> {
    let Ok(response) = ctx.http.ban(guild_id, user_id).await else {
        // No ban recorded in this guild.
        return Ok(());
    };
    let ban = response.model().await?;

    ctx.http.delete_ban(guild_id, user_id).await?;
    notify_guild(&ctx.http, guild_id, &unban_notice(&ban.user.name)).await;

    Ok(())
}

/// Post a notice to the guild's system channel, or any text channel when
/// none is configured. Delivery failures are logged and swallowed.
async fn notify_guild(http: &Client, guild_id: Id<GuildMarker>, content: &str) {
    let Some(channel_id) = notification_channel(http, guild_id).await else {
        return;
    };

    if let Err(source) = http.create_message(channel_id).content(content).await {
        error!(
            guild_id = guild_id.get(),
            ?source,
            "denylist notice could not be delivered"
        );
    }
}

async fn notification_channel(
    http: &Client,
    guild_id: Id<GuildMarker>,
) -> Option<Id<ChannelMarker>> {
    let guild = http.guild(guild_id).await.ok()?.model().await.ok()?;
    if let Some(channel_id) = guild.system_channel_id {
        return Some(channel_id);
    }

    let channels = http.guild_channels(guild_id).await.ok()?.models().await.ok()?;
    channels
        .into_iter()
        .find(|channel| channel.kind == ChannelType::GuildText)
        .map(|channel| channel.id)
}

fn ban_notice(name: &str, reason: &str) -> String {
    format!("{name} was banned by the global denylist.\nReason:\n{reason}")
}

fn unban_notice(name: &str) -> String {
    format!("{name} was removed from the global denylist and unbanned.")
}
