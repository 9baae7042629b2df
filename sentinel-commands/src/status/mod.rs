//! Channel-status tracking: the operator command and the periodic
//! refresher that keeps channel names converging on their templates.

pub mod refresher;

use twilight_model::{gateway::payload::incoming::MessageCreate, guild::Permissions};

use crate::CommandMeta;
use crate::embeds::{guild_only_message, permission_denied_message, usage_message};
use sentinel_core::Context;
use sentinel_database::channel_status;
use sentinel_utils::permissions::has_permission;

pub const META: CommandMeta = CommandMeta {
    name: "status",
    desc: "Show live counts in this channel's name.",
    category: "utility",
    usage: "!status <text|off>",
};

const OFF_KEYWORDS: [&str; 4] = ["off", "false", "disable", "0"];

/// Set or clear the status template for the invoking channel.
///
/// Templates may contain `!ch!`, `!mb!`, `!bt!`, and `!us!` tokens; the
/// refresher substitutes live counts every five minutes.
pub async fn run(
    ctx: Context,
    msg: Box<MessageCreate>,
    arg1: Option<&str>,
    arg_tail: Option<&str>,
) -> anyhow::Result<()> {
    let http = &ctx.http;
    let Some(guild_id) = msg.guild_id else {
        http.create_message(msg.channel_id)
            .content(guild_only_message())
            .await?;
        return Ok(());
    };

    if !has_permission(http, &msg, Permissions::MANAGE_CHANNELS).await? {
        http.create_message(msg.channel_id)
            .content(permission_denied_message())
            .await?;
        return Ok(());
    }

    let Some(first) = arg1 else {
        let usage = usage_message(META.usage);
        http.create_message(msg.channel_id).content(&usage).await?;
        return Ok(());
    };

    let text = match arg_tail {
        Some(rest) => format!("{first} {rest}"),
        None => first.to_owned(),
    };

    if OFF_KEYWORDS.contains(&text.to_ascii_lowercase().as_str()) {
        channel_status::clear(&ctx.db, guild_id.get(), msg.channel_id.get()).await?;
        http.create_message(msg.channel_id)
            .content("Status display disabled for this channel.")
            .await?;
        return Ok(());
    }

    channel_status::save(&ctx.db, guild_id.get(), msg.channel_id.get(), &text).await?;
    http.create_message(msg.channel_id)
        .content("Status set. The channel name refreshes every five minutes.")
        .await?;

    Ok(())
}
