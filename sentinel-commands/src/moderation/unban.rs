use tracing::error;
use twilight_http::request::AuditLogReason as _;
use twilight_model::{gateway::payload::incoming::MessageCreate, guild::Permissions};

use crate::CommandMeta;
use crate::embeds::{
    fetch_target_profile, guild_only_message, moderation_action_embed, permission_denied_message,
    usage_message,
};
use sentinel_core::Context;
use sentinel_utils::parse::parse_user_id;
use sentinel_utils::permissions::has_permission;

pub const META: CommandMeta = CommandMeta {
    name: "unban",
    desc: "Lift a ban on this server.",
    category: "moderation",
    usage: "!unban <user> [reason]",
};

/// Remove an active ban for a target user.
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

    if !has_permission(http, &msg, Permissions::BAN_MEMBERS).await? {
        http.create_message(msg.channel_id)
            .content(permission_denied_message())
            .await?;
        return Ok(());
    }

    let Some(target_user_id) = arg1.and_then(parse_user_id) else {
        let usage = usage_message(META.usage);
        http.create_message(msg.channel_id).content(&usage).await?;
        return Ok(());
    };

    let mut request = http.delete_ban(guild_id, target_user_id);
    if let Some(reason) = arg_tail {
        request = request.reason(reason);
    }

    if let Err(source) = request.await {
        error!(?source, "unban request failed");
        http.create_message(msg.channel_id)
            .content("I couldn't unban that user. They may not be banned, or I lack permissions.")
            .await?;
        return Ok(());
    }

    let target_profile = fetch_target_profile(http, target_user_id).await;
    let embed = moderation_action_embed(&target_profile, target_user_id, "unbanned", arg_tail)?;
    http.create_message(msg.channel_id).embeds(&[embed]).await?;

    Ok(())
}
