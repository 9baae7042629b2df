use twilight_model::gateway::payload::incoming::MessageCreate;

use crate::CommandMeta;
use crate::embeds::{
    fetch_target_profile, moderation_action_embed, owner_only_message, usage_message,
};
use crate::gban::engine;
use sentinel_core::Context;
use sentinel_database::gban;
use sentinel_utils::parse::parse_user_id;

pub const META: CommandMeta = CommandMeta {
    name: "gban",
    desc: "Add a user to the global denylist and ban them everywhere.",
    category: "gban",
    usage: "!gban <user> <reason>",
};

/// Persist a denylist entry, then sweep every guild for the user.
pub async fn run(
    ctx: Context,
    msg: Box<MessageCreate>,
    arg1: Option<&str>,
    arg_tail: Option<&str>,
) -> anyhow::Result<()> {
    let http = &ctx.http;
    if !ctx.is_owner(msg.author.id) {
        http.create_message(msg.channel_id)
            .content(owner_only_message())
            .await?;
        return Ok(());
    }

    let (Some(raw_target), Some(reason)) = (arg1, arg_tail) else {
        let usage = usage_message(META.usage);
        http.create_message(msg.channel_id).content(&usage).await?;
        return Ok(());
    };

    let Some(target_user_id) = parse_user_id(raw_target) else {
        let usage = usage_message(META.usage);
        http.create_message(msg.channel_id).content(&usage).await?;
        return Ok(());
    };

    gban::add_entry(&ctx.db, target_user_id.get(), reason).await?;

    // Catch-up for guilds the user already sits in; join events cover
    // everyone else.
    engine::propagate_ban(&ctx, target_user_id, reason).await;

    let target_profile = fetch_target_profile(http, target_user_id).await;
    let embed = moderation_action_embed(
        &target_profile,
        target_user_id,
        "added to the global denylist",
        Some(reason),
    )?;
    http.create_message(msg.channel_id).embeds(&[embed]).await?;

    Ok(())
}
