use twilight_model::gateway::payload::incoming::MessageCreate;

use crate::CommandMeta;
use crate::embeds::{
    fetch_target_profile, moderation_action_embed, owner_only_message, usage_message,
};
use crate::gban::engine;
use sentinel_core::Context;
use sentinel_database::{StoreError, gban};
use sentinel_utils::parse::parse_user_id;

pub const META: CommandMeta = CommandMeta {
    name: "ungban",
    desc: "Remove a user from the global denylist and unban them everywhere.",
    category: "gban",
    usage: "!ungban <user>",
};

/// Delete a denylist entry, then lift the ban across every guild.
///
/// Removing a user who is not listed is an error and has no side
/// effects.
pub async fn run(ctx: Context, msg: Box<MessageCreate>, arg1: Option<&str>) -> anyhow::Result<()> {
    let http = &ctx.http;
    if !ctx.is_owner(msg.author.id) {
        http.create_message(msg.channel_id)
            .content(owner_only_message())
            .await?;
        return Ok(());
    }

    let Some(raw_target) = arg1 else {
        let usage = usage_message(META.usage);
        http.create_message(msg.channel_id).content(&usage).await?;
        return Ok(());
    };

    let Some(target_user_id) = parse_user_id(raw_target) else {
        let usage = usage_message(META.usage);
        http.create_message(msg.channel_id).content(&usage).await?;
        return Ok(());
    };

    match gban::remove_entry(&ctx.db, target_user_id.get()).await {
        Ok(()) => {}
        Err(StoreError::NotDenied(_)) => {
            http.create_message(msg.channel_id)
                .content("That user is not on the global denylist.")
                .await?;
            return Ok(());
        }
        Err(source) => return Err(source.into()),
    }

    engine::propagate_unban(&ctx, target_user_id).await;

    let target_profile = fetch_target_profile(http, target_user_id).await;
    let embed = moderation_action_embed(
        &target_profile,
        target_user_id,
        "removed from the global denylist",
        None,
    )?;
    http.create_message(msg.channel_id).embeds(&[embed]).await?;

    Ok(())
}
