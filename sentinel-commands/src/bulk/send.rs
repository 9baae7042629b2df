use std::sync::Arc;

use twilight_model::{gateway::payload::incoming::MessageCreate, guild::Permissions};

use crate::CommandMeta;
use crate::embeds::{
    batch_summary_embed, guild_only_message, permission_denied_message, usage_message,
};
use sentinel_core::Context;
use sentinel_utils::batch::{
    BatchError, MemberSnapshot, Target, classify_http_failure, run_batch,
};
use sentinel_utils::members::fetch_guild_members;
use sentinel_utils::permissions::has_permission;

pub const META: CommandMeta = CommandMeta {
    name: "bulksend",
    desc: "DM every targeted member of this server.",
    category: "bulk",
    usage: "!bulksend <everyone|@role> <message>",
};

const DELIVERY_REFUSED: &str = "Missing permission or the member does not accept DMs.";

/// Send a direct message to every member inside the target.
///
/// Bots and the invoking operator are always excluded.
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

    if !has_permission(http, &msg, Permissions::ADMINISTRATOR).await? {
        http.create_message(msg.channel_id)
            .content(permission_denied_message())
            .await?;
        return Ok(());
    }

    let (Some(raw_target), Some(content)) = (arg1, arg_tail) else {
        let usage = usage_message(META.usage);
        http.create_message(msg.channel_id).content(&usage).await?;
        return Ok(());
    };

    let Some(target) = Target::parse(raw_target) else {
        http.create_message(msg.channel_id)
            .content("Target must be `everyone` or a role.")
            .await?;
        return Ok(());
    };

    let members = fetch_guild_members(http, guild_id).await?;
    let snapshot: Vec<MemberSnapshot> = members.iter().map(MemberSnapshot::from).collect();

    let author_id = msg.author.id;
    let failures = run_batch(
        &snapshot,
        |member| !member.bot && member.user_id != author_id && target.includes(&member.roles),
        |member| {
            let http = Arc::clone(&ctx.http);
            let content = content.to_owned();
            async move {
                let channel = http
                    .create_private_channel(member.user_id)
                    .await
                    .map_err(|source| classify_http_failure(source, DELIVERY_REFUSED))?
                    .model()
                    .await
                    .map_err(|source| BatchError::Other(source.to_string()))?;

                http.create_message(channel.id)
                    .content(&content)
                    .await
                    .map_err(|source| classify_http_failure(source, DELIVERY_REFUSED))?;

                Ok(())
            }
        },
    )
    .await;

    let embed = batch_summary_embed("Bulk message delivery finished.", "delivery", &failures)?;
    http.create_message(msg.channel_id).embeds(&[embed]).await?;

    Ok(())
}
