use twilight_model::{gateway::payload::incoming::MessageCreate, guild::Permissions};

use crate::CommandMeta;
use crate::embeds::{guild_only_message, permission_denied_message};
use sentinel_core::Context;
use sentinel_database::gban;
use sentinel_utils::permissions::has_permission;

pub const META: CommandMeta = CommandMeta {
    name: "gbanstat",
    desc: "Toggle denylist enforcement for this server.",
    category: "gban",
    usage: "!gbanstat",
};

/// Flip this guild's enforcement flag.
///
/// Enforcement is on by default; running the command twice restores the
/// original state.
pub async fn run(ctx: Context, msg: Box<MessageCreate>) -> anyhow::Result<()> {
    let http = &ctx.http;
    let Some(guild_id) = msg.guild_id else {
        http.create_message(msg.channel_id)
            .content(guild_only_message())
            .await?;
        return Ok(());
    };

    if !has_permission(http, &msg, Permissions::MANAGE_GUILD).await? {
        http.create_message(msg.channel_id)
            .content(permission_denied_message())
            .await?;
        return Ok(());
    }

    let enabled = gban::toggle_enforcement(&ctx.db, guild_id.get()).await?;

    let reply = if enabled {
        "Global denylist enforcement is now enabled for this server."
    } else {
        "Global denylist enforcement is now disabled for this server."
    };
    http.create_message(msg.channel_id).content(reply).await?;

    Ok(())
}
