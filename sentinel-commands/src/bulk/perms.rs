use twilight_model::{gateway::payload::incoming::MessageCreate, guild::Permissions};

use tracing::error;

use crate::CommandMeta;
use crate::embeds::{guild_only_message, permission_denied_message, usage_message};
use sentinel_core::Context;
use sentinel_utils::parse::parse_role_id;
use sentinel_utils::permissions::has_permission;

pub const META: CommandMeta = CommandMeta {
    name: "roleperms",
    desc: "Set a role's permissions to everything or nothing.",
    category: "bulk",
    usage: "!roleperms <add|remove> <role>",
};

/// Flip a role's whole permission set in one edit.
///
/// `add` grants every permission, `remove` strips them all. There is no
/// member loop here; the platform applies the role edit.
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

    if !has_permission(http, &msg, Permissions::MANAGE_ROLES).await? {
        http.create_message(msg.channel_id)
            .content(permission_denied_message())
            .await?;
        return Ok(());
    }

    let (Some(raw_mode), Some(raw_role)) = (arg1, arg_tail) else {
        let usage = usage_message(META.usage);
        http.create_message(msg.channel_id).content(&usage).await?;
        return Ok(());
    };

    let permissions = match raw_mode.to_ascii_lowercase().as_str() {
        "add" => Permissions::all(),
        "remove" => Permissions::empty(),
        _ => {
            http.create_message(msg.channel_id)
                .content("Mode must be `add` or `remove`.")
                .await?;
            return Ok(());
        }
    };

    let Some(role_id) = parse_role_id(raw_role) else {
        let usage = usage_message(META.usage);
        http.create_message(msg.channel_id).content(&usage).await?;
        return Ok(());
    };

    if let Err(source) = http
        .update_role(guild_id, role_id)
        .permissions(permissions)
        .await
    {
        error!(?source, "role permission edit failed");
        http.create_message(msg.channel_id)
            .content("I couldn't edit that role. Check role hierarchy and permissions.")
            .await?;
        return Ok(());
    }

    http.create_message(msg.channel_id)
        .content("Role permissions updated.")
        .await?;

    Ok(())
}
