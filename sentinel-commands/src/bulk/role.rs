use std::sync::Arc;

use twilight_model::{gateway::payload::incoming::MessageCreate, guild::Permissions};

use crate::CommandMeta;
use crate::embeds::{
    batch_summary_embed, guild_only_message, permission_denied_message, usage_message,
};
use sentinel_core::Context;
use sentinel_utils::batch::{MemberSnapshot, Target, classify_http_failure, run_batch};
use sentinel_utils::members::fetch_guild_members;
use sentinel_utils::parse::parse_role_id;
use sentinel_utils::permissions::has_permission;

pub const META: CommandMeta = CommandMeta {
    name: "bulkrole",
    desc: "Grant or revoke a role on every targeted member.",
    category: "bulk",
    usage: "!bulkrole <add|remove> <everyone|@role> <role>",
};

const ROLE_EDIT_REFUSED: &str = "Missing permission to edit this member's roles.";

/// Which way the whole run mutates membership. Fixed before the loop.
#[derive(Clone, Copy)]
enum RoleMode {
    Add,
    Remove,
}

impl RoleMode {
    fn parse(raw: &str) -> Option<Self> {
        match raw.to_ascii_lowercase().as_str() {
            "add" => Some(Self::Add),
            "remove" => Some(Self::Remove),
            _ => None,
        }
    }
}

/// Add or remove a role on every member inside the target.
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

    // arg_tail still holds two tokens: the target and the role to edit.
    let rest = arg_tail.map(|value| {
        let mut parts = value.splitn(2, char::is_whitespace);
        (parts.next(), parts.next().map(str::trim))
    });

    let (Some(raw_mode), Some((Some(raw_target), Some(raw_role)))) = (arg1, rest) else {
        let usage = usage_message(META.usage);
        http.create_message(msg.channel_id).content(&usage).await?;
        return Ok(());
    };

    let Some(mode) = RoleMode::parse(raw_mode) else {
        http.create_message(msg.channel_id)
            .content("Mode must be `add` or `remove`.")
            .await?;
        return Ok(());
    };

    let Some(target) = Target::parse(raw_target) else {
        http.create_message(msg.channel_id)
            .content("Target must be `everyone` or a role.")
            .await?;
        return Ok(());
    };

    let Some(role_id) = parse_role_id(raw_role) else {
        let usage = usage_message(META.usage);
        http.create_message(msg.channel_id).content(&usage).await?;
        return Ok(());
    };

    let members = fetch_guild_members(http, guild_id).await?;
    let snapshot: Vec<MemberSnapshot> = members.iter().map(MemberSnapshot::from).collect();

    let failures = run_batch(
        &snapshot,
        |member| !member.bot && target.includes(&member.roles),
        |member| {
            let http = Arc::clone(&ctx.http);
            async move {
                let result = match mode {
                    RoleMode::Add => {
                        http.add_guild_member_role(guild_id, member.user_id, role_id)
                            .await
                    }
                    RoleMode::Remove => {
                        http.remove_guild_member_role(guild_id, member.user_id, role_id)
                            .await
                    }
                };

                result
                    .map(|_| ())
                    .map_err(|source| classify_http_failure(source, ROLE_EDIT_REFUSED))
            }
        },
    )
    .await;

    let (title, action_label) = match mode {
        RoleMode::Add => ("Bulk role grant finished.", "the role grant"),
        RoleMode::Remove => ("Bulk role removal finished.", "the role removal"),
    };
    let embed = batch_summary_embed(title, action_label, &failures)?;
    http.create_message(msg.channel_id).embeds(&[embed]).await?;

    Ok(())
}
