/// Bulk member operations: mass DM and mass role edits.
pub mod bulk;
/// Shared reply and embed helpers.
pub mod embeds;
/// Global denylist commands and enforcement engine.
pub mod gban;
/// Single-target moderation commands.
pub mod moderation;
/// Channel-status command and refresher loop.
pub mod status;

use twilight_model::gateway::payload::incoming::MessageCreate;

use sentinel_core::Context;
use sentinel_utils::COMMAND_PREFIX;

// Global command meta data
pub struct CommandMeta {
    pub name: &'static str,
    pub desc: &'static str,
    pub category: &'static str,
    pub usage: &'static str,
}

pub async fn handle_message(ctx: Context, msg: Box<MessageCreate>) -> anyhow::Result<()> {
    if msg.author.bot {
        return Ok(());
    }

    let content_owned = msg.content.clone();
    let content = content_owned.trim();

    if !content.starts_with(COMMAND_PREFIX) {
        return Ok(());
    }

    let content = content.trim_start_matches(COMMAND_PREFIX).trim();
    let mut command_and_rest = content.splitn(2, char::is_whitespace);
    let cmd = command_and_rest.next().unwrap_or("").to_ascii_lowercase();
    let rest = command_and_rest
        .next()
        .map(str::trim)
        .filter(|value| !value.is_empty());

    let (arg1, arg_tail): (Option<String>, Option<String>) = match rest {
        Some(value) => {
            let mut args = value.splitn(2, char::is_whitespace);
            let first = args
                .next()
                .filter(|arg| !arg.is_empty())
                .map(ToOwned::to_owned);
            let tail = args
                .next()
                .map(str::trim)
                .filter(|remaining| !remaining.is_empty())
                .map(ToOwned::to_owned);

            (first, tail)
        }
        None => (None, None),
    };

    let arg1 = arg1.as_deref();
    let arg_tail = arg_tail.as_deref();

    match cmd.as_str() {
        "bulksend" => bulk::send::run(ctx.clone(), msg, arg1, arg_tail).await?,
        "bulkrole" => bulk::role::run(ctx.clone(), msg, arg1, arg_tail).await?,
        "roleperms" => bulk::perms::run(ctx.clone(), msg, arg1, arg_tail).await?,

        "status" => status::run(ctx.clone(), msg, arg1, arg_tail).await?,

        "gban" => gban::add::run(ctx.clone(), msg, arg1, arg_tail).await?,
        "ungban" => gban::remove::run(ctx.clone(), msg, arg1).await?,
        "gbanlist" => gban::list::run(ctx.clone(), msg).await?,
        "gbanstat" => gban::stat::run(ctx.clone(), msg).await?,

        "ban" => moderation::ban::run(ctx.clone(), msg, arg1, arg_tail).await?,
        "unban" => moderation::unban::run(ctx.clone(), msg, arg1, arg_tail).await?,
        // Add new commands here
        _ => {}
    }

    Ok(())
}
