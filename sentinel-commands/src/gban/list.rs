use twilight_model::gateway::payload::incoming::MessageCreate;
use twilight_util::builder::embed::EmbedBuilder;

use crate::CommandMeta;
use crate::embeds::neutralize_mentions;
use sentinel_core::Context;
use sentinel_database::gban;
use sentinel_utils::embed::DEFAULT_EMBED_COLOR;

pub const META: CommandMeta = CommandMeta {
    name: "gbanlist",
    desc: "Show the global denylist.",
    category: "gban",
    usage: "!gbanlist",
};

/// Entries shown per reply; the remainder is summarized.
const LIST_LIMIT: usize = 25;

/// Show every denylist entry, in storage order.
pub async fn run(ctx: Context, msg: Box<MessageCreate>) -> anyhow::Result<()> {
    let http = &ctx.http;
    let entries = gban::entries(&ctx.db).await?;

    if entries.is_empty() {
        http.create_message(msg.channel_id)
            .content("The global denylist is empty.")
            .await?;
        return Ok(());
    }

    let mut lines: Vec<String> = entries
        .iter()
        .take(LIST_LIMIT)
        .map(|entry| {
            format!(
                "<@{}> (`{}`): {}",
                entry.user_id,
                entry.user_id,
                neutralize_mentions(&entry.reason)
            )
        })
        .collect();

    if entries.len() > LIST_LIMIT {
        lines.push(format!("and {} more.", entries.len() - LIST_LIMIT));
    }

    let embed = EmbedBuilder::new()
        .color(DEFAULT_EMBED_COLOR)
        .title(format!("Global denylist ({} entries)", entries.len()))
        .description(lines.join("\n"))
        .validate()?
        .build();

    http.create_message(msg.channel_id).embeds(&[embed]).await?;

    Ok(())
}
