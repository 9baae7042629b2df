use twilight_http::Client;
use twilight_model::channel::message::embed::Embed;
use twilight_model::id::{Id, marker::UserMarker};
use twilight_util::builder::embed::{
    EmbedAuthorBuilder, EmbedBuilder, EmbedFieldBuilder, ImageSource,
};

use sentinel_utils::batch::BatchFailure;
use sentinel_utils::embed::DEFAULT_EMBED_COLOR;

/// How many failures a summary embed spells out before truncating.
const FAILURE_DETAIL_LIMIT: usize = 15;

/// Display identity of a moderation target.
#[derive(Clone, Debug)]
pub struct TargetProfile {
    pub display_name: String,
    pub avatar_url: Option<String>,
}

impl TargetProfile {
    fn fallback(user_id: Id<UserMarker>) -> Self {
        Self {
            display_name: format!("User {}", user_id.get()),
            avatar_url: None,
        }
    }
}

/// Resolve a moderation target's profile for display in embeds.
///
/// Lookup failures fall back to a numeric placeholder name.
pub async fn fetch_target_profile(http: &Client, user_id: Id<UserMarker>) -> TargetProfile {
    let response = match http.user(user_id).await {
        Ok(response) => response,
        Err(_) => return TargetProfile::fallback(user_id),
    };
    let user = match response.model().await {
        Ok(user) => user,
        Err(_) => return TargetProfile::fallback(user_id),
    };

    let avatar_url = match user.avatar {
        Some(avatar) => format!(
            "https://cdn.discordapp.com/avatars/{}/{}.png?size=128",
            user_id.get(),
            avatar
        ),
        None => format!(
            "https://cdn.discordapp.com/embed/avatars/{}.png",
            (user_id.get() >> 22) % 6
        ),
    };

    TargetProfile {
        display_name: user.global_name.unwrap_or(user.name),
        avatar_url: Some(avatar_url),
    }
}

/// Build a moderation action-result embed.
pub fn moderation_action_embed(
    target_profile: &TargetProfile,
    target_user_id: Id<UserMarker>,
    action_past_tense: &str,
    reason: Option<&str>,
) -> anyhow::Result<Embed> {
    let reason = neutralize_mentions(reason.unwrap_or("No reason provided"));
    let description = format!("Target: <@{}>\nReason: {}", target_user_id.get(), reason);

    let builder = EmbedBuilder::new()
        .color(DEFAULT_EMBED_COLOR)
        .description(description);
    let title = format!(
        "{} has been {}",
        target_profile.display_name, action_past_tense
    );

    let builder = match target_profile.avatar_url.as_deref() {
        Some(url) => {
            let icon = ImageSource::url(url.to_owned())?;
            builder.author(EmbedAuthorBuilder::new(title).icon_url(icon).build())
        }
        None => builder.title(title),
    };

    Ok(builder.validate()?.build())
}

/// Build the aggregate report every batch operation ends with.
///
/// An empty failure list is reported explicitly; a long one is truncated
/// with a count of what was left out.
pub fn batch_summary_embed(
    title: &str,
    action_label: &str,
    failures: &[BatchFailure],
) -> anyhow::Result<Embed> {
    let field_name = format!("Members that failed {action_label}");

    let field_value = if failures.is_empty() {
        format!("No member failed {action_label}.")
    } else {
        let mut lines: Vec<String> = failures
            .iter()
            .take(FAILURE_DETAIL_LIMIT)
            .map(|failure| {
                format!(
                    "<@{}>: {}",
                    failure.user_id.get(),
                    neutralize_mentions(&failure.reason)
                )
            })
            .collect();

        if failures.len() > FAILURE_DETAIL_LIMIT {
            lines.push(format!(
                "and {} more.",
                failures.len() - FAILURE_DETAIL_LIMIT
            ));
        }

        lines.join("\n")
    };

    let embed = EmbedBuilder::new()
        .color(DEFAULT_EMBED_COLOR)
        .title(title)
        .field(EmbedFieldBuilder::new(field_name, field_value).build())
        .validate()?
        .build();

    Ok(embed)
}

/// Break `@` sequences so stored text cannot ping anyone.
pub fn neutralize_mentions(text: &str) -> String {
    text.replace('@', "@\u{200B}")
}

pub fn usage_message(usage: &str) -> String {
    format!("Usage: `{usage}`")
}

pub fn guild_only_message() -> &'static str {
    "This command only works in servers."
}

pub fn permission_denied_message() -> &'static str {
    "You are not permitted to use this command."
}

pub fn owner_only_message() -> &'static str {
    "Only the bot owner can use this command."
}
