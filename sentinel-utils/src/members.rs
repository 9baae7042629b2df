//! Paginated enumeration of guilds and members over REST.

use twilight_http::Client;
use twilight_model::guild::Member;
use twilight_model::id::{
    Id,
    marker::{GuildMarker, UserMarker},
};
use twilight_model::user::CurrentUserGuild;

const MEMBER_PAGE: u16 = 1000;
const GUILD_PAGE: u16 = 200;

/// Fetch the full member list of a guild, one page at a time.
///
/// The result is the live snapshot batch operations iterate; it is not
/// refreshed while a batch runs.
pub async fn fetch_guild_members(
    http: &Client,
    guild_id: Id<GuildMarker>,
) -> anyhow::Result<Vec<Member>> {
    let mut members: Vec<Member> = Vec::new();
    let mut after: Option<Id<UserMarker>> = None;

    loop {
        let request = http.guild_members(guild_id).limit(MEMBER_PAGE);
        let request = match after {
            Some(after_id) => request.after(after_id),
            None => request,
        };

        let page = request.await?.models().await?;
        let full_page = page.len() == usize::from(MEMBER_PAGE);
        after = page.last().map(|member| member.user.id);
        members.extend(page);

        if !full_page {
            break;
        }
    }

    Ok(members)
}

/// Fetch every guild the bot is currently part of.
pub async fn fetch_current_guilds(http: &Client) -> anyhow::Result<Vec<CurrentUserGuild>> {
    let mut guilds: Vec<CurrentUserGuild> = Vec::new();
    let mut after: Option<Id<GuildMarker>> = None;

    loop {
        let request = http.current_user_guilds().limit(GUILD_PAGE);
        let request = match after {
            Some(after_id) => request.after(after_id),
            None => request,
        };

        let page = request.await?.models().await?;
        let full_page = page.len() == usize::from(GUILD_PAGE);
        after = page.last().map(|guild| guild.id);
        guilds.extend(page);

        if !full_page {
            break;
        }
    }

    Ok(guilds)
}
