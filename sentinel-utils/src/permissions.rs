use twilight_http::Client;
use twilight_model::gateway::payload::incoming::MessageCreate;
use twilight_model::guild::Permissions;

/// Resolve the invoking author's effective guild permissions.
///
/// Prefers the permissions the gateway already attached to the message
/// member; otherwise unions the author's role permissions over REST.
/// Returns `Ok(None)` outside a guild context.
pub async fn effective_permissions(
    http: &Client,
    msg: &MessageCreate,
) -> anyhow::Result<Option<Permissions>> {
    if let Some(perms) = msg.member.as_ref().and_then(|member| member.permissions) {
        return Ok(Some(perms));
    }

    let Some(guild_id) = msg.guild_id else {
        return Ok(None);
    };

    let member = http
        .guild_member(guild_id, msg.author.id)
        .await?
        .model()
        .await?;
    let roles = http.roles(guild_id).await?.models().await?;

    // The @everyone role shares the guild's ID.
    let resolved = roles
        .into_iter()
        .filter(|role| role.id == guild_id.cast() || member.roles.contains(&role.id))
        .fold(Permissions::empty(), |acc, role| acc | role.permissions);

    Ok(Some(resolved))
}

/// Check whether the message author holds a required permission.
///
/// Administrators always pass; outside a guild context this is `false`.
pub async fn has_permission(
    http: &Client,
    msg: &MessageCreate,
    required: Permissions,
) -> anyhow::Result<bool> {
    let Some(perms) = effective_permissions(http, msg).await? else {
        return Ok(false);
    };

    Ok(perms.contains(Permissions::ADMINISTRATOR) || perms.contains(required))
}
