//! Tracked channels and the templates rendered into their names.

use crate::{Database, StoreError};

/// One tracked channel. At most one entry exists per
/// `(guild_id, channel_id)` pair.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChannelStatusEntry {
    pub guild_id: u64,
    pub channel_id: u64,
    pub template: String,
}

/// Save the template for a channel, replacing any previous one.
pub async fn save(
    db: &Database,
    guild_id: u64,
    channel_id: u64,
    template: &str,
) -> Result<(), StoreError> {
    sqlx::query(
        r#"
        INSERT INTO channel_status (guild_id, channel_id, template) VALUES (?, ?, ?)
        ON CONFLICT(guild_id, channel_id) DO UPDATE SET template = excluded.template
        "#,
    )
    .bind(guild_id as i64)
    .bind(channel_id as i64)
    .bind(template)
    .execute(db.pool())
    .await?;

    Ok(())
}

/// Stop tracking a channel. Clearing an untracked channel is a no-op.
pub async fn clear(db: &Database, guild_id: u64, channel_id: u64) -> Result<(), StoreError> {
    sqlx::query("DELETE FROM channel_status WHERE guild_id = ? AND channel_id = ?")
        .bind(guild_id as i64)
        .bind(channel_id as i64)
        .execute(db.pool())
        .await?;

    Ok(())
}

/// Every tracked channel, across all guilds.
pub async fn entries(db: &Database) -> Result<Vec<ChannelStatusEntry>, StoreError> {
    let rows = sqlx::query_as::<_, (i64, i64, String)>(
        "SELECT guild_id, channel_id, template FROM channel_status",
    )
    .fetch_all(db.pool())
    .await?;

    Ok(rows
        .into_iter()
        .map(|(guild_id, channel_id, template)| ChannelStatusEntry {
            guild_id: guild_id as u64,
            channel_id: channel_id as u64,
            template,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::memory_db;

    #[tokio::test]
    async fn save_upserts_on_the_channel_pair() {
        let db = memory_db().await;

        save(&db, 1, 10, "Members: !mb!").await.unwrap();
        save(&db, 1, 10, "Users: !us!").await.unwrap();
        save(&db, 1, 11, "Bots: !bt!").await.unwrap();

        let mut all = entries(&db).await.unwrap();
        all.sort_by_key(|entry| entry.channel_id);

        assert_eq!(all.len(), 2);
        assert_eq!(all[0].template, "Users: !us!");
        assert_eq!(all[1].template, "Bots: !bt!");
    }

    #[tokio::test]
    async fn set_then_off_leaves_no_entry() {
        let db = memory_db().await;

        save(&db, 1, 10, "Members: !mb!").await.unwrap();
        clear(&db, 1, 10).await.unwrap();

        assert!(entries(&db).await.unwrap().is_empty());

        // Clearing again is harmless.
        clear(&db, 1, 10).await.unwrap();
    }
}
