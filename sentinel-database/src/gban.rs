//! Global denylist operations.
//!
//! The denylist is one global table shared by every guild; per-guild
//! enforcement is a boolean projection over it, stored as an opt-out row.
//! Absence of an opt-out row means enforcement is on.

use crate::{Database, StoreError};

/// One denylist entry: a user the bot bans on sight.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GbanEntry {
    pub user_id: u64,
    pub reason: String,
}

/// Add a user to the global denylist.
///
/// Adding an already-listed user refreshes the stored reason; there is
/// never more than one entry per user.
pub async fn add_entry(db: &Database, user_id: u64, reason: &str) -> Result<(), StoreError> {
    sqlx::query(
        r#"
        INSERT INTO gban (user_id, reason) VALUES (?, ?)
        ON CONFLICT(user_id) DO UPDATE SET reason = excluded.reason
        "#,
    )
    .bind(user_id as i64)
    .bind(reason)
    .execute(db.pool())
    .await?;

    Ok(())
}

/// Remove a user from the global denylist.
///
/// Fails with [`StoreError::NotDenied`] when no entry exists.
pub async fn remove_entry(db: &Database, user_id: u64) -> Result<(), StoreError> {
    let result = sqlx::query("DELETE FROM gban WHERE user_id = ?")
        .bind(user_id as i64)
        .execute(db.pool())
        .await?;

    if result.rows_affected() == 0 {
        return Err(StoreError::NotDenied(user_id));
    }

    Ok(())
}

/// Look up the stored ban reason for a user.
pub async fn entry_reason(db: &Database, user_id: u64) -> Result<Option<String>, StoreError> {
    let row = sqlx::query_as::<_, (String,)>("SELECT reason FROM gban WHERE user_id = ?")
        .bind(user_id as i64)
        .fetch_optional(db.pool())
        .await?;

    Ok(row.map(|(reason,)| reason))
}

/// All denylist entries, in storage order.
pub async fn entries(db: &Database) -> Result<Vec<GbanEntry>, StoreError> {
    let rows = sqlx::query_as::<_, (i64, String)>("SELECT user_id, reason FROM gban")
        .fetch_all(db.pool())
        .await?;

    Ok(rows
        .into_iter()
        .map(|(user_id, reason)| GbanEntry {
            user_id: user_id as u64,
            reason,
        })
        .collect())
}

/// Whether join-time enforcement is enabled for a guild.
pub async fn enforcement_enabled(db: &Database, guild_id: u64) -> Result<bool, StoreError> {
    let row = sqlx::query_as::<_, (i64,)>("SELECT guild_id FROM gban_opt_out WHERE guild_id = ?")
        .bind(guild_id as i64)
        .fetch_optional(db.pool())
        .await?;

    Ok(row.is_none())
}

/// Enable or disable enforcement for a guild.
///
/// Both directions are single conditional statements, so repeated calls
/// with the same value are no-ops.
pub async fn set_enforcement(db: &Database, guild_id: u64, enabled: bool) -> Result<(), StoreError> {
    if enabled {
        sqlx::query("DELETE FROM gban_opt_out WHERE guild_id = ?")
            .bind(guild_id as i64)
            .execute(db.pool())
            .await?;
    } else {
        sqlx::query("INSERT OR IGNORE INTO gban_opt_out (guild_id) VALUES (?)")
            .bind(guild_id as i64)
            .execute(db.pool())
            .await?;
    }

    Ok(())
}

/// Flip enforcement for a guild and return the new state.
pub async fn toggle_enforcement(db: &Database, guild_id: u64) -> Result<bool, StoreError> {
    let enabled = enforcement_enabled(db, guild_id).await?;
    set_enforcement(db, guild_id, !enabled).await?;
    Ok(!enabled)
}

/// The reason a joining user must be banned with, when enforcement applies.
///
/// `None` when the guild has opted out or the user is not denylisted.
pub async fn join_verdict(
    db: &Database,
    guild_id: u64,
    user_id: u64,
) -> Result<Option<String>, StoreError> {
    if !enforcement_enabled(db, guild_id).await? {
        return Ok(None);
    }

    entry_reason(db, user_id).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::memory_db;

    #[tokio::test]
    async fn add_is_an_upsert() {
        let db = memory_db().await;

        add_entry(&db, 11, "spam").await.unwrap();
        add_entry(&db, 11, "raiding").await.unwrap();

        let all = entries(&db).await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].user_id, 11);
        assert_eq!(all[0].reason, "raiding");
    }

    #[tokio::test]
    async fn remove_absent_entry_is_a_domain_error() {
        let db = memory_db().await;

        let err = remove_entry(&db, 42).await.unwrap_err();
        assert!(matches!(err, StoreError::NotDenied(42)));

        // A present entry removes cleanly and only once.
        add_entry(&db, 42, "spam").await.unwrap();
        remove_entry(&db, 42).await.unwrap();
        assert!(matches!(
            remove_entry(&db, 42).await.unwrap_err(),
            StoreError::NotDenied(42)
        ));
    }

    #[tokio::test]
    async fn join_verdict_respects_the_opt_out() {
        let db = memory_db().await;
        add_entry(&db, 7, "ban evasion").await.unwrap();

        let verdict = join_verdict(&db, 100, 7).await.unwrap();
        assert_eq!(verdict.as_deref(), Some("ban evasion"));

        set_enforcement(&db, 100, false).await.unwrap();
        assert_eq!(join_verdict(&db, 100, 7).await.unwrap(), None);

        // Another guild is unaffected by the opt-out.
        assert_eq!(
            join_verdict(&db, 200, 7).await.unwrap().as_deref(),
            Some("ban evasion")
        );

        // A user who is not listed never produces a verdict.
        assert_eq!(join_verdict(&db, 200, 8).await.unwrap(), None);
    }

    #[tokio::test]
    async fn toggle_is_its_own_inverse() {
        let db = memory_db().await;

        assert!(enforcement_enabled(&db, 5).await.unwrap());

        assert!(!toggle_enforcement(&db, 5).await.unwrap());
        assert!(!enforcement_enabled(&db, 5).await.unwrap());

        assert!(toggle_enforcement(&db, 5).await.unwrap());
        assert!(enforcement_enabled(&db, 5).await.unwrap());
    }

    #[tokio::test]
    async fn set_enforcement_is_idempotent() {
        let db = memory_db().await;

        set_enforcement(&db, 9, false).await.unwrap();
        set_enforcement(&db, 9, false).await.unwrap();
        assert!(!enforcement_enabled(&db, 9).await.unwrap());

        set_enforcement(&db, 9, true).await.unwrap();
        set_enforcement(&db, 9, true).await.unwrap();
        assert!(enforcement_enabled(&db, 9).await.unwrap());
    }
}
