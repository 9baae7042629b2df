use sqlx::SqlitePool;
use thiserror::Error;

/// Per-channel live-status templates.
pub mod channel_status;
/// Global denylist and per-guild enforcement opt-out.
pub mod gban;

/// Errors from the sentinel stores.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    /// Removing a denylist entry that does not exist.
    #[error("user {0} is not on the global denylist")]
    NotDenied(u64),
}

/// Shared database handle passed across crates.
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Create a database handle from an existing pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Expose the underlying pool for query modules.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Create the schema when it does not exist yet.
    pub async fn init(&self) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS channel_status (
                guild_id INTEGER NOT NULL,
                channel_id INTEGER NOT NULL,
                template TEXT NOT NULL,
                PRIMARY KEY (guild_id, channel_id)
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS gban (
                user_id INTEGER PRIMARY KEY NOT NULL,
                reason TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS gban_opt_out (
                guild_id INTEGER PRIMARY KEY NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use sqlx::sqlite::SqlitePoolOptions;

    use super::Database;

    /// Fresh in-memory store with the full schema applied.
    ///
    /// A single connection keeps every statement on the same in-memory
    /// database.
    pub async fn memory_db() -> Database {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("in-memory pool");

        let db = Database::new(pool);
        db.init().await.expect("schema init");
        db
    }
}
