//! # Snapshot Repository
//!
//! SQLite implementation of [`SnapshotStore`] over the `kv_store` table.
//!
//! ## Write Path
//! ```text
//! save("cart", json)
//!      │
//!      ▼
//! INSERT INTO kv_store (key, value, updated_at) VALUES (?1, ?2, ?3)
//! ON CONFLICT(key) DO UPDATE SET value = excluded.value, ...
//!      │
//!      ▼
//! One row per key; the whole snapshot is rewritten after every mutation
//! ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use crate::store::SnapshotStore;

/// Key-value store backed by SQLite.
#[derive(Debug, Clone)]
pub struct SqliteSnapshotStore {
    pool: SqlitePool,
}

impl SqliteSnapshotStore {
    /// Creates a new SqliteSnapshotStore.
    pub fn new(pool: SqlitePool) -> Self {
        SqliteSnapshotStore { pool }
    }

    /// Returns when `key` was last written, if ever.
    pub async fn updated_at(&self, key: &str) -> DbResult<Option<DateTime<Utc>>> {
        let updated_at: Option<DateTime<Utc>> =
            sqlx::query_scalar("SELECT updated_at FROM kv_store WHERE key = ?1")
                .bind(key)
                .fetch_optional(&self.pool)
                .await?;

        Ok(updated_at)
    }

    /// Counts stored keys.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM kv_store")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

#[async_trait]
impl SnapshotStore for SqliteSnapshotStore {
    async fn load(&self, key: &str) -> DbResult<Option<String>> {
        debug!(key = %key, "Loading snapshot");

        let value: Option<String> = sqlx::query_scalar("SELECT value FROM kv_store WHERE key = ?1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        Ok(value)
    }

    async fn save(&self, key: &str, value: &str) -> DbResult<()> {
        debug!(key = %key, bytes = value.len(), "Saving snapshot");

        sqlx::query(
            r#"
            INSERT INTO kv_store (key, value, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn remove(&self, key: &str) -> DbResult<()> {
        debug!(key = %key, "Removing snapshot");

        sqlx::query("DELETE FROM kv_store WHERE key = ?1")
            .bind(key)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    async fn store() -> SqliteSnapshotStore {
        Database::new(DbConfig::in_memory()).await.unwrap().snapshots()
    }

    #[tokio::test]
    async fn test_load_missing_key() {
        let store = store().await;
        assert_eq!(store.load("cart").await.unwrap(), None);
        assert_eq!(store.updated_at("cart").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_save_overwrites_single_row() {
        let store = store().await;

        store.save("cart", r#"[{"id":"w1"}]"#).await.unwrap();
        store.save("cart", "[]").await.unwrap();

        assert_eq!(store.load("cart").await.unwrap().as_deref(), Some("[]"));
        assert_eq!(store.count().await.unwrap(), 1);
        assert!(store.updated_at("cart").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_keys_are_independent() {
        let store = store().await;
        store.save("cart", "a").await.unwrap();
        store.save("wishlist", "b").await.unwrap();

        store.remove("cart").await.unwrap();
        store.remove("cart").await.unwrap();

        assert_eq!(store.load("cart").await.unwrap(), None);
        assert_eq!(store.load("wishlist").await.unwrap().as_deref(), Some("b"));
    }
}
