//! # Snapshot Store
//!
//! The storage seam the cart store writes through: a string-keyed slot of
//! opaque string values, the same shape as a browser's `localStorage`.
//!
//! | Implementation          | Backing           | Used by                 |
//! |-------------------------|-------------------|-------------------------|
//! | `SqliteSnapshotStore`   | `kv_store` table  | the storefront binary   |
//! | `MemorySnapshotStore`   | `HashMap`         | tests, `--ephemeral`    |

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

use crate::error::{DbError, DbResult};

/// A durable key-value slot.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Reads the value under `key`, `None` if never written.
    async fn load(&self, key: &str) -> DbResult<Option<String>>;

    /// Writes `value` under `key`, replacing any previous value.
    async fn save(&self, key: &str, value: &str) -> DbResult<()>;

    /// Deletes `key`. Deleting a missing key is not an error.
    async fn remove(&self, key: &str) -> DbResult<()>;
}

/// In-memory store.
///
/// Writes can be switched off to exercise the persistence-failure path.
#[derive(Debug, Default)]
pub struct MemorySnapshotStore {
    entries: Mutex<HashMap<String, String>>,
    reject_writes: AtomicBool,
}

impl MemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-seeded with one entry.
    pub fn with_entry(key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut entries = HashMap::new();
        entries.insert(key.into(), value.into());
        MemorySnapshotStore {
            entries: Mutex::new(entries),
            reject_writes: AtomicBool::new(false),
        }
    }

    /// Makes every subsequent `save` / `remove` fail (or succeed again).
    pub fn set_reject_writes(&self, reject: bool) {
        self.reject_writes.store(reject, Ordering::SeqCst);
    }

    fn check_writable(&self) -> DbResult<()> {
        if self.reject_writes.load(Ordering::SeqCst) {
            return Err(DbError::Unavailable("writes are disabled".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl SnapshotStore for MemorySnapshotStore {
    async fn load(&self, key: &str) -> DbResult<Option<String>> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn save(&self, key: &str, value: &str) -> DbResult<()> {
        self.check_writable()?;
        debug!(key = %key, bytes = value.len(), "Saving snapshot in memory");
        self.entries
            .lock()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> DbResult<()> {
        self.check_writable()?;
        self.entries.lock().await.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_store_round_trip() {
        let store = MemorySnapshotStore::new();
        assert_eq!(store.load("cart").await.unwrap(), None);

        store.save("cart", "[]").await.unwrap();
        assert_eq!(store.load("cart").await.unwrap().as_deref(), Some("[]"));

        store.remove("cart").await.unwrap();
        assert_eq!(store.load("cart").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_rejected_writes_keep_previous_value() {
        let store = MemorySnapshotStore::with_entry("cart", "old");
        store.set_reject_writes(true);

        let err = store.save("cart", "new").await.unwrap_err();
        assert!(matches!(err, DbError::Unavailable(_)));
        assert_eq!(store.load("cart").await.unwrap().as_deref(), Some("old"));
    }
}
