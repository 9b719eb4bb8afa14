//! # Repository Module
//!
//! SQLite-backed repositories.
//!
//! ```text
//! CartStore
//!      │  store.save("cart", json)
//!      ▼
//! SqliteSnapshotStore
//! ├── load(&self, key)
//! ├── save(&self, key, value)   (upsert)
//! └── remove(&self, key)
//!      │  SQL
//!      ▼
//! kv_store table
//! ```

pub mod snapshot;
