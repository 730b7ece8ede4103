//! Key-value storage layer for pages and display settings.
//!
//! The backing store is a flat string-to-string map with no multi-key
//! transactions. Everything above it (`pages`, `settings`) is written against
//! the [`KvStore`] trait so the durable Redis backend and the in-memory
//! backend are interchangeable.
//!
//! Key namespace:
//! - `pages:list` — comma-joined page ids, in display order
//! - `note:{id}` — page content
//! - `title:{id}` — page title, written once at creation
//! - `bg:pc`, `bg:mobile` — background image URLs
//! - `opacity:{card|article|sidebar|editor}` — string-encoded floats
//! - `ratelimit:login:{ip}` — login attempt counters, expiring

pub mod memory;
pub mod pages;
pub mod redis_store;
pub mod settings;

pub use memory::MemoryStore;
pub use pages::{Page, PageList, PageStore, DEFAULT_PAGE_ID};
pub use redis_store::RedisStore;
pub use settings::{BackgroundImages, BackgroundKey, OpacityKey, OpacitySettings, SettingsStore};

use async_trait::async_trait;

/// Errors raised by a storage backend.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Redis error: {0}")]
    Redis(#[from] ::redis::RedisError),
}

/// Asynchronous string key-value map.
///
/// Each call is atomic for its own key only. Deleting an absent key is not
/// an error.
#[async_trait]
pub trait KvStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    async fn put(&self, key: &str, value: &str) -> Result<(), StoreError>;

    async fn delete(&self, key: &str) -> Result<(), StoreError>;

    /// Increment a counter and return its new value.
    ///
    /// The first increment starts a `ttl_secs` window after which the key
    /// disappears and counting starts over.
    async fn incr(&self, key: &str, ttl_secs: u64) -> Result<u64, StoreError>;
}
