//! Redis-backed [`KvStore`].

use super::{KvStore, StoreError};
use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;

/// Durable store backed by a Redis server.
///
/// Holds one managed multiplexed connection for the life of the process.
/// Each operation works on a clone of it; the manager reconnects on its own
/// after the server drops the link.
#[derive(Clone)]
pub struct RedisStore {
    con: ConnectionManager,
}

impl RedisStore {
    /// Open the shared connection and verify the server answers `PING`.
    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        let client = redis::Client::open(url)?;
        let mut con = ConnectionManager::new(client).await?;
        let _pong: String = redis::cmd("PING").query_async(&mut con).await?;
        Ok(Self { con })
    }
}

#[async_trait]
impl KvStore for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let mut con = self.con.clone();
        let value: Option<String> = con.get(key).await?;
        Ok(value)
    }

    async fn put(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut con = self.con.clone();
        con.set::<_, _, ()>(key, value).await?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        let mut con = self.con.clone();
        con.del::<_, ()>(key).await?;
        Ok(())
    }

    async fn incr(&self, key: &str, ttl_secs: u64) -> Result<u64, StoreError> {
        let mut con = self.con.clone();
        let count: u64 = con.incr(key, 1).await?;

        // Start the window on the first hit
        if count == 1 {
            con.expire::<_, ()>(key, ttl_secs as i64).await?;
        }

        Ok(count)
    }
}
