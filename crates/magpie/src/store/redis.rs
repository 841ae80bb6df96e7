use anyhow::{Context, Result};
use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;
use tracing::debug;

use super::Store;

/// Store backed by a Redis server.
///
/// Holds one multiplexed connection opened at startup; each call clones the
/// handle, which shares the underlying socket.
pub struct RedisStore {
    conn: MultiplexedConnection,
}

impl RedisStore {
    pub async fn connect(url: &str) -> Result<Self> {
        let client = redis::Client::open(url).context("invalid store URL")?;
        let conn = client
            .get_multiplexed_async_connection()
            .await
            .context("failed to connect to the store")?;
        debug!(url, "connected to store");
        Ok(Self { conn })
    }
}

#[async_trait]
impl Store for RedisStore {
    async fn keys(&self) -> Result<Vec<String>> {
        let mut conn = self.conn.clone();
        Ok(conn.keys("*").await?)
    }

    async fn key_type(&self, key: &str) -> Result<String> {
        let mut conn = self.conn.clone();
        Ok(redis::cmd("TYPE").arg(key).query_async(&mut conn).await?)
    }

    async fn hash_fields(&self, key: &str) -> Result<Vec<String>> {
        let mut conn = self.conn.clone();
        Ok(conn.hkeys(key).await?)
    }

    async fn hash_get(&self, key: &str, field: &str) -> Result<Option<String>> {
        let mut conn = self.conn.clone();
        Ok(conn.hget(key, field).await?)
    }

    async fn hash_get_all(&self, key: &str) -> Result<Vec<(String, String)>> {
        let mut conn = self.conn.clone();
        Ok(conn.hgetall(key).await?)
    }
}
