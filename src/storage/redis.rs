//! Key-value storage backed by a Redis server.

use super::types::{Count, Key, KeyRef, Timestamp, Value};
use async_trait::async_trait;
use redis::{aio::MultiplexedConnection, AsyncCommands, Client, RedisResult};
use tracing::{debug, warn, Level};
use tracing_futures::Instrument;

#[derive(Clone)]
pub struct Store {
    conn: MultiplexedConnection,
}

impl Store {
    pub async fn connect(url: &str) -> RedisResult<Self> {
        let client = Client::open(url)?;
        let conn = client.get_multiplexed_async_connection().await?;
        Ok(Self { conn })
    }
}

#[async_trait]
impl super::Store for Store {
    type Err = redis::RedisError;

    async fn set(&self, key: Key, value: Value) -> Result<(), Self::Err> {
        let mut conn = self.conn.clone();
        conn.set(key, value).await
    }

    async fn get<'k>(&self, key: KeyRef<'k>) -> Result<Option<Value>, Self::Err> {
        let mut conn = self.conn.clone();
        conn.get(key).await
    }

    async fn exists<'k>(&self, key: KeyRef<'k>) -> Result<Count, Self::Err> {
        let mut conn = self.conn.clone();
        conn.exists(key).await
    }

    async fn del<'k>(&self, key: KeyRef<'k>) -> Result<Count, Self::Err> {
        let mut conn = self.conn.clone();
        conn.del(key).await
    }

    fn expire_at(&self, key: Key, at: Timestamp) {
        let mut conn = self.conn.clone();
        let span = tracing::span!(Level::DEBUG, "expire_at", key = %key, at);

        tokio::spawn(
            async move {
                let res: RedisResult<Count> = redis::cmd("EXPIREAT")
                    .arg(&key)
                    .arg(at)
                    .query_async(&mut conn)
                    .await;

                match res {
                    Ok(1) => debug!("expiration applied"),
                    Ok(_) => warn!("key vanished before expiration was applied"),
                    Err(e) => warn!(reason = %e, "expiration not applied"),
                }
            }
            .instrument(span),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{types::unix_now, Store as _};
    use std::time::Duration;

    async fn connect() -> Store {
        let url = std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1:6379".into());
        Store::connect(&url).await.unwrap()
    }

    #[tokio::test]
    #[ignore = "requires a running redis server"]
    async fn round_trips_value_and_expiration() {
        // Pre-condition.
        let store = connect().await;
        let key = format!("expiring-kv:test:{}", unix_now());
        store.set(key.clone(), "value".into()).await.unwrap();

        // Action.
        store.expire_at(key.clone(), unix_now() + 60);
        tokio::time::sleep(Duration::from_millis(100)).await;

        // Post-condition.
        assert_eq!(store.get(&key).await.unwrap(), Some("value".into()));
        assert_eq!(store.exists(&key).await.unwrap(), 1);
        assert_eq!(store.del(&key).await.unwrap(), 1);
        assert_eq!(store.exists(&key).await.unwrap(), 0);
    }

    #[tokio::test]
    #[ignore = "requires a running redis server"]
    async fn expiration_in_the_past_removes_key() {
        // Pre-condition.
        let store = connect().await;
        let key = format!("expiring-kv:past:{}", unix_now());
        store.set(key.clone(), "value".into()).await.unwrap();

        // Action.
        store.expire_at(key.clone(), unix_now() - 1);
        tokio::time::sleep(Duration::from_millis(100)).await;

        // Post-condition.
        assert_eq!(store.get(&key).await.unwrap(), None);
    }
}
