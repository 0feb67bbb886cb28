//! Expiring key-value facade over a [`Store`] handle.
//!
//! `put` writes the value and then issues the expiration as a separate,
//! unawaited command. The two steps are not atomic: readers may observe the
//! value before its expiration is attached, and if the expiration command is
//! lost the entry never expires.

use crate::storage::{
    types::{unix_now, Key, KeyRef, Timestamp, Value},
    Store,
};
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct ExpiringStore<S> {
    store: S,
}

impl<S> ExpiringStore<S>
where
    S: Store,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Writes `value` under `key` and schedules it to expire at `expire_at`.
    ///
    /// Returns once the write completes, without waiting for the expiration.
    pub async fn put(&self, key: Key, value: Value, expire_at: Timestamp) -> Result<(), S::Err> {
        debug!(key = %key, expire_at, "put");
        self.store.set(key.clone(), value).await?;
        self.store.expire_at(key, expire_at);
        Ok(())
    }

    /// Like [`put`](Self::put), expiring `ttl` from now.
    pub async fn put_for(&self, key: Key, value: Value, ttl: Duration) -> Result<(), S::Err> {
        self.put(key, value, unix_now().saturating_add(ttl.as_secs()))
            .await
    }

    pub async fn get(&self, key: KeyRef<'_>) -> Result<Option<Value>, S::Err> {
        debug!(key, "get");
        self.store.get(key).await
    }

    /// True only when the store reports exactly one matching key.
    pub async fn exists(&self, key: KeyRef<'_>) -> Result<bool, S::Err> {
        let count = self.store.exists(key).await?;
        debug!(key, count, "exists");
        Ok(count == 1)
    }

    pub async fn delete(&self, key: KeyRef<'_>) -> Result<(), S::Err> {
        debug!(key, "delete");
        self.store.del(key).await.map(drop)
    }
}
