use self::types::{Count, Key, KeyRef, Timestamp, Value};
use async_trait::async_trait;

pub mod inmemory;
pub mod redis;
pub mod types;

/// Handle to a key-value backend that owns entries and enforces their expiration.
#[async_trait]
pub trait Store {
    type Err;

    /// Writes `value` under `key`, replacing any previous value and expiration.
    async fn set(&self, key: Key, value: Value) -> Result<(), Self::Err>;

    async fn get<'k>(&self, key: KeyRef<'k>) -> Result<Option<Value>, Self::Err>;

    /// Number of live keys matching `key`.
    async fn exists<'k>(&self, key: KeyRef<'k>) -> Result<Count, Self::Err>;

    /// Removes `key`, returning how many keys were removed.
    async fn del<'k>(&self, key: KeyRef<'k>) -> Result<Count, Self::Err>;

    /// Schedules `key` to expire at `at` without waiting for the backend to apply it.
    fn expire_at(&self, key: Key, at: Timestamp);
}
