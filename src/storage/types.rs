use tokio::sync::oneshot;

#[derive(Debug)]
pub enum Command {
    Set {
        key: Key,
        value: Value,
        cb: oneshot::Sender<()>,
    },
    Get {
        key: Key,
        cb: oneshot::Sender<Option<Value>>,
    },
    Exists {
        key: Key,
        cb: oneshot::Sender<Count>,
    },
    Del {
        key: Key,
        cb: oneshot::Sender<Count>,
    },
    ExpireAt {
        key: Key,
        at: Timestamp,
    },
}

pub type Key = String;
pub type KeyRef<'a> = &'a str;
pub type Value = String;

/// Number of keys a store reports for an existence check or a delete.
pub type Count = i64;

/// Absolute point in time, in seconds since the Unix epoch.
pub type Timestamp = u64;

pub fn unix_now() -> Timestamp {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or_default()
}
