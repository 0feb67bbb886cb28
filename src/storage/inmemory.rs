//! In-memory key-value storage with absolute expiration.

use super::types::{unix_now, Command, Count, Key, KeyRef, Timestamp, Value};
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::{collections::HashMap, time::Duration};
use tokio::{
    sync::{mpsc, oneshot},
    time::{interval, MissedTickBehavior},
};
use tracing::{debug, warn};

pub const DEFAULT_CAPACITY: usize = 32;

/// How often expired entries that nobody reads again are reclaimed.
pub const PURGE_PERIOD: Duration = Duration::from_secs(1);

#[derive(Debug)]
struct Entry {
    value: Value,
    expire_at: Option<Timestamp>,
}

impl Entry {
    fn is_expired(&self, now: Timestamp) -> bool {
        self.expire_at.map_or(false, |at| now >= at)
    }
}

#[derive(Debug)]
pub struct Backend {
    data: HashMap<Key, Entry>,
    commands: mpsc::Receiver<Command>,
}

#[derive(Debug, Clone)]
pub struct Store {
    commands: mpsc::Sender<Command>,
}

pub fn start() -> Store {
    start_with_capacity(DEFAULT_CAPACITY)
}

pub fn start_with_capacity(capacity: usize) -> Store {
    let (tx, rx) = mpsc::channel(capacity);

    let backend = Backend {
        data: HashMap::new(),
        commands: rx,
    };

    tokio::spawn(backend.start());

    Store { commands: tx }
}

impl Store {
    async fn request<T>(
        &self,
        command: impl FnOnce(oneshot::Sender<T>) -> Command,
        name: &'static str,
    ) -> Result<T> {
        let (tx, rx) = oneshot::channel();
        self.commands
            .send(command(tx))
            .await
            .with_context(|| format!("unable to send {} command", name))?;
        rx.await
            .with_context(|| format!("unable to access result of {} command", name))
    }
}

#[async_trait]
impl super::Store for Store {
    type Err = anyhow::Error;

    async fn set(&self, key: Key, value: Value) -> Result<(), Self::Err> {
        self.request(|cb| Command::Set { key, value, cb }, "set")
            .await
    }

    async fn get<'k>(&self, key: KeyRef<'k>) -> Result<Option<Value>, Self::Err> {
        let key = key.to_owned();
        self.request(|cb| Command::Get { key, cb }, "get").await
    }

    async fn exists<'k>(&self, key: KeyRef<'k>) -> Result<Count, Self::Err> {
        let key = key.to_owned();
        self.request(|cb| Command::Exists { key, cb }, "exists")
            .await
    }

    async fn del<'k>(&self, key: KeyRef<'k>) -> Result<Count, Self::Err> {
        let key = key.to_owned();
        self.request(|cb| Command::Del { key, cb }, "del").await
    }

    fn expire_at(&self, key: Key, at: Timestamp) {
        if let Err(e) = self.commands.try_send(Command::ExpireAt { key, at }) {
            warn!(reason = %e, "dropped expire command");
        }
    }
}

impl Backend {
    pub async fn start(mut self) {
        let mut purge = interval(PURGE_PERIOD);
        purge.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                command = self.commands.recv() => match command {
                    Some(command) => self.apply(command, unix_now()),
                    None => break,
                },
                _ = purge.tick() => self.purge(unix_now()),
            }
        }
        debug!("store closed");
    }

    fn purge(&mut self, now: Timestamp) {
        let before = self.data.len();
        self.data.retain(|_, entry| !entry.is_expired(now));
        let purged = before - self.data.len();
        if purged > 0 {
            debug!(purged, "purged expired entries");
        }
    }

    fn apply(&mut self, command: Command, now: Timestamp) {
        match command {
            Command::Set { key, value, cb } => {
                self.data.insert(
                    key,
                    Entry {
                        value,
                        expire_at: None,
                    },
                );
                let _ = cb.send(());
            }
            Command::Get { key, cb } => {
                let value = self.live(&key, now).map(|entry| entry.value.clone());
                let _ = cb.send(value);
            }
            Command::Exists { key, cb } => {
                let count = self.live(&key, now).map_or(0, |_| 1);
                let _ = cb.send(count);
            }
            Command::Del { key, cb } => {
                let count = match self.data.remove(&key) {
                    Some(entry) if !entry.is_expired(now) => 1,
                    _ => 0,
                };
                let _ = cb.send(count);
            }
            Command::ExpireAt { key, at } => {
                if let Some(entry) = self.data.get_mut(&key) {
                    entry.expire_at = Some(at);
                }
            }
        }
    }

    fn live(&mut self, key: KeyRef<'_>, now: Timestamp) -> Option<&Entry> {
        if self.data.get(key).map_or(false, |entry| entry.is_expired(now)) {
            debug!(key, "evicting expired entry");
            self.data.remove(key);
        }
        self.data.get(key)
    }
}
