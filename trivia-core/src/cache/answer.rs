//! AnswerCache: recent guesses keyed by message timestamp
//!
//! A reaction arrives some time after the guess it refers to. The cache
//! keeps each guess for a fixed TTL so fast reactions resolve while guesses
//! nobody reacts to do not pile up. Expiry is checked on every read, so a
//! stale entry is never returned even if it has not been evicted yet.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;
use tracing::trace;

use crate::messenger::ChatMessage;

struct CacheEntry {
    message: ChatMessage,
    expires_at: Instant,
}

impl CacheEntry {
    fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// Time-bounded map from message id to message
#[derive(Default)]
pub struct AnswerCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl AnswerCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `message` under `message_id` for `ttl`
    ///
    /// Overwriting an existing id resets its TTL. Entries already past
    /// their deadline are evicted on the way.
    pub async fn put(&self, message_id: &str, message: ChatMessage, ttl: Duration) {
        let now = Instant::now();
        let mut entries = self.entries.write().await;

        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired(now));
        if entries.len() < before {
            trace!(evicted = before - entries.len(), "Evicted expired answers");
        }

        entries.insert(
            message_id.to_string(),
            CacheEntry {
                message,
                expires_at: now + ttl,
            },
        );
    }

    /// The message stored under `message_id`, unless missing or expired
    pub async fn get(&self, message_id: &str) -> Option<ChatMessage> {
        let now = Instant::now();
        self.entries
            .read()
            .await
            .get(message_id)
            .filter(|entry| !entry.is_expired(now))
            .map(|entry| entry.message.clone())
    }

    /// Number of live entries
    pub async fn len(&self) -> usize {
        let now = Instant::now();
        self.entries
            .read()
            .await
            .values()
            .filter(|entry| !entry.is_expired(now))
            .count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Drop every expired entry, returning how many were removed
    pub async fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired(now));
        before - entries.len()
    }
}
