//! Recording knowledge store for testing
//!
//! Records every call in order, can be told to fail or stall on specific
//! records, and tracks how many `learn` calls were in flight at once.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::traits::KnowledgeStore;
use super::types::{Artist, LearnableRecord, Track};
use crate::error::KnowledgeError;
use crate::messenger::ChatMessage;

/// A call made against the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KnowledgeCall {
    Init,
    Learn(LearnableRecord),
    LearnTrack { name: String, origin_symbol: String },
    LearnArtist { name: String, origin_symbol: String },
    GuessArtistByTrack { ts: String, track: String },
    Guess { ts: String },
    Respond { ts: String },
}

/// KnowledgeStore that records calls instead of storing anything
#[derive(Default)]
pub struct RecordingKnowledgeStore {
    calls: Mutex<Vec<KnowledgeCall>>,
    /// Tracks whose `learn` call fails
    failing_tracks: HashSet<String>,
    /// Tracks whose `learn` call sleeps before settling
    slow_tracks: HashSet<String>,
    learn_delay: Duration,
    fail_all: AtomicBool,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl RecordingKnowledgeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `learn` fail for records with this track
    #[must_use]
    pub fn failing_on(mut self, track: impl Into<String>) -> Self {
        self.failing_tracks.insert(track.into());
        self
    }

    /// Make every `learn` call take `delay`
    #[must_use]
    pub fn with_learn_delay(mut self, delay: Duration) -> Self {
        self.learn_delay = delay;
        self
    }

    /// Make `learn` for this track stall for a long time
    #[must_use]
    pub fn stalling_on(mut self, track: impl Into<String>) -> Self {
        self.slow_tracks.insert(track.into());
        self
    }

    /// Make every call fail
    pub fn fail_all(&self, fail: bool) {
        self.fail_all.store(fail, Ordering::SeqCst);
    }

    /// All calls so far, in order
    pub async fn calls(&self) -> Vec<KnowledgeCall> {
        self.calls.lock().await.clone()
    }

    /// Records passed to `learn`, in order
    pub async fn learned_records(&self) -> Vec<LearnableRecord> {
        self.calls
            .lock()
            .await
            .iter()
            .filter_map(|call| match call {
                KnowledgeCall::Learn(record) => Some(record.clone()),
                _ => None,
            })
            .collect()
    }

    /// Highest number of concurrent `learn` calls observed
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    async fn record(&self, call: KnowledgeCall) -> Result<(), KnowledgeError> {
        self.calls.lock().await.push(call);
        if self.fail_all.load(Ordering::SeqCst) {
            return Err(KnowledgeError::Storage("recording store failure".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl KnowledgeStore for RecordingKnowledgeStore {
    async fn init(&self) -> Result<(), KnowledgeError> {
        self.record(KnowledgeCall::Init).await
    }

    async fn learn(&self, record: &LearnableRecord) -> Result<Track, KnowledgeError> {
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);

        let result = self.record(KnowledgeCall::Learn(record.clone())).await;

        if self.slow_tracks.contains(&record.track) {
            tokio::time::sleep(Duration::from_secs(3600)).await;
        } else if !self.learn_delay.is_zero() {
            tokio::time::sleep(self.learn_delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        result?;
        if self.failing_tracks.contains(&record.track) {
            return Err(KnowledgeError::Storage(format!(
                "cannot learn {}",
                record.track
            )));
        }

        Ok(Track {
            name: record.track.clone(),
            artists: vec![record.artist.clone()],
        })
    }

    async fn learn_track(&self, name: &str, origin_symbol: &str) -> Result<Track, KnowledgeError> {
        self.record(KnowledgeCall::LearnTrack {
            name: name.to_string(),
            origin_symbol: origin_symbol.to_string(),
        })
        .await?;
        Ok(Track::new(name))
    }

    async fn learn_artist(
        &self,
        name: &str,
        origin_symbol: &str,
    ) -> Result<Artist, KnowledgeError> {
        self.record(KnowledgeCall::LearnArtist {
            name: name.to_string(),
            origin_symbol: origin_symbol.to_string(),
        })
        .await?;
        Ok(Artist::new(name))
    }

    async fn guess_artist_by_track(
        &self,
        message: &ChatMessage,
        track: &Track,
    ) -> Result<(), KnowledgeError> {
        self.record(KnowledgeCall::GuessArtistByTrack {
            ts: message.ts.clone(),
            track: track.name.clone(),
        })
        .await
    }

    async fn guess(&self, message: &ChatMessage) -> Result<(), KnowledgeError> {
        self.record(KnowledgeCall::Guess {
            ts: message.ts.clone(),
        })
        .await
    }

    async fn respond(&self, message: &ChatMessage) -> Result<(), KnowledgeError> {
        self.record(KnowledgeCall::Respond {
            ts: message.ts.clone(),
        })
        .await
    }
}
