//! In-memory KnowledgeStore implementation
//!
//! Artists and tracks are keyed by their lowercased name. Replies go out
//! through the messenger the store was built with.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, info};

use super::traits::KnowledgeStore;
use super::types::{Artist, LearnableRecord, Track};
use crate::error::KnowledgeError;
use crate::messenger::{ChatMessage, Messenger};

#[derive(Default)]
struct KnowledgeBase {
    tracks: HashMap<String, Track>,
    artists: HashMap<String, Artist>,
}

impl KnowledgeBase {
    fn track_entry(&mut self, name: &str) -> &mut Track {
        self.tracks
            .entry(name.to_lowercase())
            .or_insert_with(|| Track::new(name))
    }

    fn artist_entry(&mut self, name: &str) -> &mut Artist {
        self.artists
            .entry(name.to_lowercase())
            .or_insert_with(|| Artist::new(name))
    }

    fn link(&mut self, artist: &str, track: &str) {
        let entry = self.track_entry(track);
        if !entry.artists.iter().any(|a| a.eq_ignore_ascii_case(artist)) {
            entry.artists.push(artist.to_string());
        }
        let entry = self.artist_entry(artist);
        if !entry.tracks.iter().any(|t| t.eq_ignore_ascii_case(track)) {
            entry.tracks.push(track.to_string());
        }
    }

    /// Longest known track or artist name contained in `text`, mapped to
    /// its counterpart
    fn answer_for(&self, text: &str) -> Option<String> {
        let text = text.to_lowercase();

        let track_hit = self
            .tracks
            .iter()
            .filter(|(key, track)| text.contains(key.as_str()) && !track.artists.is_empty())
            .max_by_key(|(key, _)| key.len())
            .map(|(key, track)| (key.len(), track.artists.join(" & ")));

        let artist_hit = self
            .artists
            .iter()
            .filter(|(key, artist)| text.contains(key.as_str()) && !artist.tracks.is_empty())
            .max_by_key(|(key, _)| key.len())
            .map(|(key, artist)| (key.len(), artist.tracks[0].clone()));

        match (track_hit, artist_hit) {
            (Some(track), Some(artist)) if artist.0 > track.0 => Some(artist.1),
            (Some(track), _) => Some(track.1),
            (None, artist) => artist.map(|(_, answer)| answer),
        }
    }
}

/// In-memory implementation of KnowledgeStore
pub struct MemoryKnowledgeStore {
    messenger: Arc<dyn Messenger>,
    origin_symbol: String,
    base: RwLock<KnowledgeBase>,
    initialized: AtomicBool,
}

impl MemoryKnowledgeStore {
    /// Create a store replying through `messenger` and prefixing its guesses
    /// with `origin_symbol`
    pub fn new(messenger: Arc<dyn Messenger>, origin_symbol: impl Into<String>) -> Self {
        Self {
            messenger,
            origin_symbol: origin_symbol.into(),
            base: RwLock::new(KnowledgeBase::default()),
            initialized: AtomicBool::new(false),
        }
    }

    /// Number of known tracks
    pub async fn track_count(&self) -> usize {
        self.base.read().await.tracks.len()
    }

    /// Number of known artists
    pub async fn artist_count(&self) -> usize {
        self.base.read().await.artists.len()
    }

    /// Look up a track by name (case-insensitive)
    pub async fn track(&self, name: &str) -> Option<Track> {
        self.base.read().await.tracks.get(&name.to_lowercase()).cloned()
    }

    /// Look up an artist by name (case-insensitive)
    pub async fn artist(&self, name: &str) -> Option<Artist> {
        self.base
            .read()
            .await
            .artists
            .get(&name.to_lowercase())
            .cloned()
    }

    fn ensure_initialized(&self) -> Result<(), KnowledgeError> {
        if self.initialized.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(KnowledgeError::NotInitialized)
        }
    }

    async fn reply_guess(&self, message: &ChatMessage, answer: &str) -> Result<(), KnowledgeError> {
        let text = format!("{} {}", self.origin_symbol, answer);
        self.messenger.reply(message, &text).await?;
        Ok(())
    }
}

/// Strip the origin marker and surrounding whitespace from a name
fn clean_name<'a>(name: &'a str, origin_symbol: &str) -> Result<&'a str, KnowledgeError> {
    let name = name.trim();
    let name = if origin_symbol.is_empty() {
        name
    } else {
        name.strip_prefix(origin_symbol).unwrap_or(name).trim()
    };
    if name.is_empty() {
        Err(KnowledgeError::EmptyName)
    } else {
        Ok(name)
    }
}

#[async_trait]
impl KnowledgeStore for MemoryKnowledgeStore {
    async fn init(&self) -> Result<(), KnowledgeError> {
        if !self.initialized.swap(true, Ordering::SeqCst) {
            info!("Memory knowledge store ready");
        }
        Ok(())
    }

    async fn learn(&self, record: &LearnableRecord) -> Result<Track, KnowledgeError> {
        self.ensure_initialized()?;
        let artist = clean_name(&record.artist, "")?;
        let track = clean_name(&record.track, "")?;

        let mut base = self.base.write().await;
        base.link(artist, track);
        debug!(artist = %artist, track = %track, "Learned record");
        Ok(base.track_entry(track).clone())
    }

    async fn learn_track(&self, name: &str, origin_symbol: &str) -> Result<Track, KnowledgeError> {
        self.ensure_initialized()?;
        let name = clean_name(name, origin_symbol)?;

        let mut base = self.base.write().await;
        debug!(track = %name, "Learned track");
        Ok(base.track_entry(name).clone())
    }

    async fn learn_artist(
        &self,
        name: &str,
        origin_symbol: &str,
    ) -> Result<Artist, KnowledgeError> {
        self.ensure_initialized()?;
        let name = clean_name(name, origin_symbol)?;

        let mut base = self.base.write().await;
        debug!(artist = %name, "Learned artist");
        Ok(base.artist_entry(name).clone())
    }

    async fn guess_artist_by_track(
        &self,
        message: &ChatMessage,
        track: &Track,
    ) -> Result<(), KnowledgeError> {
        self.ensure_initialized()?;
        let artists = self
            .base
            .read()
            .await
            .tracks
            .get(&track.name.to_lowercase())
            .map(|t| t.artists.clone())
            .unwrap_or_default();

        if artists.is_empty() {
            debug!(track = %track.name, "No known artist for track");
            return Ok(());
        }
        self.reply_guess(message, &artists.join(" & ")).await
    }

    async fn guess(&self, message: &ChatMessage) -> Result<(), KnowledgeError> {
        self.ensure_initialized()?;
        let answer = self.base.read().await.answer_for(&message.text);

        match answer {
            Some(answer) => self.reply_guess(message, &answer).await,
            None => {
                debug!(text = %message.text, "Nothing known about clue");
                Ok(())
            }
        }
    }

    async fn respond(&self, message: &ChatMessage) -> Result<(), KnowledgeError> {
        self.ensure_initialized()?;
        let text = {
            let base = self.base.read().await;
            format!(
                "Hi <@{}>! I know {} tracks by {} artists.",
                message.user,
                base.tracks.len(),
                base.artists.len()
            )
        };
        self.messenger.reply(message, &text).await?;
        Ok(())
    }
}
