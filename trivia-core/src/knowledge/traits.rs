//! KnowledgeStore trait

use async_trait::async_trait;

use super::types::{Artist, LearnableRecord, Track};
use crate::error::KnowledgeError;
use crate::messenger::ChatMessage;

/// Trait for knowledge stores
///
/// Every operation is asynchronous and may fail. Callers in the core wrap
/// each call in a timeout.
#[async_trait]
pub trait KnowledgeStore: Send + Sync {
    /// Prepare the store (schema sync, connections). Must complete before
    /// any other call.
    async fn init(&self) -> Result<(), KnowledgeError>;

    /// Learn an artist/track pair from external content
    async fn learn(&self, record: &LearnableRecord) -> Result<Track, KnowledgeError>;

    /// Learn a track name confirmed by a player reaction
    ///
    /// `origin_symbol` is the marker the player put in front of the answer.
    async fn learn_track(&self, name: &str, origin_symbol: &str) -> Result<Track, KnowledgeError>;

    /// Learn an artist name confirmed by a player reaction
    async fn learn_artist(&self, name: &str, origin_symbol: &str)
    -> Result<Artist, KnowledgeError>;

    /// Guess the artist of `track` in reply to `message`
    async fn guess_artist_by_track(
        &self,
        message: &ChatMessage,
        track: &Track,
    ) -> Result<(), KnowledgeError>;

    /// Try to answer a clue
    async fn guess(&self, message: &ChatMessage) -> Result<(), KnowledgeError>;

    /// Generic chat response to a message addressed to the bot
    async fn respond(&self, message: &ChatMessage) -> Result<(), KnowledgeError>;
}
