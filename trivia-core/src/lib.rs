//! trivia-core: Core library for the trivia chat bot
//!
//! This crate provides the game logic of the bot:
//!
//! - **Session tracking** - [`SessionRegistry`] records which team channels have a game running
//! - **Answer cache** - [`AnswerCache`] keeps recent guesses so later reactions can find them
//! - **Studying** - [`LearningPipeline`] and [`StudyService`] learn batches of chart records
//! - **Routing** - [`EventRouter`] turns chat events into game and knowledge actions
//! - **Event system** - [`EventBus`] trait and [`MemoryEventBus`] for game and study events
//!
//! The chat transport ([`Messenger`]), the knowledge store ([`KnowledgeStore`])
//! and the record source ([`ContentSource`]) are traits; reference and mock
//! implementations live next to them.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use tokio_util::sync::CancellationToken;
//! use trivia_core::{
//!     MemoryEventBus, MemoryKnowledgeStore, MockMessenger, Trivia, TriviaConfig,
//! };
//!
//! async fn example() -> Result<(), trivia_core::TriviaError> {
//!     let config = TriviaConfig::default();
//!     let messenger = Arc::new(MockMessenger::default());
//!     let store = Arc::new(MemoryKnowledgeStore::new(
//!         messenger.clone(),
//!         config.game.origin_symbol.clone(),
//!     ));
//!
//!     let trivia = Trivia::new(config, messenger, store, None, Arc::new(MemoryEventBus::new(256)));
//!     trivia.listen(CancellationToken::new()).await
//! }
//! ```
//!
//! # Architecture
//!
//! ```text
//! Messenger ──events──▶ EventRouter ──▶ SessionRegistry
//!                           │      └──▶ AnswerCache
//!                           ▼
//!                     KnowledgeStore ◀── LearningPipeline ◀── ContentSource
//!                                              │
//!                                          EventBus ("study finished")
//! ```

pub mod cache;
pub mod config;
pub mod content;
pub mod error;
pub mod events;
pub mod knowledge;
pub mod messenger;
pub mod router;
pub mod session;
pub mod study;
pub mod trivia;

// Re-export key types for convenience
pub use cache::AnswerCache;
pub use config::{GameConfig, SignalConfig, StudyConfig, TriviaConfig};
pub use content::{ContentSource, FileContentSource, HttpContentSource, StaticContentSource};
pub use error::{ContentError, KnowledgeError, StudyError, TransportError, TriviaError};
pub use events::{EventBus, EventLogger, EventSeq, MemoryEventBus, TriviaEvent};
pub use knowledge::{
    Artist, KnowledgeCall, KnowledgeStore, LearnableRecord, MemoryKnowledgeStore,
    RecordingKnowledgeStore, Track,
};
pub use messenger::{
    ChatMessage, InboundEvent, ItemKind, MessageKind, Messenger, MockMessenger, ReactionEvent,
    ReactionKind,
};
pub use router::{Action, Answer, EventRouter, Route, Signal};
pub use session::SessionRegistry;
pub use study::{BatchReport, LearningPipeline, RecordFailure, StudyService};
pub use trivia::Trivia;
