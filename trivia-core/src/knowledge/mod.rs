//! Knowledge store abstraction
//!
//! The store learns artists and tracks and makes guesses from what it knows.
//! Its schema is its own business; the core only needs the operations on
//! [`KnowledgeStore`].

pub mod memory;
pub mod mock;
pub mod traits;
pub mod types;

// Re-export key types for convenience
pub use memory::MemoryKnowledgeStore;
pub use mock::{KnowledgeCall, RecordingKnowledgeStore};
pub use traits::KnowledgeStore;
pub use types::{Artist, LearnableRecord, Track};
