//! Event system for trivia
//!
//! Game lifecycle and study results are published here. Anything that wants
//! to observe the bot (logging, status output, tests) subscribes.

pub mod bus;
pub mod logger;
pub mod memory;
pub mod types;

// Re-export key types for convenience
pub use bus::{EventBus, EventSeq};
pub use logger::EventLogger;
pub use memory::MemoryEventBus;
pub use types::TriviaEvent;
