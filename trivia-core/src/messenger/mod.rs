//! Chat transport abstraction

pub mod mock;
pub mod traits;
pub mod types;

// Re-export key types for convenience
pub use mock::MockMessenger;
pub use traits::Messenger;
pub use types::{ChatMessage, InboundEvent, ItemKind, MessageKind, ReactionEvent, ReactionKind};
