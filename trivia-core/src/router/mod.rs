//! Routing of inbound chat events to game and knowledge actions

pub mod answer;
pub mod dispatch;
pub mod signal;

// Re-export key types for convenience
pub use answer::Answer;
pub use dispatch::{Action, EventRouter, Route};
pub use signal::Signal;
