//! Short-lived caches

pub mod answer;

// Re-export key types for convenience
pub use answer::AnswerCache;
