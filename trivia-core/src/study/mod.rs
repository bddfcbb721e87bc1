//! Studying: pulling a batch of records and learning them one by one

pub mod pipeline;
pub mod service;

// Re-export key types for convenience
pub use pipeline::{BatchReport, LearningPipeline, RecordFailure};
pub use service::StudyService;
