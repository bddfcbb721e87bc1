//! Error types for trivia-core

use std::time::Duration;

use thiserror::Error;

/// Top-level error type for trivia-core
#[derive(Error, Debug)]
pub enum TriviaError {
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Knowledge error: {0}")]
    Knowledge(#[from] KnowledgeError),

    #[error("Content error: {0}")]
    Content(#[from] ContentError),

    #[error("Study error: {0}")]
    Study(#[from] StudyError),
}

/// Errors from the chat transport
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Failed to connect to {messenger}: {reason}")]
    ConnectFailed { messenger: String, reason: String },

    #[error("Failed to deliver reply: {0}")]
    ReplyFailed(String),

    #[error("Connection closed")]
    Closed,
}

/// Errors from the knowledge store
#[derive(Error, Debug)]
pub enum KnowledgeError {
    #[error("Knowledge store is not initialized")]
    NotInitialized,

    #[error("Cannot learn an empty name")]
    EmptyName,

    #[error("Knowledge store call timed out after {0:?}")]
    Timeout(Duration),

    #[error("Failed to reply: {0}")]
    Reply(#[from] TransportError),

    #[error("Storage error: {0}")]
    Storage(String),
}

/// Errors from the content source
#[derive(Error, Debug)]
pub enum ContentError {
    #[error("Failed to fetch content: {0}")]
    Fetch(String),

    #[error("Content source returned HTTP {status}")]
    Status { status: u16 },

    #[error("Failed to read content file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse content: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("No content source configured")]
    NotConfigured,
}

/// Errors from a study cycle
#[derive(Error, Debug)]
pub enum StudyError {
    #[error("Failed to fetch study batch: {0}")]
    Fetch(#[from] ContentError),

    #[error("A study cycle is already running")]
    AlreadyRunning,
}
