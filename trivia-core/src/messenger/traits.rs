//! Messenger trait
//!
//! A messenger owns the connection to the chat platform. It delivers inbound
//! events as a stream and sends replies addressed to an earlier message.

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::types::{ChatMessage, InboundEvent};
use crate::error::TransportError;

/// Trait for chat transports
#[async_trait]
pub trait Messenger: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &str;

    /// Open the connection and return the stream of inbound events
    ///
    /// The stream ends when the connection closes.
    async fn connect(&self) -> Result<mpsc::Receiver<InboundEvent>, TransportError>;

    /// Reply in the conversation `message` belongs to
    async fn reply(&self, message: &ChatMessage, text: &str) -> Result<(), TransportError>;
}
