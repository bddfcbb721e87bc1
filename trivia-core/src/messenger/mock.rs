//! Mock messenger for testing
//!
//! MockMessenger hands out a channel on `connect()` whose sending half stays
//! with the test, and records every reply instead of delivering it. The
//! stream ends once `disconnect()` was called and every handed-out sender is
//! dropped.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::{Mutex, mpsc};

use super::traits::Messenger;
use super::types::{ChatMessage, InboundEvent};
use crate::error::TransportError;

/// Mock implementation of Messenger for testing
pub struct MockMessenger {
    tx: Mutex<Option<mpsc::Sender<InboundEvent>>>,
    rx: Mutex<Option<mpsc::Receiver<InboundEvent>>>,
    replies: Mutex<Vec<(ChatMessage, String)>>,
    fail_replies: AtomicBool,
}

impl MockMessenger {
    /// Create a new MockMessenger with the given event buffer
    pub fn new(capacity: usize) -> Self {
        let (tx, rx) = mpsc::channel(capacity);
        Self {
            tx: Mutex::new(Some(tx)),
            rx: Mutex::new(Some(rx)),
            replies: Mutex::new(Vec::new()),
            fail_replies: AtomicBool::new(false),
        }
    }

    /// Sender for injecting inbound events, until `disconnect()`
    pub async fn sender(&self) -> Option<mpsc::Sender<InboundEvent>> {
        self.tx.lock().await.clone()
    }

    /// Drop the mock's own sender so the stream can end
    pub async fn disconnect(&self) {
        self.tx.lock().await.take();
    }

    /// Make every following reply fail
    pub fn fail_replies(&self, fail: bool) {
        self.fail_replies.store(fail, Ordering::SeqCst);
    }

    /// All replies sent so far, in order
    pub async fn replies(&self) -> Vec<(ChatMessage, String)> {
        self.replies.lock().await.clone()
    }

    /// Reply texts only
    pub async fn reply_texts(&self) -> Vec<String> {
        self.replies
            .lock()
            .await
            .iter()
            .map(|(_, text)| text.clone())
            .collect()
    }
}

impl Default for MockMessenger {
    fn default() -> Self {
        Self::new(64)
    }
}

#[async_trait]
impl Messenger for MockMessenger {
    fn name(&self) -> &str {
        "mock"
    }

    async fn connect(&self) -> Result<mpsc::Receiver<InboundEvent>, TransportError> {
        self.rx
            .lock()
            .await
            .take()
            .ok_or_else(|| TransportError::ConnectFailed {
                messenger: self.name().to_string(),
                reason: "already connected".to_string(),
            })
    }

    async fn reply(&self, message: &ChatMessage, text: &str) -> Result<(), TransportError> {
        if self.fail_replies.load(Ordering::SeqCst) {
            return Err(TransportError::ReplyFailed("mock failure".to_string()));
        }
        self.replies
            .lock()
            .await
            .push((message.clone(), text.to_string()));
        Ok(())
    }
}
