//! In-memory EventBus implementation
//!
//! MemoryEventBus keeps the most recent events for replay and uses a
//! broadcast channel for live subscribers. The bot runs for the lifetime of
//! the process, so history is bounded.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::sync::{RwLock, broadcast};

use super::TriviaEvent;
use super::bus::{EventBus, EventSeq};

/// Default number of events kept for replay
pub const DEFAULT_HISTORY: usize = 1024;

/// In-memory implementation of EventBus
pub struct MemoryEventBus {
    /// Most recent events with sequence numbers, oldest first
    events: RwLock<VecDeque<(EventSeq, TriviaEvent)>>,
    /// Maximum number of events kept for replay
    history: usize,
    /// Next sequence number to assign
    next_seq: AtomicU64,
    /// Broadcast channel for live subscribers
    tx: broadcast::Sender<(EventSeq, TriviaEvent)>,
}

impl MemoryEventBus {
    /// Create a new MemoryEventBus with the given broadcast channel capacity
    pub fn new(capacity: usize) -> Self {
        Self::with_history(capacity, DEFAULT_HISTORY)
    }

    /// Create a bus keeping at most `history` events for replay
    pub fn with_history(capacity: usize, history: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self {
            events: RwLock::new(VecDeque::new()),
            history,
            next_seq: AtomicU64::new(0),
            tx,
        }
    }
}

#[async_trait]
impl EventBus for MemoryEventBus {
    async fn publish(&self, event: TriviaEvent) -> EventSeq {
        let seq = self.next_seq.fetch_add(1, Ordering::SeqCst);

        {
            let mut events = self.events.write().await;
            events.push_back((seq, event.clone()));
            while events.len() > self.history {
                events.pop_front();
            }
        }

        // Broadcast to live subscribers (ignore if no receivers)
        let _ = self.tx.send((seq, event));

        seq
    }

    fn subscribe(&self) -> broadcast::Receiver<(EventSeq, TriviaEvent)> {
        self.tx.subscribe()
    }

    async fn events_from(&self, seq: EventSeq) -> Vec<(EventSeq, TriviaEvent)> {
        self.events
            .read()
            .await
            .iter()
            .filter(|(s, _)| *s >= seq)
            .cloned()
            .collect()
    }

    async fn channel_events(&self, team: &str, channel: &str) -> Vec<(EventSeq, TriviaEvent)> {
        self.events
            .read()
            .await
            .iter()
            .filter(|(_, event)| event.location() == Some((team, channel)))
            .cloned()
            .collect()
    }

    fn current_seq(&self) -> EventSeq {
        self.next_seq.load(Ordering::SeqCst)
    }
}
