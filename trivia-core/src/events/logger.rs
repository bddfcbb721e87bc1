//! EventLogger: turns bus events into log lines

use tokio::sync::broadcast;
use tracing::{info, warn};

use super::{EventSeq, TriviaEvent};

/// Subscriber that logs game and study events
pub struct EventLogger;

impl EventLogger {
    /// Log events until the channel closes
    pub async fn run(mut event_rx: broadcast::Receiver<(EventSeq, TriviaEvent)>) {
        loop {
            match event_rx.recv().await {
                Ok((seq, event)) => Self::log(seq, &event),
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    warn!("EventLogger lagged by {} events", n);
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    }

    fn log(seq: EventSeq, event: &TriviaEvent) {
        match event {
            TriviaEvent::StudyFinished { report } if report.is_clean() => {
                info!(seq, run_id = %report.run_id, learned = report.learned, "Finished studying!");
            }
            TriviaEvent::StudyFinished { report } => {
                warn!(
                    seq,
                    run_id = %report.run_id,
                    learned = report.learned,
                    failed = report.failed(),
                    "Finished studying with failures"
                );
            }
            TriviaEvent::StudyFailed { run_id, reason } => {
                warn!(seq, %run_id, reason = %reason, "Study cycle failed");
            }
            TriviaEvent::GameStarted { .. }
            | TriviaEvent::GameStopped { .. }
            | TriviaEvent::GuessCached { .. } => {}
        }
    }
}
