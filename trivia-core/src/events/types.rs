//! Event type definitions

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::study::BatchReport;

/// Events published on the trivia event bus
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TriviaEvent {
    /// A game was started in a channel
    GameStarted {
        team: String,
        channel: String,
        user: String,
    },

    /// A game was stopped in a channel
    GameStopped {
        team: String,
        channel: String,
        user: String,
    },

    /// A guess was cached and can now be confirmed by reaction
    GuessCached {
        team: String,
        channel: String,
        ts: String,
    },

    /// A study cycle completed (possibly with per-record failures)
    StudyFinished { report: BatchReport },

    /// A study cycle failed before learning anything
    StudyFailed { run_id: Uuid, reason: String },
}

impl TriviaEvent {
    /// The (team, channel) this event belongs to, if it is game-related
    pub fn location(&self) -> Option<(&str, &str)> {
        match self {
            TriviaEvent::GameStarted { team, channel, .. }
            | TriviaEvent::GameStopped { team, channel, .. }
            | TriviaEvent::GuessCached { team, channel, .. } => {
                Some((team.as_str(), channel.as_str()))
            }
            TriviaEvent::StudyFinished { .. } | TriviaEvent::StudyFailed { .. } => None,
        }
    }
}
