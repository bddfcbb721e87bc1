//! Inbound chat event types

use serde::{Deserialize, Serialize};

/// How a message reached the bot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    /// Public channel message not addressed to the bot
    #[default]
    Ambient,
    /// Private message to the bot
    DirectMessage,
    /// Message starting with a mention of the bot
    DirectMention,
    /// Message mentioning the bot somewhere in its text
    Mention,
}

impl MessageKind {
    /// Whether the bot was addressed directly (always answered)
    pub fn is_addressed(&self) -> bool {
        !matches!(self, Self::Ambient)
    }
}

/// A chat message as delivered by the messenger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Message timestamp, unique per message
    pub ts: String,
    pub text: String,
    pub user: String,
    pub channel: Option<String>,
    pub team: Option<String>,
    #[serde(default)]
    pub kind: MessageKind,
}

impl ChatMessage {
    /// Create an ambient message in a team channel
    pub fn ambient(
        ts: impl Into<String>,
        team: impl Into<String>,
        channel: impl Into<String>,
        user: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            ts: ts.into(),
            text: text.into(),
            user: user.into(),
            channel: Some(channel.into()),
            team: Some(team.into()),
            kind: MessageKind::Ambient,
        }
    }

    /// Set the message kind
    #[must_use]
    pub fn with_kind(mut self, kind: MessageKind) -> Self {
        self.kind = kind;
        self
    }

    /// The (team, channel) pair, if both are known
    pub fn location(&self) -> Option<(&str, &str)> {
        match (self.team.as_deref(), self.channel.as_deref()) {
            (Some(team), Some(channel)) if !team.is_empty() && !channel.is_empty() => {
                Some((team, channel))
            }
            _ => None,
        }
    }
}

/// What kind of item a reaction was added to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Message,
    Other,
}

/// Emoji reactions the game understands
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReactionKind {
    /// `:musical_note:` - the guess was a track name
    Note,
    /// `:art:` - the guess was an artist name
    Art,
    /// Any other emoji
    Other(String),
}

impl ReactionKind {
    /// Classify an emoji name as delivered by the chat platform
    pub fn from_emoji(name: &str) -> Self {
        match name {
            "musical_note" => Self::Note,
            "art" => Self::Art,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_emoji(&self) -> &str {
        match self {
            Self::Note => "musical_note",
            Self::Art => "art",
            Self::Other(name) => name,
        }
    }
}

/// A reaction added to some item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionEvent {
    /// Timestamp of the message that was reacted to
    pub item_ts: String,
    pub item_kind: ItemKind,
    pub reaction: ReactionKind,
    pub user: String,
}

impl ReactionEvent {
    /// Reaction on a message
    pub fn on_message(
        item_ts: impl Into<String>,
        reaction: ReactionKind,
        user: impl Into<String>,
    ) -> Self {
        Self {
            item_ts: item_ts.into(),
            item_kind: ItemKind::Message,
            reaction,
            user: user.into(),
        }
    }
}

/// Everything a messenger can deliver
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InboundEvent {
    Message(ChatMessage),
    Reaction(ReactionEvent),
}
