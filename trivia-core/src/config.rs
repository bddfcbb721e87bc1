//! Game, signal and study configuration types

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

/// Default lifetime of a cached guess (10 seconds)
pub const DEFAULT_ANSWER_TTL_MS: u64 = 10_000;

/// Default timeout applied to every knowledge store call
pub const DEFAULT_CALL_TIMEOUT_SECS: u64 = 30;

/// Default marker players put in front of an answer
pub const DEFAULT_ORIGIN_SYMBOL: &str = ">";

/// Everything the bot needs at startup
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct TriviaConfig {
    /// Chat user id of the game operator (the one posting clues)
    #[serde(default)]
    pub game_operator: String,

    #[serde(default)]
    pub signals: SignalConfig,

    #[serde(default)]
    pub game: GameConfig,

    #[serde(default)]
    pub study: StudyConfig,
}

/// Message prefixes that classify the intent of an ambient message
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SignalConfig {
    /// Starts a game in the channel
    pub start: String,
    /// Ends the game in the channel
    pub end: String,
    /// Marks a player's guess
    pub guess: String,
    /// Marks a clue the bot should try to answer
    pub clue: String,
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self {
            start: "trivia:start".to_string(),
            end: "trivia:end".to_string(),
            guess: DEFAULT_ORIGIN_SYMBOL.to_string(),
            clue: "clue:".to_string(),
        }
    }
}

/// Per-game tuning
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameConfig {
    /// How long a guess stays reachable by a reaction, in milliseconds
    #[serde(default = "default_answer_ttl_ms")]
    pub answer_ttl_ms: u64,

    /// Marker stripped from answers before they are learned
    #[serde(default = "default_origin_symbol")]
    pub origin_symbol: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            answer_ttl_ms: DEFAULT_ANSWER_TTL_MS,
            origin_symbol: DEFAULT_ORIGIN_SYMBOL.to_string(),
        }
    }
}

impl GameConfig {
    /// Answer TTL as a Duration
    pub fn answer_ttl(&self) -> Duration {
        Duration::from_millis(self.answer_ttl_ms)
    }
}

/// Where study batches come from and how long each learn call may take
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StudyConfig {
    /// HTTP endpoint returning a JSON array of records
    #[serde(default)]
    pub source_url: Option<Url>,

    /// Local JSON file with records (used when no URL is set)
    #[serde(default)]
    pub source_file: Option<PathBuf>,

    /// Upper bound for a single knowledge store call, in seconds
    #[serde(default = "default_call_timeout_secs")]
    pub call_timeout_secs: u64,

    /// Run a study cycle before listening
    #[serde(default)]
    pub on_start: bool,
}

impl Default for StudyConfig {
    fn default() -> Self {
        Self {
            source_url: None,
            source_file: None,
            call_timeout_secs: DEFAULT_CALL_TIMEOUT_SECS,
            on_start: false,
        }
    }
}

impl StudyConfig {
    /// Call timeout as a Duration
    pub fn call_timeout(&self) -> Duration {
        Duration::from_secs(self.call_timeout_secs)
    }
}

fn default_answer_ttl_ms() -> u64 {
    DEFAULT_ANSWER_TTL_MS
}

fn default_origin_symbol() -> String {
    DEFAULT_ORIGIN_SYMBOL.to_string()
}

fn default_call_timeout_secs() -> u64 {
    DEFAULT_CALL_TIMEOUT_SECS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trivia_config_empty_json_uses_defaults() {
        let config: TriviaConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, TriviaConfig::default());
        assert!(config.game_operator.is_empty());
    }

    #[test]
    fn game_config_default_ttl_is_ten_seconds() {
        let config = GameConfig::default();
        assert_eq!(config.answer_ttl(), Duration::from_secs(10));
        assert_eq!(config.origin_symbol, ">");
    }

    #[test]
    fn study_config_default_has_no_source() {
        let config = StudyConfig::default();
        assert!(config.source_url.is_none());
        assert!(config.source_file.is_none());
        assert_eq!(config.call_timeout(), Duration::from_secs(30));
        assert!(!config.on_start);
    }

    #[test]
    fn signal_config_default_guess_matches_origin_symbol() {
        let config = SignalConfig::default();
        assert_eq!(config.guess, DEFAULT_ORIGIN_SYMBOL);
    }

    #[test]
    fn signal_config_partial_json_keeps_other_defaults() {
        let config: SignalConfig = serde_json::from_str(r#"{"start": "!play"}"#).unwrap();
        assert_eq!(config.start, "!play");
        assert_eq!(config.end, SignalConfig::default().end);
    }

    #[test]
    fn game_config_missing_fields_use_defaults() {
        let config: GameConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, GameConfig::default());
    }

    #[test]
    fn study_config_parses_url() {
        let config: StudyConfig =
            serde_json::from_str(r#"{"source_url": "https://charts.example.com/hot-100.json"}"#)
                .unwrap();
        assert_eq!(
            config.source_url.unwrap().host_str(),
            Some("charts.example.com")
        );
        assert_eq!(config.call_timeout_secs, DEFAULT_CALL_TIMEOUT_SECS);
    }
}
