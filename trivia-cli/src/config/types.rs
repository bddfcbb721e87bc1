use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use trivia_core::{GameConfig, SignalConfig, StudyConfig, TriviaConfig};
use url::Url;

/// Configuration as stored in TOML files (with optional fields for merging)
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawAppConfig {
    pub game_operator: Option<String>,

    #[serde(default)]
    pub signals: RawSignalConfig,

    #[serde(default)]
    pub game: RawGameConfig,

    #[serde(default)]
    pub study: RawStudyConfig,

    #[serde(default)]
    pub console: RawConsoleConfig,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawSignalConfig {
    pub start: Option<String>,
    pub end: Option<String>,
    pub guess: Option<String>,
    pub clue: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawGameConfig {
    pub answer_ttl_ms: Option<u64>,
    pub origin_symbol: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawStudyConfig {
    pub source_url: Option<Url>,
    pub source_file: Option<PathBuf>,
    pub call_timeout_secs: Option<u64>,
    pub on_start: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawConsoleConfig {
    pub team: Option<String>,
    pub channel: Option<String>,
    pub user: Option<String>,
}

/// Final configuration with defaults applied
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct AppConfig {
    /// Chat user id of the game operator
    #[serde(default)]
    pub game_operator: String,

    #[serde(default)]
    pub signals: SignalConfig,

    #[serde(default)]
    pub game: GameConfig,

    #[serde(default)]
    pub study: StudyConfig,

    #[serde(default)]
    pub console: ConsoleConfig,
}

impl AppConfig {
    /// The part of the configuration the bot itself needs
    pub fn trivia(&self) -> TriviaConfig {
        TriviaConfig {
            game_operator: self.game_operator.clone(),
            signals: self.signals.clone(),
            game: self.game.clone(),
            study: self.study.clone(),
        }
    }
}

/// Where console input pretends to come from
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConsoleConfig {
    pub team: String,
    pub channel: String,
    pub user: String,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            team: DEFAULT_CONSOLE_TEAM.to_string(),
            channel: DEFAULT_CONSOLE_CHANNEL.to_string(),
            user: DEFAULT_CONSOLE_USER.to_string(),
        }
    }
}

pub const DEFAULT_CONSOLE_TEAM: &str = "local";
pub const DEFAULT_CONSOLE_CHANNEL: &str = "console";
pub const DEFAULT_CONSOLE_USER: &str = "player";
