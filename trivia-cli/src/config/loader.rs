use super::types::{
    AppConfig, ConsoleConfig, DEFAULT_CONSOLE_CHANNEL, DEFAULT_CONSOLE_TEAM, DEFAULT_CONSOLE_USER,
    RawAppConfig, RawConsoleConfig, RawGameConfig, RawSignalConfig, RawStudyConfig,
};
use anyhow::{Context, Result};
use directories::ProjectDirs;
use std::path::{Path, PathBuf};
use trivia_core::config::{DEFAULT_ANSWER_TTL_MS, DEFAULT_CALL_TIMEOUT_SECS, DEFAULT_ORIGIN_SYMBOL};
use trivia_core::{GameConfig, SignalConfig, StudyConfig};

/// Prefix of environment variables that override config values
const ENV_PREFIX: &str = "TRIVIA_";

/// Separates the section from the key in an override, e.g. `TRIVIA_SIGNALS__START`
const ENV_SEPARATOR: &str = "__";

/// Overrides the directory holding the project config
const PROJECT_CONFIG_DIR_VAR: &str = "TRIVIA_PROJECT_CONFIG_DIR";

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load merged configuration (user + project + environment)
    pub fn load() -> Result<AppConfig> {
        let mut raw = RawAppConfig::default();

        // Layer 1: User config
        if let Some(user_path) = Self::user_config_path()
            && user_path.exists()
        {
            raw = Self::merge_raw(raw, Self::read_raw(&user_path)?);
        }

        // Layer 2: Project config
        let project_path = Self::project_config_path();
        if project_path.exists() {
            raw = Self::merge_raw(raw, Self::read_raw(&project_path)?);
        }

        // Layer 3: Environment
        let overrides = Self::env_overrides(std::env::vars())?;
        raw = Self::merge_raw(raw, overrides);

        Ok(Self::finalize(raw))
    }

    /// Get user config path (platform-specific)
    pub fn user_config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "trivia").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Get project config path
    /// Can be overridden with TRIVIA_PROJECT_CONFIG_DIR env var
    pub fn project_config_path() -> PathBuf {
        if let Ok(dir) = std::env::var(PROJECT_CONFIG_DIR_VAR) {
            PathBuf::from(dir).join("config.toml")
        } else {
            PathBuf::from(".trivia/config.toml")
        }
    }

    fn read_raw(path: &Path) -> Result<RawAppConfig> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        toml::from_str(&contents).with_context(|| format!("Invalid config in {}", path.display()))
    }

    /// Build a raw config from `TRIVIA_<SECTION>__<KEY>` variables
    ///
    /// Top-level keys have no section (`TRIVIA_GAME_OPERATOR`). Unknown
    /// variables are ignored; values that fail to parse are an error.
    fn env_overrides(vars: impl IntoIterator<Item = (String, String)>) -> Result<RawAppConfig> {
        let mut raw = RawAppConfig::default();

        for (name, value) in vars {
            if name == PROJECT_CONFIG_DIR_VAR {
                continue;
            }
            let Some(key) = name.strip_prefix(ENV_PREFIX) else {
                continue;
            };
            let key = key.to_lowercase();

            match key.split_once(ENV_SEPARATOR) {
                None if key == "game_operator" => raw.game_operator = Some(value),
                None => tracing::debug!(var = %name, "Ignoring unknown config variable"),
                Some((section, field)) => {
                    Self::apply_env(&mut raw, section, field, value)
                        .with_context(|| format!("Invalid value for {}", name))?;
                }
            }
        }

        Ok(raw)
    }

    fn apply_env(raw: &mut RawAppConfig, section: &str, field: &str, value: String) -> Result<()> {
        match (section, field) {
            ("signals", "start") => raw.signals.start = Some(value),
            ("signals", "end") => raw.signals.end = Some(value),
            ("signals", "guess") => raw.signals.guess = Some(value),
            ("signals", "clue") => raw.signals.clue = Some(value),
            ("game", "answer_ttl_ms") => raw.game.answer_ttl_ms = Some(value.parse()?),
            ("game", "origin_symbol") => raw.game.origin_symbol = Some(value),
            ("study", "source_url") => raw.study.source_url = Some(value.parse()?),
            ("study", "source_file") => raw.study.source_file = Some(PathBuf::from(value)),
            ("study", "call_timeout_secs") => raw.study.call_timeout_secs = Some(value.parse()?),
            ("study", "on_start") => raw.study.on_start = Some(value.parse()?),
            ("console", "team") => raw.console.team = Some(value),
            ("console", "channel") => raw.console.channel = Some(value),
            ("console", "user") => raw.console.user = Some(value),
            _ => tracing::debug!(section, field, "Ignoring unknown config key"),
        }
        Ok(())
    }

    /// Merge two raw configs (overlay values override base only if explicitly set)
    fn merge_raw(base: RawAppConfig, overlay: RawAppConfig) -> RawAppConfig {
        RawAppConfig {
            game_operator: overlay.game_operator.or(base.game_operator),
            signals: RawSignalConfig {
                start: overlay.signals.start.or(base.signals.start),
                end: overlay.signals.end.or(base.signals.end),
                guess: overlay.signals.guess.or(base.signals.guess),
                clue: overlay.signals.clue.or(base.signals.clue),
            },
            game: RawGameConfig {
                answer_ttl_ms: overlay.game.answer_ttl_ms.or(base.game.answer_ttl_ms),
                origin_symbol: overlay.game.origin_symbol.or(base.game.origin_symbol),
            },
            study: RawStudyConfig {
                source_url: overlay.study.source_url.or(base.study.source_url),
                source_file: overlay.study.source_file.or(base.study.source_file),
                call_timeout_secs: overlay
                    .study
                    .call_timeout_secs
                    .or(base.study.call_timeout_secs),
                on_start: overlay.study.on_start.or(base.study.on_start),
            },
            console: RawConsoleConfig {
                team: overlay.console.team.or(base.console.team),
                channel: overlay.console.channel.or(base.console.channel),
                user: overlay.console.user.or(base.console.user),
            },
        }
    }

    /// Convert raw config to final config with defaults applied
    fn finalize(raw: RawAppConfig) -> AppConfig {
        let signals = SignalConfig::default();
        AppConfig {
            game_operator: raw.game_operator.unwrap_or_default(),
            signals: SignalConfig {
                start: raw.signals.start.unwrap_or(signals.start),
                end: raw.signals.end.unwrap_or(signals.end),
                guess: raw.signals.guess.unwrap_or(signals.guess),
                clue: raw.signals.clue.unwrap_or(signals.clue),
            },
            game: GameConfig {
                answer_ttl_ms: raw.game.answer_ttl_ms.unwrap_or(DEFAULT_ANSWER_TTL_MS),
                origin_symbol: raw
                    .game
                    .origin_symbol
                    .unwrap_or_else(|| DEFAULT_ORIGIN_SYMBOL.to_string()),
            },
            study: StudyConfig {
                source_url: raw.study.source_url,
                source_file: raw.study.source_file,
                call_timeout_secs: raw
                    .study
                    .call_timeout_secs
                    .unwrap_or(DEFAULT_CALL_TIMEOUT_SECS),
                on_start: raw.study.on_start.unwrap_or(false),
            },
            console: ConsoleConfig {
                team: raw
                    .console
                    .team
                    .unwrap_or_else(|| DEFAULT_CONSOLE_TEAM.to_string()),
                channel: raw
                    .console
                    .channel
                    .unwrap_or_else(|| DEFAULT_CONSOLE_CHANNEL.to_string()),
                user: raw
                    .console
                    .user
                    .unwrap_or_else(|| DEFAULT_CONSOLE_USER.to_string()),
            },
        }
    }

    /// Load config from a specific path (for testing)
    #[cfg(test)]
    pub fn load_from_path(path: &Path) -> Result<AppConfig> {
        if path.exists() {
            Ok(Self::finalize(Self::read_raw(path)?))
        } else {
            Ok(AppConfig::default())
        }
    }
}
