//! Classification of ambient messages by configured prefix

use crate::config::SignalConfig;

/// Intent of an ambient message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Start,
    End,
    Guess,
    Clue,
}

impl Signal {
    /// Match `text` against the configured prefixes
    ///
    /// Checked in order start, end, guess, clue; the first match wins.
    /// Leading whitespace is ignored and empty prefixes never match.
    pub fn classify(signals: &SignalConfig, text: &str) -> Option<Self> {
        let text = text.trim_start();
        [
            (Self::Start, &signals.start),
            (Self::End, &signals.end),
            (Self::Guess, &signals.guess),
            (Self::Clue, &signals.clue),
        ]
        .into_iter()
        .find(|(_, prefix)| !prefix.is_empty() && text.starts_with(prefix.as_str()))
        .map(|(signal, _)| signal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signals() -> SignalConfig {
        SignalConfig {
            start: "trivia:start".to_string(),
            end: "trivia:end".to_string(),
            guess: ">".to_string(),
            clue: "clue:".to_string(),
        }
    }

    #[test]
    fn classifies_each_prefix() {
        let signals = signals();
        assert_eq!(Signal::classify(&signals, "trivia:start now"), Some(Signal::Start));
        assert_eq!(Signal::classify(&signals, "trivia:end"), Some(Signal::End));
        assert_eq!(Signal::classify(&signals, "> Yesterday"), Some(Signal::Guess));
        assert_eq!(Signal::classify(&signals, "clue: 1975"), Some(Signal::Clue));
    }

    #[test]
    fn unmatched_text_is_none() {
        assert_eq!(Signal::classify(&signals(), "just chatting"), None);
    }

    #[test]
    fn leading_whitespace_is_ignored() {
        assert_eq!(Signal::classify(&signals(), "   > Yesterday"), Some(Signal::Guess));
    }

    #[test]
    fn prefix_must_be_at_start() {
        assert_eq!(Signal::classify(&signals(), "say trivia:start"), None);
    }

    #[test]
    fn earlier_signal_wins_on_overlap() {
        let signals = SignalConfig {
            start: "!go".to_string(),
            end: "!go home".to_string(),
            guess: ">".to_string(),
            clue: "?".to_string(),
        };
        assert_eq!(Signal::classify(&signals, "!go home"), Some(Signal::Start));
    }

    #[test]
    fn empty_prefix_never_matches() {
        let signals = SignalConfig {
            clue: String::new(),
            ..signals()
        };
        assert_eq!(Signal::classify(&signals, "anything"), None);
    }
}
