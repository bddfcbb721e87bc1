//! Console messenger: play trivia from a terminal
//!
//! Every stdin line becomes an ambient message in the configured team and
//! channel, with an incrementing `ts`. A few commands produce other events:
//!
//! - `/react <emoji> [ts]` reacts to a message (the last one when `ts` is omitted)
//! - `/dm <text>` sends a direct message to the bot
//! - `/mention <text>` mentions the bot in the channel
//!
//! Replies are written to stdout.

use std::pin::Pin;

use async_trait::async_trait;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::{Mutex, mpsc};
use tracing::{debug, warn};
use trivia_core::{
    ChatMessage, InboundEvent, MessageKind, Messenger, ReactionEvent, ReactionKind,
    TransportError,
};

use crate::config::ConsoleConfig;

type Input = Pin<Box<dyn AsyncBufRead + Send>>;
type Output = Pin<Box<dyn AsyncWrite + Send>>;

/// Messenger reading player lines from a terminal
pub struct ConsoleMessenger {
    config: ConsoleConfig,
    input: Mutex<Option<Input>>,
    output: Mutex<Output>,
}

impl ConsoleMessenger {
    /// Messenger over the process's stdin and stdout
    pub fn new(config: ConsoleConfig) -> Self {
        Self::with_io(
            config,
            BufReader::new(tokio::io::stdin()),
            tokio::io::stdout(),
        )
    }

    /// Messenger over arbitrary streams
    pub fn with_io(
        config: ConsoleConfig,
        input: impl AsyncBufRead + Send + 'static,
        output: impl AsyncWrite + Send + 'static,
    ) -> Self {
        Self {
            config,
            input: Mutex::new(Some(Box::pin(input))),
            output: Mutex::new(Box::pin(output)),
        }
    }
}

#[async_trait]
impl Messenger for ConsoleMessenger {
    fn name(&self) -> &str {
        "console"
    }

    async fn connect(&self) -> Result<mpsc::Receiver<InboundEvent>, TransportError> {
        let input = self.input.lock().await.take();
        let Some(input) = input else {
            return Err(TransportError::ConnectFailed {
                messenger: self.name().to_string(),
                reason: "console input already taken".to_string(),
            });
        };

        let (tx, rx) = mpsc::channel(64);
        let mut parser = LineParser::new(self.config.clone());
        tokio::spawn(async move {
            let mut lines = input.lines();
            loop {
                match lines.next_line().await {
                    Ok(Some(line)) => {
                        let Some(event) = parser.parse(&line) else {
                            continue;
                        };
                        if tx.send(event).await.is_err() {
                            debug!("Console listener dropped");
                            break;
                        }
                    }
                    Ok(None) => break,
                    Err(e) => {
                        warn!(error = %e, "Failed to read console input");
                        break;
                    }
                }
            }
            debug!("Console input closed");
        });

        Ok(rx)
    }

    async fn reply(&self, message: &ChatMessage, text: &str) -> Result<(), TransportError> {
        let line = format!("[bot → {}] {}\n", message.ts, text);
        let mut output = self.output.lock().await;
        output
            .write_all(line.as_bytes())
            .await
            .map_err(|e| TransportError::ReplyFailed(e.to_string()))?;
        output
            .flush()
            .await
            .map_err(|e| TransportError::ReplyFailed(e.to_string()))
    }
}

/// Turns console lines into inbound events
struct LineParser {
    config: ConsoleConfig,
    next_ts: u64,
    last_ts: Option<String>,
}

impl LineParser {
    fn new(config: ConsoleConfig) -> Self {
        Self {
            config,
            next_ts: 1,
            last_ts: None,
        }
    }

    fn parse(&mut self, line: &str) -> Option<InboundEvent> {
        let line = line.trim_end();
        if line.trim().is_empty() {
            return None;
        }

        if let Some(args) = line.strip_prefix("/react") {
            return self.reaction(args);
        }
        if let Some(text) = line.strip_prefix("/dm ") {
            return Some(self.message(text, MessageKind::DirectMessage));
        }
        if let Some(text) = line.strip_prefix("/mention ") {
            return Some(self.message(text, MessageKind::Mention));
        }
        Some(self.message(line, MessageKind::Ambient))
    }

    fn message(&mut self, text: &str, kind: MessageKind) -> InboundEvent {
        let ts = self.next_ts.to_string();
        self.next_ts += 1;
        self.last_ts = Some(ts.clone());

        let message = ChatMessage::ambient(
            ts,
            &self.config.team,
            &self.config.channel,
            &self.config.user,
            text,
        )
        .with_kind(kind);
        InboundEvent::Message(message)
    }

    fn reaction(&self, args: &str) -> Option<InboundEvent> {
        let mut parts = args.split_whitespace();
        let Some(emoji) = parts.next() else {
            warn!("Usage: /react <emoji> [ts]");
            return None;
        };
        let Some(ts) = parts.next().map(str::to_string).or_else(|| self.last_ts.clone()) else {
            warn!("Nothing to react to yet");
            return None;
        };

        let reaction = match emoji.trim_matches(':') {
            "note" => ReactionKind::Note,
            name => ReactionKind::from_emoji(name),
        };
        Some(InboundEvent::Reaction(ReactionEvent::on_message(
            ts,
            reaction,
            &self.config.user,
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncReadExt;

    fn parser() -> LineParser {
        LineParser::new(ConsoleConfig::default())
    }

    fn message(event: Option<InboundEvent>) -> ChatMessage {
        match event {
            Some(InboundEvent::Message(message)) => message,
            other => panic!("expected a message, got {:?}", other),
        }
    }

    fn reaction(event: Option<InboundEvent>) -> ReactionEvent {
        match event {
            Some(InboundEvent::Reaction(reaction)) => reaction,
            other => panic!("expected a reaction, got {:?}", other),
        }
    }

    // ==================== Parser Tests ====================

    #[test]
    fn plain_lines_are_ambient_with_incrementing_ts() {
        let mut parser = parser();

        let first = message(parser.parse("trivia:start"));
        let second = message(parser.parse("> Yesterday"));

        assert_eq!(first.ts, "1");
        assert_eq!(second.ts, "2");
        assert_eq!(second.text, "> Yesterday");
        assert_eq!(second.kind, MessageKind::Ambient);
        assert_eq!(second.location(), Some(("local", "console")));
        assert_eq!(second.user, "player");
    }

    #[test]
    fn blank_lines_are_skipped() {
        let mut parser = parser();

        assert!(parser.parse("   ").is_none());
        assert_eq!(message(parser.parse("hello")).ts, "1");
    }

    #[test]
    fn dm_and_mention_commands_set_kind() {
        let mut parser = parser();

        let dm = message(parser.parse("/dm what do you know?"));
        let mention = message(parser.parse("/mention hey bot"));

        assert_eq!(dm.kind, MessageKind::DirectMessage);
        assert_eq!(dm.text, "what do you know?");
        assert_eq!(mention.kind, MessageKind::Mention);
        assert_eq!(mention.text, "hey bot");
    }

    #[test]
    fn react_with_explicit_ts() {
        let mut parser = parser();

        let event = reaction(parser.parse("/react art 7"));

        assert_eq!(event.item_ts, "7");
        assert_eq!(event.reaction, ReactionKind::Art);
    }

    #[test]
    fn react_defaults_to_last_message() {
        let mut parser = parser();
        parser.parse("> Bohemian Rhapsody");

        let event = reaction(parser.parse("/react :musical_note:"));

        assert_eq!(event.item_ts, "1");
        assert_eq!(event.reaction, ReactionKind::Note);
    }

    #[test]
    fn react_without_messages_is_skipped() {
        let mut parser = parser();

        assert!(parser.parse("/react note").is_none());
        assert!(parser.parse("/react").is_none());
    }

    // ==================== Messenger Tests ====================

    #[tokio::test]
    async fn connect_streams_input_lines() {
        let input: &'static [u8] = b"trivia:start\n\n/react note\n";
        let messenger =
            ConsoleMessenger::with_io(ConsoleConfig::default(), input, tokio::io::sink());

        let mut rx = messenger.connect().await.unwrap();

        assert!(matches!(rx.recv().await, Some(InboundEvent::Message(_))));
        assert!(matches!(rx.recv().await, Some(InboundEvent::Reaction(_))));
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn connect_twice_fails() {
        let input: &'static [u8] = b"";
        let messenger =
            ConsoleMessenger::with_io(ConsoleConfig::default(), input, tokio::io::sink());

        messenger.connect().await.unwrap();
        let result = messenger.connect().await;

        assert!(matches!(result, Err(TransportError::ConnectFailed { .. })));
    }

    #[tokio::test]
    async fn reply_writes_line() {
        let input: &'static [u8] = b"";
        let (writer, mut reader) = tokio::io::duplex(256);
        let messenger = ConsoleMessenger::with_io(ConsoleConfig::default(), input, writer);
        let message = ChatMessage::ambient("3", "local", "console", "player", "clue: 1975");

        messenger.reply(&message, "> Queen").await.unwrap();
        drop(messenger);

        let mut written = String::new();
        reader.read_to_string(&mut written).await.unwrap();
        assert_eq!(written, "[bot → 3] > Queen\n");
    }
}
