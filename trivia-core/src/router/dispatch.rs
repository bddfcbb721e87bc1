//! EventRouter: decides what to do with each inbound chat event
//!
//! The router holds no state of its own. Routing happens in two steps:
//! [`EventRouter::prepare`] consults and mutates the session registry and
//! the answer cache, and [`EventRouter::execute`] performs the store calls
//! and replies that follow. Failures are logged and never propagate;
//! players simply see no reaction from the bot.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use super::answer::Answer;
use super::signal::Signal;
use crate::cache::AnswerCache;
use crate::config::{GameConfig, SignalConfig};
use crate::error::KnowledgeError;
use crate::events::{EventBus, TriviaEvent};
use crate::knowledge::KnowledgeStore;
use crate::messenger::{
    ChatMessage, InboundEvent, ItemKind, Messenger, ReactionEvent, ReactionKind,
};
use crate::session::SessionRegistry;

/// What the router did with an event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Nothing to do (no signal, inactive game, expired guess, other emoji)
    Ignored,
    /// The reacted guess had more than one part
    Ambiguous,
    GameStarted,
    GameStopped,
    GuessCached,
    ClueDispatched,
    Responded,
    LearnedTrack { track: String },
    LearnedArtist { artist: String },
    /// A knowledge action failed; already logged
    Failed { reason: String },
}

/// Work left after an event's state changes have been applied
///
/// Produced by [`EventRouter::prepare`] and carried out by
/// [`EventRouter::execute`]. Only store calls and replies are deferred.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Nothing left to do
    Done(Route),
    /// Send a lifecycle reply
    Reply {
        message: ChatMessage,
        text: String,
        route: Route,
    },
    /// Answer a message addressed to the bot
    Respond(ChatMessage),
    /// Ask the store to answer a clue
    Guess(ChatMessage),
    /// Learn the reacted guess as a track, then guess its artist
    LearnTrack {
        guess: ChatMessage,
        answer: String,
        user: String,
    },
    /// Learn the reacted guess as an artist
    LearnArtist { answer: String, user: String },
}

/// Routes inbound events to game and knowledge actions
pub struct EventRouter {
    sessions: Arc<SessionRegistry>,
    answers: Arc<AnswerCache>,
    store: Arc<dyn KnowledgeStore>,
    messenger: Arc<dyn Messenger>,
    event_bus: Arc<dyn EventBus>,
    signals: SignalConfig,
    game: GameConfig,
    call_timeout: Duration,
}

impl EventRouter {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        sessions: Arc<SessionRegistry>,
        answers: Arc<AnswerCache>,
        store: Arc<dyn KnowledgeStore>,
        messenger: Arc<dyn Messenger>,
        event_bus: Arc<dyn EventBus>,
        signals: SignalConfig,
        game: GameConfig,
        call_timeout: Duration,
    ) -> Self {
        Self {
            sessions,
            answers,
            store,
            messenger,
            event_bus,
            signals,
            game,
            call_timeout,
        }
    }

    /// Handle one inbound event start to finish
    pub async fn handle(&self, event: InboundEvent) -> Route {
        let action = self.prepare(event).await;
        self.execute(action).await
    }

    /// Apply the session and answer cache effects of `event`
    ///
    /// Callers must prepare events one at a time, in arrival order. The
    /// returned action may then run concurrently with later events.
    pub async fn prepare(&self, event: InboundEvent) -> Action {
        match event {
            InboundEvent::Reaction(reaction) => self.prepare_reaction(reaction).await,
            InboundEvent::Message(message) => self.prepare_message(message).await,
        }
    }

    /// Carry out the store calls and replies of a prepared event
    pub async fn execute(&self, action: Action) -> Route {
        match action {
            Action::Done(route) => route,
            Action::Reply {
                message,
                text,
                route,
            } => {
                self.reply(&message, &text).await;
                route
            }
            Action::Respond(message) => match self.bounded(self.store.respond(&message)).await {
                Ok(()) => Route::Responded,
                Err(e) => failed("respond", e),
            },
            Action::Guess(message) => match self.bounded(self.store.guess(&message)).await {
                Ok(()) => Route::ClueDispatched,
                Err(e) => failed("guess", e),
            },
            Action::LearnTrack {
                guess,
                answer,
                user,
            } => {
                let origin = self.game.origin_symbol.as_str();
                let track = match self.bounded(self.store.learn_track(&answer, origin)).await {
                    Ok(track) => track,
                    Err(e) => return failed("learn track", e),
                };
                info!(track = %track.name, user = %user, "Learned track from reaction");

                if let Err(e) = self
                    .bounded(self.store.guess_artist_by_track(&guess, &track))
                    .await
                {
                    warn!(track = %track.name, error = %e, "Failed to guess artist by track");
                }
                Route::LearnedTrack { track: track.name }
            }
            Action::LearnArtist { answer, user } => {
                let origin = self.game.origin_symbol.as_str();
                match self.bounded(self.store.learn_artist(&answer, origin)).await {
                    Ok(artist) => {
                        info!(artist = %artist.name, user = %user, "Learned artist from reaction");
                        Route::LearnedArtist {
                            artist: artist.name,
                        }
                    }
                    Err(e) => failed("learn artist", e),
                }
            }
        }
    }

    async fn prepare_reaction(&self, reaction: ReactionEvent) -> Action {
        if reaction.item_kind != ItemKind::Message {
            return Action::Done(Route::Ignored);
        }
        if let ReactionKind::Other(_) = reaction.reaction {
            return Action::Done(Route::Ignored);
        }

        let Some(guess) = self.answers.get(&reaction.item_ts).await else {
            debug!(ts = %reaction.item_ts, "Reaction on unknown or expired guess");
            return Action::Done(Route::Ignored);
        };

        let answer = match Answer::parse(&guess.text) {
            Answer::Single(answer) => answer,
            Answer::Ambiguous => {
                debug!(text = %guess.text, "Ignoring ambiguous answer");
                return Action::Done(Route::Ambiguous);
            }
        };

        match reaction.reaction {
            ReactionKind::Note => Action::LearnTrack {
                guess,
                answer,
                user: reaction.user,
            },
            ReactionKind::Art => Action::LearnArtist {
                answer,
                user: reaction.user,
            },
            ReactionKind::Other(_) => Action::Done(Route::Ignored),
        }
    }

    async fn prepare_message(&self, message: ChatMessage) -> Action {
        if message.kind.is_addressed() {
            return Action::Respond(message);
        }

        let Some(signal) = Signal::classify(&self.signals, &message.text) else {
            return Action::Done(Route::Ignored);
        };
        let Some((team, channel)) = message.location() else {
            debug!(ts = %message.ts, ?signal, "Signal without team or channel");
            return Action::Done(Route::Ignored);
        };
        let (team, channel) = (team.to_string(), channel.to_string());

        match signal {
            Signal::Start => {
                self.sessions.set_active(&team, &channel, true).await;
                info!(user = %message.user, team = %team, channel = %channel, "Game started");
                self.event_bus
                    .publish(TriviaEvent::GameStarted {
                        team,
                        channel,
                        user: message.user.clone(),
                    })
                    .await;
                Action::Reply {
                    text: format!("I am ready! <@{}>", message.user),
                    message,
                    route: Route::GameStarted,
                }
            }
            Signal::End => {
                self.sessions.set_active(&team, &channel, false).await;
                info!(user = %message.user, team = %team, channel = %channel, "Game stopped");
                self.event_bus
                    .publish(TriviaEvent::GameStopped {
                        team,
                        channel,
                        user: message.user.clone(),
                    })
                    .await;
                Action::Reply {
                    message,
                    text: "Good game!".to_string(),
                    route: Route::GameStopped,
                }
            }
            Signal::Guess => {
                if !self.sessions.is_active(&team, &channel).await {
                    return Action::Done(Route::Ignored);
                }
                debug!(ts = %message.ts, text = %message.text, "Guess saved");
                let ts = message.ts.clone();
                self.answers
                    .put(&ts, message, self.game.answer_ttl())
                    .await;
                self.event_bus
                    .publish(TriviaEvent::GuessCached { team, channel, ts })
                    .await;
                Action::Done(Route::GuessCached)
            }
            Signal::Clue => {
                if !self.sessions.is_active(&team, &channel).await {
                    return Action::Done(Route::Ignored);
                }
                info!(text = %message.text, team = %team, channel = %channel, "It's time to guess!");
                Action::Guess(message)
            }
        }
    }

    /// Reply, logging transport failures
    async fn reply(&self, message: &ChatMessage, text: &str) {
        if let Err(e) = self.messenger.reply(message, text).await {
            warn!(messenger = %self.messenger.name(), error = %e, "Failed to reply");
        }
    }

    /// Run a knowledge store call under the configured timeout
    async fn bounded<T>(
        &self,
        call: impl Future<Output = Result<T, KnowledgeError>>,
    ) -> Result<T, KnowledgeError> {
        tokio::time::timeout(self.call_timeout, call)
            .await
            .map_err(|_| KnowledgeError::Timeout(self.call_timeout))?
    }
}

fn failed(action: &str, error: KnowledgeError) -> Route {
    warn!(action, error = %error, "Knowledge action failed");
    Route::Failed {
        reason: error.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::MemoryEventBus;
    use crate::knowledge::{KnowledgeCall, RecordingKnowledgeStore};
    use crate::messenger::{MessageKind, MockMessenger};

    struct Harness {
        router: EventRouter,
        sessions: Arc<SessionRegistry>,
        answers: Arc<AnswerCache>,
        store: Arc<RecordingKnowledgeStore>,
        messenger: Arc<MockMessenger>,
        event_bus: Arc<MemoryEventBus>,
    }

    fn harness_with(store: RecordingKnowledgeStore, game: GameConfig) -> Harness {
        let sessions = Arc::new(SessionRegistry::new());
        let answers = Arc::new(AnswerCache::new());
        let store = Arc::new(store);
        let messenger = Arc::new(MockMessenger::default());
        let event_bus = Arc::new(MemoryEventBus::new(100));
        let router = EventRouter::new(
            sessions.clone(),
            answers.clone(),
            store.clone(),
            messenger.clone(),
            event_bus.clone(),
            SignalConfig::default(),
            game,
            Duration::from_secs(5),
        );
        Harness {
            router,
            sessions,
            answers,
            store,
            messenger,
            event_bus,
        }
    }

    fn harness() -> Harness {
        harness_with(RecordingKnowledgeStore::new(), GameConfig::default())
    }

    fn say(ts: &str, text: &str) -> InboundEvent {
        InboundEvent::Message(ChatMessage::ambient(ts, "T1", "C1", "U1", text))
    }

    fn react(ts: &str, reaction: ReactionKind) -> InboundEvent {
        InboundEvent::Reaction(ReactionEvent::on_message(ts, reaction, "U2"))
    }

    async fn cache_guess(h: &Harness, ts: &str, text: &str) {
        h.answers
            .put(
                ts,
                ChatMessage::ambient(ts, "T1", "C1", "U1", text),
                Duration::from_secs(10),
            )
            .await;
    }

    // ==================== Lifecycle Tests ====================

    #[tokio::test]
    async fn start_signal_activates_and_replies() {
        let h = harness();

        let route = h.router.handle(say("1", "trivia:start")).await;

        assert_eq!(route, Route::GameStarted);
        assert!(h.sessions.is_active("T1", "C1").await);
        assert_eq!(
            h.messenger.reply_texts().await,
            vec!["I am ready! <@U1>".to_string()]
        );
        assert!(matches!(
            h.event_bus.events_from(0).await[0].1,
            TriviaEvent::GameStarted { .. }
        ));
    }

    #[tokio::test]
    async fn end_signal_deactivates_and_replies() {
        let h = harness();
        h.router.handle(say("1", "trivia:start")).await;

        let route = h.router.handle(say("2", "trivia:end")).await;

        assert_eq!(route, Route::GameStopped);
        assert!(!h.sessions.is_active("T1", "C1").await);
        assert_eq!(h.messenger.reply_texts().await[1], "Good game!");
    }

    #[tokio::test]
    async fn end_signal_on_stopped_channel_is_idempotent() {
        let h = harness();

        let route = h.router.handle(say("1", "trivia:end")).await;

        assert_eq!(route, Route::GameStopped);
        assert!(!h.sessions.is_active("T1", "C1").await);
    }

    #[tokio::test]
    async fn start_without_channel_is_ignored() {
        let h = harness();
        let mut message = ChatMessage::ambient("1", "T1", "C1", "U1", "trivia:start");
        message.channel = None;

        let route = h.router.handle(InboundEvent::Message(message)).await;

        assert_eq!(route, Route::Ignored);
        assert!(h.messenger.replies().await.is_empty());
    }

    #[tokio::test]
    async fn reply_failure_does_not_stop_game_start() {
        let h = harness();
        h.messenger.fail_replies(true);

        let route = h.router.handle(say("1", "trivia:start")).await;

        assert_eq!(route, Route::GameStarted);
        assert!(h.sessions.is_active("T1", "C1").await);
    }

    // ==================== Guess Tests ====================

    #[tokio::test]
    async fn guess_while_active_is_cached() {
        let h = harness();
        h.sessions.set_active("T1", "C1", true).await;

        let route = h.router.handle(say("7.1", "> Yesterday")).await;

        assert_eq!(route, Route::GuessCached);
        assert_eq!(h.answers.get("7.1").await.unwrap().text, "> Yesterday");
    }

    #[tokio::test]
    async fn guess_while_inactive_is_not_cached() {
        let h = harness();

        let route = h.router.handle(say("7.1", "> Yesterday")).await;

        assert_eq!(route, Route::Ignored);
        assert!(h.answers.get("7.1").await.is_none());
    }

    #[tokio::test]
    async fn guess_in_other_channel_is_not_cached() {
        let h = harness();
        h.sessions.set_active("T1", "C2", true).await;

        h.router.handle(say("7.1", "> Yesterday")).await;

        assert!(h.answers.is_empty().await);
    }

    #[tokio::test]
    async fn cached_guess_uses_configured_ttl() {
        let game = GameConfig {
            answer_ttl_ms: 20,
            ..GameConfig::default()
        };
        let h = harness_with(RecordingKnowledgeStore::new(), game);
        h.sessions.set_active("T1", "C1", true).await;
        h.router.handle(say("7.1", "> Yesterday")).await;

        tokio::time::sleep(Duration::from_millis(50)).await;

        let route = h.router.handle(react("7.1", ReactionKind::Note)).await;
        assert_eq!(route, Route::Ignored);
        assert!(h.store.calls().await.is_empty());
    }

    // ==================== Clue Tests ====================

    #[tokio::test]
    async fn clue_while_active_dispatches_guess() {
        let h = harness();
        h.sessions.set_active("T1", "C1", true).await;

        let route = h.router.handle(say("9", "clue: 1975")).await;

        assert_eq!(route, Route::ClueDispatched);
        assert_eq!(
            h.store.calls().await,
            vec![KnowledgeCall::Guess {
                ts: "9".to_string()
            }]
        );
    }

    #[tokio::test]
    async fn clue_while_inactive_is_ignored() {
        let h = harness();

        let route = h.router.handle(say("9", "clue: 1975")).await;

        assert_eq!(route, Route::Ignored);
        assert!(h.store.calls().await.is_empty());
    }

    // ==================== Reaction Tests ====================

    #[tokio::test]
    async fn note_reaction_learns_track_then_guesses_artist() {
        let h = harness();
        cache_guess(&h, "5.5", "Bohemian Rhapsody").await;

        let route = h.router.handle(react("5.5", ReactionKind::Note)).await;

        assert_eq!(
            route,
            Route::LearnedTrack {
                track: "Bohemian Rhapsody".to_string()
            }
        );
        assert_eq!(
            h.store.calls().await,
            vec![
                KnowledgeCall::LearnTrack {
                    name: "Bohemian Rhapsody".to_string(),
                    origin_symbol: ">".to_string()
                },
                KnowledgeCall::GuessArtistByTrack {
                    ts: "5.5".to_string(),
                    track: "Bohemian Rhapsody".to_string()
                },
            ]
        );
    }

    #[tokio::test]
    async fn art_reaction_learns_artist() {
        let h = harness();
        cache_guess(&h, "5.5", "Queen").await;

        let route = h.router.handle(react("5.5", ReactionKind::Art)).await;

        assert_eq!(
            route,
            Route::LearnedArtist {
                artist: "Queen".to_string()
            }
        );
        assert_eq!(
            h.store.calls().await,
            vec![KnowledgeCall::LearnArtist {
                name: "Queen".to_string(),
                origin_symbol: ">".to_string()
            }]
        );
    }

    #[tokio::test]
    async fn ambiguous_answer_takes_no_action() {
        let h = harness();
        cache_guess(&h, "5.5", "Queen - Bohemian Rhapsody").await;

        for reaction in [ReactionKind::Note, ReactionKind::Art] {
            let route = h.router.handle(react("5.5", reaction)).await;
            assert_eq!(route, Route::Ambiguous);
        }
        assert!(h.store.calls().await.is_empty());
    }

    #[tokio::test]
    async fn reaction_on_uncached_message_is_ignored() {
        let h = harness();

        let route = h.router.handle(react("404", ReactionKind::Note)).await;

        assert_eq!(route, Route::Ignored);
        assert!(h.store.calls().await.is_empty());
    }

    #[tokio::test]
    async fn other_emoji_is_ignored() {
        let h = harness();
        cache_guess(&h, "5.5", "Queen").await;

        let route = h
            .router
            .handle(react("5.5", ReactionKind::from_emoji("tada")))
            .await;

        assert_eq!(route, Route::Ignored);
        assert!(h.store.calls().await.is_empty());
    }

    #[tokio::test]
    async fn reaction_on_non_message_item_is_ignored() {
        let h = harness();
        cache_guess(&h, "5.5", "Queen").await;
        let mut reaction = ReactionEvent::on_message("5.5", ReactionKind::Art, "U2");
        reaction.item_kind = ItemKind::Other;

        let route = h.router.handle(InboundEvent::Reaction(reaction)).await;

        assert_eq!(route, Route::Ignored);
    }

    #[tokio::test]
    async fn failed_learn_track_skips_artist_guess() {
        let h = harness();
        h.store.fail_all(true);
        cache_guess(&h, "5.5", "Bohemian Rhapsody").await;

        let route = h.router.handle(react("5.5", ReactionKind::Note)).await;

        assert!(matches!(route, Route::Failed { .. }));
        assert_eq!(h.store.calls().await.len(), 1);
    }

    // ==================== Prepare Tests ====================

    #[tokio::test]
    async fn prepare_applies_state_and_defers_io() {
        let h = harness();

        let start = h.router.prepare(say("1", "trivia:start")).await;
        let guess = h.router.prepare(say("2", "> Queen")).await;
        let clue = h.router.prepare(say("3", "clue: 1975")).await;

        assert!(h.sessions.is_active("T1", "C1").await);
        assert_eq!(guess, Action::Done(Route::GuessCached));
        assert!(h.answers.get("2").await.is_some());
        assert!(matches!(start, Action::Reply { route: Route::GameStarted, .. }));
        assert!(matches!(clue, Action::Guess(_)));
        assert!(h.messenger.replies().await.is_empty());
        assert!(h.store.calls().await.is_empty());
    }

    #[tokio::test]
    async fn guess_prepared_after_end_is_not_cached() {
        let h = harness();

        h.router.prepare(say("1", "trivia:start")).await;
        h.router.prepare(say("2", "> Queen")).await;
        h.router.prepare(say("3", "trivia:end")).await;
        let late = h.router.prepare(say("4", "> Queen")).await;

        assert_eq!(late, Action::Done(Route::Ignored));
        assert!(h.answers.get("2").await.is_some());
        assert!(h.answers.get("4").await.is_none());
    }

    #[tokio::test]
    async fn reaction_resolves_guess_at_prepare_time() {
        let h = harness();
        cache_guess(&h, "5.5", "Queen").await;

        let action = h.router.prepare(react("5.5", ReactionKind::Art)).await;

        assert_eq!(
            action,
            Action::LearnArtist {
                answer: "Queen".to_string(),
                user: "U2".to_string()
            }
        );
        assert!(h.store.calls().await.is_empty());
    }

    // ==================== Direct Message Tests ====================

    #[tokio::test]
    async fn addressed_messages_always_get_a_response() {
        let h = harness();

        for (ts, kind) in [
            ("1", MessageKind::DirectMessage),
            ("2", MessageKind::DirectMention),
            ("3", MessageKind::Mention),
        ] {
            let message = ChatMessage::ambient(ts, "T1", "C1", "U1", "trivia:start").with_kind(kind);
            let route = h.router.handle(InboundEvent::Message(message)).await;
            assert_eq!(route, Route::Responded);
        }

        assert!(!h.sessions.is_active("T1", "C1").await);
        assert_eq!(h.store.calls().await.len(), 3);
    }

    #[tokio::test]
    async fn ambient_chatter_is_ignored() {
        let h = harness();
        h.sessions.set_active("T1", "C1", true).await;

        let route = h.router.handle(say("1", "nice one")).await;

        assert_eq!(route, Route::Ignored);
        assert!(h.store.calls().await.is_empty());
    }
}
