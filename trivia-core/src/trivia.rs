//! Trivia: the bot, wired together
//!
//! Owns the session registry and answer cache, builds the router and the
//! study service, and exposes the two entry points: [`Trivia::study`] and
//! [`Trivia::listen`].

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::OnceCell;
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, trace};

use crate::cache::AnswerCache;
use crate::config::TriviaConfig;
use crate::content::ContentSource;
use crate::error::{ContentError, KnowledgeError, StudyError, TriviaError};
use crate::events::{EventBus, EventLogger};
use crate::knowledge::KnowledgeStore;
use crate::messenger::Messenger;
use crate::router::{Action, EventRouter};
use crate::session::SessionRegistry;
use crate::study::{BatchReport, LearningPipeline, StudyService};

/// Lower bound for the expired-answer sweep interval
const MIN_PURGE_PERIOD: Duration = Duration::from_secs(1);

/// The trivia bot
pub struct Trivia {
    config: TriviaConfig,
    messenger: Arc<dyn Messenger>,
    store: Arc<dyn KnowledgeStore>,
    event_bus: Arc<dyn EventBus>,
    sessions: Arc<SessionRegistry>,
    answers: Arc<AnswerCache>,
    router: Arc<EventRouter>,
    study: Option<StudyService>,
    store_ready: OnceCell<()>,
}

impl Trivia {
    /// Wire the bot together
    ///
    /// Without a content source, [`Trivia::study`] fails with
    /// [`ContentError::NotConfigured`].
    pub fn new(
        config: TriviaConfig,
        messenger: Arc<dyn Messenger>,
        store: Arc<dyn KnowledgeStore>,
        source: Option<Arc<dyn ContentSource>>,
        event_bus: Arc<dyn EventBus>,
    ) -> Self {
        let sessions = Arc::new(SessionRegistry::new());
        let answers = Arc::new(AnswerCache::new());
        let call_timeout = config.study.call_timeout();

        let router = Arc::new(EventRouter::new(
            Arc::clone(&sessions),
            Arc::clone(&answers),
            Arc::clone(&store),
            Arc::clone(&messenger),
            Arc::clone(&event_bus),
            config.signals.clone(),
            config.game.clone(),
            call_timeout,
        ));

        let study = source.map(|source| {
            let pipeline = LearningPipeline::new(Arc::clone(&store), call_timeout);
            StudyService::new(source, pipeline, Arc::clone(&event_bus))
        });

        Self {
            config,
            messenger,
            store,
            event_bus,
            sessions,
            answers,
            router,
            study,
            store_ready: OnceCell::new(),
        }
    }

    pub fn config(&self) -> &TriviaConfig {
        &self.config
    }

    pub fn sessions(&self) -> &Arc<SessionRegistry> {
        &self.sessions
    }

    pub fn answers(&self) -> &Arc<AnswerCache> {
        &self.answers
    }

    pub fn event_bus(&self) -> &Arc<dyn EventBus> {
        &self.event_bus
    }

    /// Spawn a task that logs study results and other bus events
    pub fn spawn_event_logger(&self) -> JoinHandle<()> {
        tokio::spawn(EventLogger::run(self.event_bus.subscribe()))
    }

    /// Run one fetch-and-learn cycle
    ///
    /// Completion is also published on the event bus as `StudyFinished` or
    /// `StudyFailed`.
    pub async fn study(&self) -> Result<BatchReport, TriviaError> {
        self.ensure_store_ready().await?;

        let Some(study) = &self.study else {
            return Err(StudyError::Fetch(ContentError::NotConfigured).into());
        };

        study.study().await.map_err(|e| {
            error!(error = %e, "Something went wrong while studying");
            e.into()
        })
    }

    /// Route inbound events until the connection closes or `shutdown` fires
    ///
    /// Initializes the knowledge store first. Session and answer cache
    /// changes are applied here, one event at a time in arrival order. The
    /// store calls and replies that follow run on their own tasks. On exit,
    /// waits for in-flight handlers.
    pub async fn listen(&self, shutdown: CancellationToken) -> Result<(), TriviaError> {
        self.ensure_store_ready().await?;

        let mut events = self.messenger.connect().await?;
        info!(
            messenger = %self.messenger.name(),
            game_operator = %self.config.game_operator,
            "Listening for games"
        );

        let mut purge = tokio::time::interval(self.purge_period());
        purge.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut handlers = JoinSet::new();
        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    info!("Received shutdown signal");
                    break;
                }
                Some(result) = handlers.join_next(), if !handlers.is_empty() => {
                    if let Err(e) = result {
                        error!(error = %e, "Event handler panicked");
                    }
                }
                _ = purge.tick() => {
                    let purged = self.answers.purge_expired().await;
                    if purged > 0 {
                        trace!(purged, "Purged expired answers");
                    }
                }
                event = events.recv() => {
                    let Some(event) = event else {
                        info!(messenger = %self.messenger.name(), "Connection closed");
                        break;
                    };
                    match self.router.prepare(event).await {
                        Action::Done(route) => trace!(?route, "Event routed"),
                        action => {
                            let router = Arc::clone(&self.router);
                            handlers.spawn(async move {
                                let route = router.execute(action).await;
                                trace!(?route, "Event routed");
                            });
                        }
                    }
                }
            }
        }

        while let Some(result) = handlers.join_next().await {
            if let Err(e) = result {
                error!(error = %e, "Event handler panicked");
            }
        }

        let active = self.sessions.active_channels().await;
        if !active.is_empty() {
            info!(games = ?active, "Stopped listening with games still running");
        }
        Ok(())
    }

    /// How often expired answers are swept while listening
    fn purge_period(&self) -> Duration {
        self.config.game.answer_ttl().max(MIN_PURGE_PERIOD)
    }

    async fn ensure_store_ready(&self) -> Result<(), KnowledgeError> {
        self.store_ready
            .get_or_try_init(|| async {
                self.store.init().await?;
                info!("Knowledge store initialized");
                Ok::<(), KnowledgeError>(())
            })
            .await?;
        Ok(())
    }
}
