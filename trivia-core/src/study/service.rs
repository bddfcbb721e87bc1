//! StudyService: one fetch-and-learn cycle at a time
//!
//! A cycle fetches a batch from the content source and hands it to the
//! learning pipeline. Exactly one `StudyFinished` or `StudyFailed` event is
//! published per cycle. Only one cycle runs at a time; a second trigger
//! while one is in flight is rejected.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{error, info, warn};
use uuid::Uuid;

use super::pipeline::{BatchReport, LearningPipeline};
use crate::content::ContentSource;
use crate::error::StudyError;
use crate::events::{EventBus, TriviaEvent};

/// Runs study cycles against a content source
pub struct StudyService {
    source: Arc<dyn ContentSource>,
    pipeline: LearningPipeline,
    event_bus: Arc<dyn EventBus>,
    /// Held for the duration of a cycle
    in_flight: Mutex<()>,
}

impl StudyService {
    pub fn new(
        source: Arc<dyn ContentSource>,
        pipeline: LearningPipeline,
        event_bus: Arc<dyn EventBus>,
    ) -> Self {
        Self {
            source,
            pipeline,
            event_bus,
            in_flight: Mutex::new(()),
        }
    }

    /// Whether a cycle is currently running
    pub fn is_studying(&self) -> bool {
        self.in_flight.try_lock().is_err()
    }

    /// Run one study cycle
    ///
    /// Fails without learning anything if the batch cannot be fetched.
    /// Per-record failures are reported in the returned [`BatchReport`].
    pub async fn study(&self) -> Result<BatchReport, StudyError> {
        let _guard = self.in_flight.try_lock().map_err(|_| {
            warn!("Study requested while another cycle is running");
            StudyError::AlreadyRunning
        })?;

        let run_id = Uuid::now_v7();
        info!(%run_id, source = %self.source.name(), "Studying");

        let records = match self.source.fetch_batch().await {
            Ok(records) => records,
            Err(e) => {
                error!(%run_id, error = %e, "Something went wrong while fetching study content");
                self.event_bus
                    .publish(TriviaEvent::StudyFailed {
                        run_id,
                        reason: e.to_string(),
                    })
                    .await;
                return Err(e.into());
            }
        };

        let report = self.pipeline.run(run_id, records).await;
        self.event_bus
            .publish(TriviaEvent::StudyFinished {
                report: report.clone(),
            })
            .await;

        Ok(report)
    }
}
