//! LearningPipeline: feeds a batch into the knowledge store sequentially
//!
//! Records are learned strictly one at a time, in input order. Each call is
//! awaited (bounded by a timeout) before the next one starts. A record that
//! fails is logged and recorded in the report; the rest of the batch still
//! runs.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::KnowledgeError;
use crate::knowledge::{KnowledgeStore, LearnableRecord};

/// A record that could not be learned
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordFailure {
    /// Position in the batch
    pub index: usize,
    pub record: LearnableRecord,
    pub reason: String,
}

/// Outcome of one batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    pub run_id: Uuid,
    pub total: usize,
    pub learned: usize,
    pub failures: Vec<RecordFailure>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl BatchReport {
    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    /// True when every record was learned
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Sequential, failure-isolating learner
pub struct LearningPipeline {
    store: Arc<dyn KnowledgeStore>,
    call_timeout: Duration,
}

impl LearningPipeline {
    pub fn new(store: Arc<dyn KnowledgeStore>, call_timeout: Duration) -> Self {
        Self {
            store,
            call_timeout,
        }
    }

    /// Learn every record of the batch, in order
    pub async fn run(&self, run_id: Uuid, records: Vec<LearnableRecord>) -> BatchReport {
        let started_at = Utc::now();
        let total = records.len();
        let mut learned = 0;
        let mut failures = Vec::new();

        info!(%run_id, total, "Learning batch");

        for (index, record) in records.into_iter().enumerate() {
            match self.learn_one(&record).await {
                Ok(()) => {
                    learned += 1;
                    debug!(%run_id, index, track = %record.track, "Learned record");
                }
                Err(e) => {
                    warn!(
                        %run_id,
                        index,
                        artist = %record.artist,
                        track = %record.track,
                        error = %e,
                        "Failed to learn record"
                    );
                    failures.push(RecordFailure {
                        index,
                        record,
                        reason: e.to_string(),
                    });
                }
            }
        }

        let report = BatchReport {
            run_id,
            total,
            learned,
            failures,
            started_at,
            finished_at: Utc::now(),
        };

        if report.is_clean() {
            info!(%run_id, learned, "Batch complete");
        } else {
            warn!(%run_id, learned, failed = report.failed(), "Batch completed with failures");
        }
        report
    }

    async fn learn_one(&self, record: &LearnableRecord) -> Result<(), KnowledgeError> {
        tokio::time::timeout(self.call_timeout, self.store.learn(record))
            .await
            .map_err(|_| KnowledgeError::Timeout(self.call_timeout))??;
        Ok(())
    }
}
