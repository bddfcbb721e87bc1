pub mod config;
pub mod play;
pub mod study;

use std::sync::Arc;

use anyhow::Result;
use trivia_core::content::{self, ContentSource};
use trivia_core::{
    BatchReport, ContentError, MemoryEventBus, MemoryKnowledgeStore, Messenger, Trivia,
};

use crate::config::AppConfig;

/// Events kept for replay by the in-process bus
const EVENT_BUS_CAPACITY: usize = 256;

/// Wire the bot with the in-memory store and the configured content source
///
/// A missing content source is not an error here; studying reports it.
pub fn assemble(config: &AppConfig, messenger: Arc<dyn Messenger>) -> Result<Trivia> {
    let store = Arc::new(MemoryKnowledgeStore::new(
        Arc::clone(&messenger),
        config.game.origin_symbol.clone(),
    ));

    let source: Option<Arc<dyn ContentSource>> = match content::from_config(&config.study) {
        Ok(source) => {
            tracing::debug!(source = %source.name(), "Content source configured");
            Some(Arc::from(source))
        }
        Err(ContentError::NotConfigured) => None,
        Err(e) => return Err(e.into()),
    };

    Ok(Trivia::new(
        config.trivia(),
        messenger,
        store,
        source,
        Arc::new(MemoryEventBus::new(EVENT_BUS_CAPACITY)),
    ))
}

/// Print a study report
pub fn print_report(report: &BatchReport) {
    let elapsed = report.finished_at - report.started_at;
    println!(
        "Studied {} of {} records in {}ms (run {})",
        report.learned,
        report.total,
        elapsed.num_milliseconds(),
        report.run_id
    );
    for failure in &report.failures {
        println!(
            "  #{} {} - {}: {}",
            failure.index, failure.record.artist, failure.record.track, failure.reason
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trivia_core::{MockMessenger, StudyError, TriviaError};

    #[tokio::test]
    async fn assemble_without_source_cannot_study() {
        let trivia = assemble(&AppConfig::default(), Arc::new(MockMessenger::default())).unwrap();

        let result = trivia.study().await;

        assert!(matches!(
            result,
            Err(TriviaError::Study(StudyError::Fetch(ContentError::NotConfigured)))
        ));
    }

    #[tokio::test]
    async fn assemble_with_file_source_studies_it() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("hot-100.json");
        std::fs::write(
            &path,
            r#"[{"artist": "Queen", "track": "Bohemian Rhapsody", "rank": 1}]"#,
        )
        .unwrap();

        let mut config = AppConfig::default();
        config.study.source_file = Some(path);
        let trivia = assemble(&config, Arc::new(MockMessenger::default())).unwrap();

        let report = trivia.study().await.unwrap();

        assert_eq!(report.total, 1);
        assert!(report.is_clean());
    }
}
