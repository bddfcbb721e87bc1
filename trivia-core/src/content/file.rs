//! JSON file content source

use std::path::PathBuf;

use async_trait::async_trait;

use super::traits::ContentSource;
use crate::error::ContentError;
use crate::knowledge::LearnableRecord;

/// Content source reading a JSON array of records from disk
pub struct FileContentSource {
    path: PathBuf,
}

impl FileContentSource {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

#[async_trait]
impl ContentSource for FileContentSource {
    fn name(&self) -> String {
        self.path.display().to_string()
    }

    async fn fetch_batch(&self) -> Result<Vec<LearnableRecord>, ContentError> {
        let contents = tokio::fs::read_to_string(&self.path).await?;
        Ok(serde_json::from_str(&contents)?)
    }
}
