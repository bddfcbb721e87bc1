//! Static content source for testing

use async_trait::async_trait;

use super::traits::ContentSource;
use crate::error::ContentError;
use crate::knowledge::LearnableRecord;

/// Content source returning a fixed batch, or failing every fetch
pub struct StaticContentSource {
    records: Vec<LearnableRecord>,
    fail: bool,
}

impl StaticContentSource {
    /// Source that always returns `records`
    pub fn new(records: Vec<LearnableRecord>) -> Self {
        Self {
            records,
            fail: false,
        }
    }

    /// Source whose fetch always fails
    pub fn failing() -> Self {
        Self {
            records: Vec::new(),
            fail: true,
        }
    }
}

#[async_trait]
impl ContentSource for StaticContentSource {
    fn name(&self) -> String {
        "static".to_string()
    }

    async fn fetch_batch(&self) -> Result<Vec<LearnableRecord>, ContentError> {
        if self.fail {
            return Err(ContentError::Fetch("static source failure".to_string()));
        }
        Ok(self.records.clone())
    }
}
