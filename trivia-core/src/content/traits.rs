//! ContentSource trait

use async_trait::async_trait;

use crate::error::ContentError;
use crate::knowledge::LearnableRecord;

/// Trait for sources of learnable records
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Where the records come from, for logs
    fn name(&self) -> String;

    /// Fetch one batch of records
    async fn fetch_batch(&self) -> Result<Vec<LearnableRecord>, ContentError>;
}
