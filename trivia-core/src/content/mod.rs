//! Content sources that supply batches of learnable records

pub mod file;
pub mod http;
pub mod mock;
pub mod traits;

// Re-export key types for convenience
pub use file::FileContentSource;
pub use http::HttpContentSource;
pub use mock::StaticContentSource;
pub use traits::ContentSource;

use crate::config::StudyConfig;
use crate::error::ContentError;

/// Build the content source described by `config`
///
/// A URL wins over a file when both are set.
pub fn from_config(config: &StudyConfig) -> Result<Box<dyn ContentSource>, ContentError> {
    if let Some(url) = &config.source_url {
        return Ok(Box::new(HttpContentSource::new(url.clone())));
    }
    if let Some(path) = &config.source_file {
        return Ok(Box::new(FileContentSource::new(path.clone())));
    }
    Err(ContentError::NotConfigured)
}
