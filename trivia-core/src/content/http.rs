//! HTTP content source
//!
//! Fetches a JSON array of records from a chart endpoint.

use async_trait::async_trait;
use tracing::debug;
use url::Url;

use super::traits::ContentSource;
use crate::error::ContentError;
use crate::knowledge::LearnableRecord;

/// Content source backed by a JSON endpoint
pub struct HttpContentSource {
    url: Url,
    http_client: reqwest::Client,
}

impl HttpContentSource {
    pub fn new(url: Url) -> Self {
        Self {
            url,
            http_client: reqwest::Client::new(),
        }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

#[async_trait]
impl ContentSource for HttpContentSource {
    fn name(&self) -> String {
        self.url.to_string()
    }

    async fn fetch_batch(&self) -> Result<Vec<LearnableRecord>, ContentError> {
        let response = self
            .http_client
            .get(self.url.clone())
            .send()
            .await
            .map_err(|e| ContentError::Fetch(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ContentError::Status {
                status: response.status().as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| ContentError::Fetch(e.to_string()))?;
        let records: Vec<LearnableRecord> = serde_json::from_str(&body)?;

        debug!(url = %self.url, count = records.len(), "Fetched study batch");
        Ok(records)
    }
}
