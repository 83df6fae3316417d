//! HTTP fetch and post.

use tracing::{debug, info};

use crate::IoError;

/// Path of the saved program under the source base URL.
const SAVED_SOURCE: &str = "saved.json";

/// Fetches program text and posts results over HTTP.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpSource {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// URL of the saved program.
    pub fn source_url(&self) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), SAVED_SOURCE)
    }

    /// Fetch the saved program text.
    pub async fn fetch_source(&self) -> Result<String, IoError> {
        self.fetch_text(&self.source_url()).await
    }

    pub async fn fetch_text(&self, url: &str) -> Result<String, IoError> {
        debug!(url, "fetching");
        let response = self.client.get(url).send().await?;
        Ok(response.text().await?)
    }

    /// Post `data` as the request body. Any response counts as delivered;
    /// only transport failures are errors.
    pub async fn post(&self, url: &str, data: String) -> Result<(), IoError> {
        let response = self.client.post(url).body(data).send().await?;
        info!(url, status = response.status().as_u16(), "posted");
        Ok(())
    }
}
