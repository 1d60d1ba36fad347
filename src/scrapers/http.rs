use crate::error::{Result, ScrapeError};
use crate::scrapers::traits::PageFetcher;
use crate::scrapers::types::FetchedPage;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// `PageFetcher` backed by a reqwest client
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| ScrapeError::Transport {
                url: String::new(),
                message: format!("failed to create HTTP client: {e}"),
            })?;

        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedPage> {
        debug!("Fetching URL: {}", url);

        let transport = |e: reqwest::Error| ScrapeError::Transport {
            url: url.to_string(),
            message: e.to_string(),
        };

        let response = self.client.get(url).send().await.map_err(transport)?;
        let status = response.status().as_u16();
        // Consuming the body releases the connection, on success and on error.
        let body = response.text().await.map_err(transport)?;

        debug!(status, bytes = body.len(), "Downloaded page");

        Ok(FetchedPage { status, body })
    }
}
