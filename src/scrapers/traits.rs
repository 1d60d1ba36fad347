use crate::error::Result;
use crate::models::ScrapeReport;
use crate::scrapers::types::{FetchedPage, ScrapeParams};
use async_trait::async_trait;
use std::sync::Arc;

/// Issues a single GET and hands back status and body.
/// Transport failures are errors; HTTP error statuses are not.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<FetchedPage>;
}

#[async_trait]
impl<T: PageFetcher + ?Sized> PageFetcher for Arc<T> {
    async fn fetch(&self, url: &str) -> Result<FetchedPage> {
        (**self).fetch(url).await
    }
}

/// Common trait for listing scrapers
#[async_trait]
pub trait ScraperTrait: Send + Sync {
    /// Scrape every requested page of a category
    async fn scrape(&self, params: &ScrapeParams) -> Result<Arc<ScrapeReport>>;

    /// Get the name of the scraper source
    fn source_name(&self) -> &'static str;
}
