use crate::error::Result;
use crate::models::{ScrapeReport, SkipReason, SkippedPage};
use crate::scrapers::parser::CardSelectors;
use crate::scrapers::traits::{PageFetcher, ScraperTrait};
use crate::scrapers::types::{FetchedPage, RetryPolicy, ScrapeParams};
use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info, warn};

const TOO_MANY_REQUESTS: u16 = 429;

/// Outcome of fetching one listing page, after rate-limit retries
enum PageOutcome {
    Body(String),
    Skipped(SkippedPage),
}

/// Scraper for expat-dakar.com listing sections
pub struct ExpatDakarScraper<F> {
    fetcher: F,
    base_url: String,
    retry: RetryPolicy,
    selectors: CardSelectors,
}

impl<F: PageFetcher> ExpatDakarScraper<F> {
    pub fn new(fetcher: F, base_url: &str) -> Result<Self> {
        Ok(Self {
            fetcher,
            base_url: base_url.trim_end_matches('/').to_string(),
            retry: RetryPolicy::default(),
            selectors: CardSelectors::new()?,
        })
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn page_url(&self, params: &ScrapeParams, page: u32) -> String {
        format!("{}/{}?page={}", self.base_url, params.category.slug(), page)
    }

    async fn fetch_page(&self, url: &str, page: u32) -> Result<PageOutcome> {
        let mut attempt = 0;

        loop {
            let FetchedPage { status, body } = self.fetcher.fetch(url).await?;

            match status {
                200..=299 => return Ok(PageOutcome::Body(body)),
                TOO_MANY_REQUESTS if attempt < self.retry.max_retries => {
                    let delay = self.retry.backoff(attempt);
                    warn!(
                        page,
                        attempt = attempt + 1,
                        delay_ms = delay.as_millis() as u64,
                        "Rate limited (HTTP 429). Retrying..."
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                TOO_MANY_REQUESTS => {
                    warn!(page, retries = attempt, "Still rate limited, skipping page");
                    return Ok(PageOutcome::Skipped(SkippedPage {
                        page,
                        status,
                        reason: SkipReason::RateLimited,
                    }));
                }
                _ => {
                    warn!(page, status, url, "Unexpected status, skipping page");
                    return Ok(PageOutcome::Skipped(SkippedPage {
                        page,
                        status,
                        reason: SkipReason::HttpStatus,
                    }));
                }
            }
        }
    }
}

#[async_trait]
impl<F: PageFetcher> ScraperTrait for ExpatDakarScraper<F> {
    async fn scrape(&self, params: &ScrapeParams) -> Result<Arc<ScrapeReport>> {
        info!(
            category = %params.category,
            pages = params.page_count,
            "Starting expat-dakar scrape"
        );

        let mut report = ScrapeReport {
            category: params.category.clone(),
            page_count: params.page_count,
            records: Vec::new(),
            dropped_records: 0,
            skipped_pages: Vec::new(),
            fetched_at: Utc::now(),
        };

        for page in 1..=params.page_count {
            let url = self.page_url(params, page);

            match self.fetch_page(&url, page).await? {
                PageOutcome::Body(html) => {
                    let parsed = self.selectors.parse_page(&html);
                    debug!(
                        page,
                        records = parsed.records.len(),
                        dropped = parsed.dropped,
                        "Parsed listing page"
                    );
                    report.dropped_records += parsed.dropped;
                    report.records.extend(parsed.records);
                }
                PageOutcome::Skipped(skipped) => report.skipped_pages.push(skipped),
            }
        }

        info!(
            category = %params.category,
            records = report.records.len(),
            dropped = report.dropped_records,
            skipped_pages = report.skipped_pages.len(),
            "Finished expat-dakar scrape"
        );

        Ok(Arc::new(report))
    }

    fn source_name(&self) -> &'static str {
        "expat-dakar"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScrapeError;
    use crate::models::KnownCategory;
    use std::collections::{HashMap, VecDeque};
    use std::sync::Mutex;
    use std::time::Duration;

    const LISTING: &str = r#"<div class="listings-cards__list-item">
        <img class="listing-card__image__resource" src="img.jpg">
        <div class="listing-card__header__title">Climatiseur</div>
        <span class="listing-card__header__tags__item">Neuf</span>
        <div class="listing-card__header__location">Dakar</div>
        <span class="listing-card__price">100 F Cfa</span>
    </div>"#;

    /// Serves queued responses per URL and records every request
    #[derive(Default)]
    struct ScriptedFetcher {
        responses: Mutex<HashMap<String, VecDeque<Result<FetchedPage>>>>,
        requests: Mutex<Vec<String>>,
    }

    impl ScriptedFetcher {
        fn push(&self, url: &str, response: Result<FetchedPage>) {
            self.responses
                .lock()
                .unwrap()
                .entry(url.to_string())
                .or_default()
                .push_back(response);
        }

        fn page(&self, url: &str, status: u16, body: &str) {
            self.push(url, Ok(FetchedPage { status, body: body.to_string() }));
        }

        fn requests(&self) -> Vec<String> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl<'a> PageFetcher for &'a ScriptedFetcher {
        async fn fetch(&self, url: &str) -> Result<FetchedPage> {
            self.requests.lock().unwrap().push(url.to_string());
            self.responses
                .lock()
                .unwrap()
                .get_mut(url)
                .and_then(VecDeque::pop_front)
                .unwrap_or_else(|| panic!("unexpected request to {url}"))
        }
    }

    fn no_wait(max_retries: u32) -> RetryPolicy {
        RetryPolicy {
            max_retries,
            initial_backoff: Duration::ZERO,
            max_backoff: Duration::ZERO,
        }
    }

    fn params(pages: u32) -> ScrapeParams {
        ScrapeParams::new(KnownCategory::AirConditioning, pages).unwrap()
    }

    const P1: &str = "https://example.test/climatisation?page=1";
    const P2: &str = "https://example.test/climatisation?page=2";

    #[test]
    fn builds_page_urls() {
        let fetcher = ScriptedFetcher::default();
        let scraper = ExpatDakarScraper::new(&fetcher, "https://example.test/").unwrap();
        assert_eq!(scraper.page_url(&params(3), 2), P2);
    }

    #[tokio::test]
    async fn rate_limited_page_is_retried_then_parsed() {
        let fetcher = ScriptedFetcher::default();
        fetcher.page(P1, 429, "slow down");
        fetcher.page(P1, 200, LISTING);

        let scraper = ExpatDakarScraper::new(&fetcher, "https://example.test")
            .unwrap()
            .with_retry(no_wait(2));
        let report = scraper.scrape(&params(1)).await.unwrap();

        assert_eq!(report.records.len(), 1);
        assert!(report.skipped_pages.is_empty());
        assert_eq!(fetcher.requests(), [P1, P1]);
    }

    #[tokio::test]
    async fn persistent_rate_limit_skips_page() {
        let fetcher = ScriptedFetcher::default();
        for _ in 0..3 {
            fetcher.page(P1, 429, LISTING);
        }
        fetcher.page(P2, 200, LISTING);

        let scraper = ExpatDakarScraper::new(&fetcher, "https://example.test")
            .unwrap()
            .with_retry(no_wait(2));
        let report = scraper.scrape(&params(2)).await.unwrap();

        // The 429 body is never parsed, even though it happens to carry markup.
        assert_eq!(report.records.len(), 1);
        assert_eq!(
            report.skipped_pages,
            vec![SkippedPage { page: 1, status: 429, reason: SkipReason::RateLimited }]
        );
        assert_eq!(fetcher.requests(), [P1, P1, P1, P2]);
    }

    #[tokio::test]
    async fn server_error_skips_page_and_continues() {
        let fetcher = ScriptedFetcher::default();
        fetcher.page(P1, 503, "");
        fetcher.page(P2, 200, LISTING);

        let scraper = ExpatDakarScraper::new(&fetcher, "https://example.test").unwrap();
        let report = scraper.scrape(&params(2)).await.unwrap();

        assert_eq!(report.records.len(), 1);
        assert_eq!(report.skipped_pages[0].reason, SkipReason::HttpStatus);
        assert_eq!(report.skipped_pages[0].status, 503);
    }

    #[tokio::test]
    async fn transport_error_aborts_the_call() {
        let fetcher = ScriptedFetcher::default();
        fetcher.page(P1, 200, LISTING);
        fetcher.push(
            P2,
            Err(ScrapeError::Transport {
                url: P2.to_string(),
                message: "connection reset".into(),
            }),
        );

        let scraper = ExpatDakarScraper::new(&fetcher, "https://example.test").unwrap();
        let err = scraper.scrape(&params(3)).await.unwrap_err();

        assert!(matches!(err, ScrapeError::Transport { .. }));
        assert_eq!(fetcher.requests(), [P1, P2]);
    }
}
