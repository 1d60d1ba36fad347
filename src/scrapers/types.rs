use crate::error::{Result, ScrapeError};
use crate::models::Category;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Upper bound on pages per scrape, matching the page selector in the UI
pub const MAX_PAGES: u32 = 100;

/// What to scrape
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScrapeParams {
    pub category: Category,
    pub page_count: u32,
}

impl ScrapeParams {
    pub fn new(category: impl Into<Category>, page_count: u32) -> Result<Self> {
        if !(1..=MAX_PAGES).contains(&page_count) {
            return Err(ScrapeError::InvalidPageCount {
                got: page_count,
                max: MAX_PAGES,
            });
        }
        Ok(Self {
            category: category.into(),
            page_count,
        })
    }

    /// Parse a raw slug, rejecting anything that is not a single path segment
    pub fn from_slug(slug: &str, page_count: u32) -> Result<Self> {
        let category =
            Category::new(slug).ok_or_else(|| ScrapeError::InvalidCategory(slug.to_string()))?;
        Self::new(category, page_count)
    }
}

/// How the scraper reacts to HTTP 429
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Retries after the first 429; zero means skip immediately
    pub max_retries: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_backoff: Duration::from_millis(1000),
            max_backoff: Duration::from_secs(10),
        }
    }
}

impl RetryPolicy {
    /// Delay before retry number `attempt` (0-based), doubling and capped
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 1u32.checked_shl(attempt).unwrap_or(u32::MAX);
        self.initial_backoff
            .checked_mul(factor)
            .map_or(self.max_backoff, |d| d.min(self.max_backoff))
    }
}

/// Raw HTTP response as seen by the scraper
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub status: u16,
    pub body: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::KnownCategory;

    #[test]
    fn page_count_is_bounded() {
        assert!(ScrapeParams::new(KnownCategory::Cookers, 1).is_ok());
        assert!(ScrapeParams::new(KnownCategory::Cookers, MAX_PAGES).is_ok());
        assert!(matches!(
            ScrapeParams::new(KnownCategory::Cookers, 0),
            Err(ScrapeError::InvalidPageCount { got: 0, .. })
        ));
        assert!(matches!(
            ScrapeParams::new(KnownCategory::Cookers, 101),
            Err(ScrapeError::InvalidPageCount { got: 101, .. })
        ));
    }

    #[test]
    fn from_slug_rejects_bad_category() {
        assert!(matches!(
            ScrapeParams::from_slug("a/b", 1),
            Err(ScrapeError::InvalidCategory(_))
        ));
    }

    #[test]
    fn backoff_doubles_and_caps() {
        let policy = RetryPolicy {
            max_retries: 5,
            initial_backoff: Duration::from_millis(500),
            max_backoff: Duration::from_secs(3),
        };
        assert_eq!(policy.backoff(0), Duration::from_millis(500));
        assert_eq!(policy.backoff(1), Duration::from_millis(1000));
        assert_eq!(policy.backoff(2), Duration::from_millis(2000));
        assert_eq!(policy.backoff(3), Duration::from_secs(3));
        assert_eq!(policy.backoff(40), Duration::from_secs(3));
    }
}
