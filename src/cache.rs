//! Memoization of scrape results keyed by `(category, page_count)`.

use crate::error::Result;
use crate::models::{Category, ScrapeReport};
use crate::scrapers::{ScrapeParams, ScraperTrait};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};
use tracing::debug;

pub type CacheKey = (Category, u32);

struct Entry {
    report: Arc<ScrapeReport>,
    stored_at: Instant,
}

/// In-memory result cache. A `ttl` of `None` keeps entries for the life of the process.
pub struct ScrapeCache {
    ttl: Option<Duration>,
    entries: Mutex<HashMap<CacheKey, Entry>>,
}

impl ScrapeCache {
    pub fn new(ttl: Option<Duration>) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn key(params: &ScrapeParams) -> CacheKey {
        (params.category.clone(), params.page_count)
    }

    // A poisoned lock only means another thread panicked mid-insert; the map is still usable.
    fn lock(&self) -> MutexGuard<'_, HashMap<CacheKey, Entry>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Fresh entry for `key`, evicting it if it has expired
    pub fn get(&self, key: &CacheKey) -> Option<Arc<ScrapeReport>> {
        let mut entries = self.lock();
        let expired = match (entries.get(key), self.ttl) {
            (None, _) => return None,
            (Some(entry), Some(ttl)) => entry.stored_at.elapsed() >= ttl,
            (Some(_), None) => false,
        };
        if expired {
            entries.remove(key);
            return None;
        }
        entries.get(key).map(|entry| Arc::clone(&entry.report))
    }

    pub fn insert(&self, key: CacheKey, report: Arc<ScrapeReport>) {
        self.lock().insert(
            key,
            Entry {
                report,
                stored_at: Instant::now(),
            },
        );
    }

    pub fn invalidate(&self, key: &CacheKey) -> bool {
        self.lock().remove(key).is_some()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Wraps a scraper so that repeated calls with the same parameters reuse the first result.
/// Failed scrapes are not cached.
pub struct CachedScraper<S> {
    inner: S,
    cache: ScrapeCache,
}

impl<S: ScraperTrait> CachedScraper<S> {
    pub fn new(inner: S, ttl: Option<Duration>) -> Self {
        Self {
            inner,
            cache: ScrapeCache::new(ttl),
        }
    }

    pub fn cache(&self) -> &ScrapeCache {
        &self.cache
    }
}

#[async_trait]
impl<S: ScraperTrait> ScraperTrait for CachedScraper<S> {
    async fn scrape(&self, params: &ScrapeParams) -> Result<Arc<ScrapeReport>> {
        let key = ScrapeCache::key(params);
        if let Some(report) = self.cache.get(&key) {
            debug!(category = %params.category, pages = params.page_count, "Cache hit");
            return Ok(report);
        }

        let report = self.inner.scrape(params).await?;
        self.cache.insert(key, Arc::clone(&report));
        Ok(report)
    }

    fn source_name(&self) -> &'static str {
        self.inner.source_name()
    }
}
