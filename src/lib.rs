//! Scraper for appliance listings on expat-dakar.com, with CSV export and
//! summary aggregates over the scraped records.

pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod report;
pub mod scrapers;

pub use cache::{CachedScraper, ScrapeCache};
pub use config::Config;
pub use error::ScrapeError;
pub use models::{Category, KnownCategory, ListingRecord, ScrapeReport};
pub use scrapers::{ExpatDakarScraper, HttpFetcher, ScrapeParams, ScraperTrait};
