use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A known listing section on expat-dakar.com
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum KnownCategory {
    Refrigerators,
    AirConditioning,
    Cookers,
    WashingMachines,
}

impl KnownCategory {
    pub const ALL: [KnownCategory; 4] = [
        KnownCategory::Refrigerators,
        KnownCategory::AirConditioning,
        KnownCategory::Cookers,
        KnownCategory::WashingMachines,
    ];

    /// Path segment used in the listing URL
    pub fn slug(self) -> &'static str {
        match self {
            KnownCategory::Refrigerators => "refrigerateurs-congelateurs",
            KnownCategory::AirConditioning => "climatisation",
            KnownCategory::Cookers => "cuisinieres-fours",
            KnownCategory::WashingMachines => "machines-a-laver",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            KnownCategory::Refrigerators => "Refrigerators",
            KnownCategory::AirConditioning => "Air conditioning",
            KnownCategory::Cookers => "Cookers & ovens",
            KnownCategory::WashingMachines => "Washing machines",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.slug() == slug)
    }
}

/// Listing section to scrape. Opaque path segment; the known ones get a label.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Category(String);

impl Category {
    /// Accepts any non-empty slug that stays a single path segment
    pub fn new(slug: impl Into<String>) -> Option<Self> {
        let slug = slug.into();
        let slug = slug.trim().trim_matches('/').to_string();
        if slug.is_empty() || slug.contains(&['/', '?', '#'][..]) || slug.contains(char::is_whitespace) {
            return None;
        }
        Some(Self(slug))
    }

    pub fn slug(&self) -> &str {
        &self.0
    }

    pub fn label(&self) -> &str {
        match KnownCategory::from_slug(&self.0) {
            Some(known) => known.label(),
            None => &self.0,
        }
    }
}

impl From<KnownCategory> for Category {
    fn from(known: KnownCategory) -> Self {
        Self(known.slug().to_string())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One scraped advertisement
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ListingRecord {
    pub details: String,
    pub condition: String,
    pub address: String,
    /// Price text with thousands separators and currency suffix removed
    pub price: String,
    pub image_url: String,
}

impl ListingRecord {
    pub const FIELD_NAMES: [&'static str; 5] =
        ["details", "condition", "address", "price", "image_url"];

    pub fn fields(&self) -> [&str; 5] {
        [
            &self.details,
            &self.condition,
            &self.address,
            &self.price,
            &self.image_url,
        ]
    }
}

/// Why a page contributed no records
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SkipReason {
    /// Still 429 after every retry
    RateLimited,
    HttpStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SkippedPage {
    pub page: u32,
    pub status: u16,
    pub reason: SkipReason,
}

/// Result of scraping one category over a number of pages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapeReport {
    pub category: Category,
    pub page_count: u32,
    pub records: Vec<ListingRecord>,
    /// Listing cards discarded because a field was missing or empty
    pub dropped_records: usize,
    pub skipped_pages: Vec<SkippedPage>,
    pub fetched_at: DateTime<Utc>,
}
