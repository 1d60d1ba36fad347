pub mod expat_dakar;
pub mod http;
pub mod parser;
pub mod traits;
pub mod types;

pub use expat_dakar::ExpatDakarScraper;
pub use http::HttpFetcher;
pub use parser::{normalize_price, parse_listings, ParsedPage};
pub use traits::{PageFetcher, ScraperTrait};
pub use types::{FetchedPage, RetryPolicy, ScrapeParams, MAX_PAGES};
