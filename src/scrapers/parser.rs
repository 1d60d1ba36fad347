use crate::error::{Result, ScrapeError};
use crate::models::ListingRecord;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

const CARD: &str = "div.listings-cards__list-item";
const TITLE: &str = "div.listing-card__header__title";
const CONDITION: &str = "span.listing-card__header__tags__item";
const LOCATION: &str = "div.listing-card__header__location";
const PRICE: &str = "span.listing-card__price";
const IMAGE: &str = "img.listing-card__image__resource";

const CURRENCY_SUFFIX: &str = "F Cfa";

/// Records extracted from one listing page
#[derive(Debug, Default, Clone)]
pub struct ParsedPage {
    pub records: Vec<ListingRecord>,
    /// Cards found on the page but discarded during extraction
    pub dropped: usize,
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| ScrapeError::Selector {
        selector: css.to_string(),
        message: e.to_string(),
    })
}

/// Compiled selectors for a listing card
pub struct CardSelectors {
    card: Selector,
    title: Selector,
    condition: Selector,
    location: Selector,
    price: Selector,
    image: Selector,
}

impl CardSelectors {
    pub fn new() -> Result<Self> {
        Ok(Self {
            card: selector(CARD)?,
            title: selector(TITLE)?,
            condition: selector(CONDITION)?,
            location: selector(LOCATION)?,
            price: selector(PRICE)?,
            image: selector(IMAGE)?,
        })
    }

    /// Extract all listing cards from a page of HTML
    pub fn parse_page(&self, html: &str) -> ParsedPage {
        let document = Html::parse_document(html);
        let mut page = ParsedPage::default();

        for card in document.select(&self.card) {
            match self.extract_card(card) {
                Some(record) => page.records.push(record),
                None => {
                    page.dropped += 1;
                    debug!("Dropped incomplete listing card");
                }
            }
        }

        page
    }

    /// All five fields or nothing
    pub fn extract_card(&self, card: ElementRef<'_>) -> Option<ListingRecord> {
        let details = non_empty(first_text(card, &self.title)?.trim())?;
        let condition = non_empty(first_text(card, &self.condition)?.trim())?;
        let address = non_empty(first_text(card, &self.location)?.replace('\n', "").trim())?;
        let price = non_empty(&normalize_price(&first_text(card, &self.price)?))?;
        let image_url = non_empty(
            card.select(&self.image)
                .next()?
                .value()
                .attr("src")?
                .trim(),
        )?;

        Some(ListingRecord {
            details,
            condition,
            address,
            price,
            image_url,
        })
    }
}

/// Parse a listing page with freshly compiled selectors
pub fn parse_listings(html: &str) -> Result<ParsedPage> {
    Ok(CardSelectors::new()?.parse_page(html))
}

/// Strip the price text down to its digits as shown on the card.
///
/// Only the first block (before a blank line) is kept; that is where the
/// amount lives, anything after it is a badge such as "Négociable".
/// Thousands separators (U+202F, U+00A0) and the "F Cfa" suffix are removed.
pub fn normalize_price(text: &str) -> String {
    let amount = text.trim().split("\n\n").next().unwrap_or_default();
    let amount: String = amount
        .chars()
        .filter(|c| !matches!(c, '\u{202f}' | '\u{a0}'))
        .collect();
    let amount = amount.trim_end();
    amount
        .strip_suffix(CURRENCY_SUFFIX)
        .unwrap_or(amount)
        .trim()
        .to_string()
}

fn first_text(card: ElementRef<'_>, selector: &Selector) -> Option<String> {
    card.select(selector)
        .next()
        .map(|el| el.text().collect::<String>())
}

fn non_empty(text: &str) -> Option<String> {
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}
