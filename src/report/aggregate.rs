use crate::models::ListingRecord;
use serde::Serialize;
use std::collections::HashMap;

/// Numeric value of a price string, `None` when it is not a number.
///
/// Whitespace and thousands separators are ignored; text with no digits
/// never turns into zero.
pub fn coerce_price(text: &str) -> Option<f64> {
    let cleaned: String = text
        .chars()
        .filter(|c| !c.is_whitespace() && !matches!(c, '\u{202f}' | '\u{a0}'))
        .collect();
    if !cleaned.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PricedListing {
    pub details: String,
    pub price: f64,
}

/// The `n` most expensive listings, highest first. Listings without a numeric price are skipped.
pub fn top_by_price(records: &[ListingRecord], n: usize) -> Vec<PricedListing> {
    let mut priced: Vec<PricedListing> = records
        .iter()
        .filter_map(|r| {
            coerce_price(&r.price).map(|price| PricedListing {
                details: r.details.clone(),
                price,
            })
        })
        .collect();
    // Stable sort keeps document order among equal prices.
    priced.sort_by(|a, b| b.price.total_cmp(&a.price));
    priced.truncate(n);
    priced
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct AddressCount {
    pub address: String,
    pub count: usize,
}

/// Number of listings per address, most frequent first
pub fn count_by_address(records: &[ListingRecord]) -> Vec<AddressCount> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for record in records {
        *counts.entry(record.address.as_str()).or_default() += 1;
    }

    let mut counts: Vec<AddressCount> = counts
        .into_iter()
        .map(|(address, count)| AddressCount {
            address: address.to_string(),
            count,
        })
        .collect();
    counts.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.address.cmp(&b.address)));
    counts
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ConditionShare {
    pub condition: String,
    pub count: usize,
    /// Fraction of all listings, in `0.0..=1.0`
    pub share: f64,
}

/// Proportion of listings per condition tag
pub fn condition_share(records: &[ListingRecord]) -> Vec<ConditionShare> {
    let total = records.len();
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for record in records {
        *counts.entry(record.condition.as_str()).or_default() += 1;
    }

    let mut shares: Vec<ConditionShare> = counts
        .into_iter()
        .map(|(condition, count)| ConditionShare {
            condition: condition.to_string(),
            count,
            share: count as f64 / total as f64,
        })
        .collect();
    shares.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.condition.cmp(&b.condition)));
    shares
}
