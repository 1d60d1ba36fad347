pub mod aggregate;
pub mod export;
pub mod table;

pub use aggregate::{
    coerce_price, condition_share, count_by_address, top_by_price, AddressCount, ConditionShare,
    PricedListing,
};
pub use export::{export_to_path, import_from_path, read_csv, to_csv_bytes, write_csv};
pub use table::{render_table, summary};

use crate::models::ListingRecord;
use serde::Serialize;
use std::fmt;

/// How many listings the price ranking shows
pub const TOP_N: usize = 5;

/// Aggregate views for one category
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub label: String,
    pub listings: usize,
    pub top_by_price: Vec<PricedListing>,
    pub by_address: Vec<AddressCount>,
    pub by_condition: Vec<ConditionShare>,
}

impl Dashboard {
    pub fn build(label: impl Into<String>, records: &[ListingRecord]) -> Self {
        Self {
            label: label.into(),
            listings: records.len(),
            top_by_price: top_by_price(records, TOP_N),
            by_address: count_by_address(records),
            by_condition: condition_share(records),
        }
    }
}

impl fmt::Display for Dashboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== {} ({} listings)", self.label, self.listings)?;

        writeln!(f, "Top {} by price (FCFA):", TOP_N)?;
        for (i, item) in self.top_by_price.iter().enumerate() {
            writeln!(f, "  {}. {} ({:.0})", i + 1, item.details, item.price)?;
        }

        writeln!(f, "Listings per address:")?;
        for item in &self.by_address {
            writeln!(f, "  {:>4}  {}", item.count, item.address)?;
        }

        writeln!(f, "Condition breakdown:")?;
        for item in &self.by_condition {
            writeln!(
                f,
                "  {:>5.1}%  {} ({})",
                item.share * 100.0,
                item.condition,
                item.count
            )?;
        }
        Ok(())
    }
}
