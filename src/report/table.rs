use crate::models::ListingRecord;
use std::fmt::Write;

/// One-line dimension summary, e.g. "Data dimension: 12 rows and 5 columns."
pub fn summary(records: &[ListingRecord]) -> String {
    format!(
        "Data dimension: {} rows and {} columns.",
        records.len(),
        ListingRecord::FIELD_NAMES.len()
    )
}

/// Plain-text table with an index column. Cells wider than `max_width` chars are cut with '…'.
pub fn render_table(records: &[ListingRecord], max_width: usize) -> String {
    let mut rows: Vec<Vec<String>> = Vec::with_capacity(records.len() + 1);

    let mut header = vec![String::new()];
    header.extend(ListingRecord::FIELD_NAMES.iter().map(|s| s.to_string()));
    rows.push(header);

    for (index, record) in records.iter().enumerate() {
        let mut row = vec![index.to_string()];
        row.extend(record.fields().iter().map(|f| truncate(f, max_width)));
        rows.push(row);
    }

    let columns = rows[0].len();
    let widths: Vec<usize> = (0..columns)
        .map(|c| rows.iter().map(|r| r[c].chars().count()).max().unwrap_or(0))
        .collect();

    let mut out = String::new();
    for (i, row) in rows.iter().enumerate() {
        let line: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(cell, &w)| pad(cell, w))
            .collect();
        let _ = writeln!(out, "{}", line.join(" | ").trim_end());

        if i == 0 {
            let rule: Vec<String> = widths.iter().map(|&w| "-".repeat(w)).collect();
            let _ = writeln!(out, "{}", rule.join("-+-"));
        }
    }
    out
}

fn truncate(cell: &str, max_width: usize) -> String {
    if max_width == 0 || cell.chars().count() <= max_width {
        return cell.to_string();
    }
    let mut cut: String = cell.chars().take(max_width.saturating_sub(1)).collect();
    cut.push('…');
    cut
}

fn pad(cell: &str, width: usize) -> String {
    let fill = width.saturating_sub(cell.chars().count());
    format!("{cell}{}", " ".repeat(fill))
}
