use crate::error::Result;
use crate::models::ListingRecord;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tracing::info;

/// Write records as CSV: an unnamed leading index column, then the five fields.
pub fn write_csv<W: Write>(writer: W, records: &[ListingRecord]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);

    let mut header = vec![""];
    header.extend(ListingRecord::FIELD_NAMES);
    wtr.write_record(&header)?;

    for (index, record) in records.iter().enumerate() {
        let index = index.to_string();
        let mut row = vec![index.as_str()];
        row.extend(record.fields());
        wtr.write_record(&row)?;
    }

    wtr.flush()?;
    Ok(())
}

pub fn to_csv_bytes(records: &[ListingRecord]) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    write_csv(&mut buf, records)?;
    Ok(buf)
}

pub fn export_to_path(path: &Path, records: &[ListingRecord]) -> Result<()> {
    let file = File::create(path)?;
    write_csv(file, records)?;
    info!("💾 Saved {} listings to {}", records.len(), path.display());
    Ok(())
}

/// Read back a file produced by [`write_csv`]. The index column is ignored.
pub fn read_csv<R: Read>(reader: R) -> Result<Vec<ListingRecord>> {
    let mut rdr = csv::Reader::from_reader(reader);
    let mut records = Vec::new();

    for row in rdr.records() {
        let row = row?;
        let field = |i: usize| row.get(i).unwrap_or_default().to_string();
        records.push(ListingRecord {
            details: field(1),
            condition: field(2),
            address: field(3),
            price: field(4),
            image_url: field(5),
        });
    }

    Ok(records)
}

pub fn import_from_path(path: &Path) -> Result<Vec<ListingRecord>> {
    read_csv(File::open(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<ListingRecord> {
        vec![
            ListingRecord {
                details: "Frigo Samsung, double porte".into(),
                condition: "Neuf".into(),
                address: "Dakar, Almadies".into(),
                price: "450000".into(),
                image_url: "https://img.test/1.jpg".into(),
            },
            ListingRecord {
                details: "Congélateur \"coffre\" 200L".into(),
                condition: "Occasion".into(),
                address: "Thiès".into(),
                price: "Prix sur demande".into(),
                image_url: "https://img.test/2.jpg".into(),
            },
        ]
    }

    #[test]
    fn writes_index_column_and_header() {
        let text = String::from_utf8(to_csv_bytes(&sample()).unwrap()).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some(",details,condition,address,price,image_url"));
        assert_eq!(
            lines.next(),
            Some("0,\"Frigo Samsung, double porte\",Neuf,\"Dakar, Almadies\",450000,https://img.test/1.jpg")
        );
        assert!(lines.next().unwrap().starts_with("1,"));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn csv_round_trip_preserves_records() {
        let records = sample();
        let bytes = to_csv_bytes(&records).unwrap();
        assert_eq!(read_csv(bytes.as_slice()).unwrap(), records);
    }

    #[test]
    fn empty_collection_is_header_only() {
        let text = String::from_utf8(to_csv_bytes(&[]).unwrap()).unwrap();
        assert_eq!(text, ",details,condition,address,price,image_url\n");
        assert!(read_csv(text.as_bytes()).unwrap().is_empty());
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let text = ",details,condition,address,price,image_url\n0,a,b\n";
        assert!(read_csv(text.as_bytes()).is_err());
    }

    #[test]
    fn export_and_import_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.csv");

        export_to_path(&path, &sample()).unwrap();
        assert_eq!(import_from_path(&path).unwrap(), sample());
    }
}
