use crate::constants::{EXPECTED_ITEM_HEADER, EXPECTED_RELEVANCE_HEADER};
use crate::error::{LayoutError, Result};

use csv::{ReaderBuilder, StringRecord, Trim};
use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

/// Reads item relevance scores from a CSV file with header `Item,Relevance`
pub fn read_relevance_csv<P: AsRef<Path>>(path: P) -> Result<BTreeMap<String, f64>> {
    let file = std::fs::File::open(path)?;
    read_relevance_from_reader(file)
}

pub fn read_relevance_from_reader<R: Read>(reader: R) -> Result<BTreeMap<String, f64>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .flexible(true)
        .from_reader(reader);

    validate_header(rdr.headers()?)?;

    let mut scores = BTreeMap::new();
    for (i, record) in rdr.records().enumerate() {
        let record = record?;
        let row = i + 2; // 1-based, after the header
        if record.len() < 2 {
            return Err(LayoutError::CsvRow {
                row,
                got: record.len(),
            });
        }
        let name = record[0].to_string();
        let value = &record[1];
        let score: f64 = value.parse().map_err(|_| LayoutError::RelevanceParse {
            row,
            value: value.to_string(),
        })?;
        if name.is_empty() || !score.is_finite() || score < 0.0 {
            return Err(LayoutError::RelevanceParse {
                row,
                value: value.to_string(),
            });
        }
        scores.insert(name, score);
    }
    log::debug!("read {} relevance entries", scores.len());
    Ok(scores)
}

fn validate_header(header: &StringRecord) -> Result<()> {
    let item = header.get(0).unwrap_or_default();
    let relevance = header.get(1).unwrap_or_default();
    if item != EXPECTED_ITEM_HEADER || relevance != EXPECTED_RELEVANCE_HEADER {
        return Err(LayoutError::CsvHeader(format!(
            "expected '{EXPECTED_ITEM_HEADER},{EXPECTED_RELEVANCE_HEADER}', got '{item},{relevance}'"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_read_basic() {
        let data = "Item,Relevance\nweather, 0.8\ntime,0.25\n";
        let scores = read_relevance_from_reader(data.as_bytes()).unwrap();
        assert_eq!(scores.len(), 2);
        assert_eq!(scores["weather"], 0.8);
        assert_eq!(scores["time"], 0.25);
    }

    #[test]
    fn test_bad_header() {
        let data = "Key,Count\nA,1\n";
        let err = read_relevance_from_reader(data.as_bytes()).unwrap_err();
        assert!(matches!(err, LayoutError::CsvHeader(_)));
    }

    #[test]
    fn test_short_row() {
        let data = "Item,Relevance\nweather\n";
        let err = read_relevance_from_reader(data.as_bytes()).unwrap_err();
        assert!(matches!(err, LayoutError::CsvRow { row: 2, got: 1 }));
    }

    #[test]
    fn test_negative_or_garbage_score() {
        let negative = "Item,Relevance\nweather,-1\n";
        assert!(matches!(
            read_relevance_from_reader(negative.as_bytes()),
            Err(LayoutError::RelevanceParse { row: 2, .. })
        ));
        let garbage = "Item,Relevance\nweather,high\n";
        assert!(read_relevance_from_reader(garbage.as_bytes()).is_err());
    }

    #[test]
    fn test_read_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "Item,Relevance").unwrap();
        writeln!(file, "music,0.4").unwrap();
        let scores = read_relevance_csv(file.path()).unwrap();
        assert_eq!(scores.get("music"), Some(&0.4));
    }
}
