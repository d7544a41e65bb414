//! Line-oriented feed ingestion shared by the inbound connectors.
//!
//! Every feed is comma separated with no header row. Blank lines are
//! ignored, fields are trimmed, and trailing extra fields are tolerated.
//! A line that fails to parse is skipped with a warning; only an I/O failure
//! aborts the feed.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use bond_core::price::from_fractional;
use bond_core::reference::get_bond;
use bond_core::Bond;
use bond_soa::IngestSummary;
use csv::StringRecord;
use tracing::warn;

use crate::error::FeedError;

/// Opens a feed file for buffered reading.
pub fn open_feed(path: &Path) -> Result<BufReader<File>, FeedError> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|source| FeedError::Open {
            path: path.to_path_buf(),
            source,
        })
}

/// Reads `source` to exhaustion, handing every record to `on_record`.
///
/// `on_record` returns `Err` for a line it cannot use; non-fatal errors are
/// logged and counted as skipped.
pub(crate) fn ingest<R, F>(
    feed: &'static str,
    source: R,
    mut on_record: F,
) -> Result<IngestSummary, FeedError>
where
    R: BufRead,
    F: FnMut(&StringRecord) -> Result<(), FeedError>,
{
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(source);

    let mut summary = IngestSummary::default();
    let mut record = StringRecord::new();
    loop {
        let outcome = match reader.read_record(&mut record) {
            Ok(false) => break,
            Ok(true) => on_record(&record),
            Err(e) => Err(FeedError::Csv(e)),
        };
        summary.lines_read += 1;

        match outcome {
            Ok(()) => summary.records += 1,
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => {
                summary.skipped += 1;
                let line = record.position().map_or(0, |p| p.line());
                warn!(feed, line, error = %e, "Skipping malformed line");
            }
        }
    }
    Ok(summary)
}

/// Required field `index`, named `name` in errors.
pub(crate) fn field<'r>(
    record: &'r StringRecord,
    index: usize,
    name: &'static str,
) -> Result<&'r str, FeedError> {
    record
        .get(index)
        .filter(|s| !s.is_empty())
        .ok_or(FeedError::MissingField(name))
}

/// Price in 32nds notation (`99-16+`) or, failing a hyphen, plain decimal.
pub(crate) fn parse_price(text: &str) -> Result<f64, FeedError> {
    if text.contains('-') {
        Ok(from_fractional(text)?)
    } else {
        text.parse::<f64>()
            .ok()
            .filter(|p| p.is_finite() && *p >= 0.0)
            .ok_or_else(|| FeedError::DecimalPrice(text.to_string()))
    }
}

/// Non-negative integer quantity.
pub(crate) fn parse_quantity(text: &str) -> Result<i64, FeedError> {
    text.parse()
        .ok()
        .filter(|q: &i64| *q >= 0)
        .ok_or_else(|| FeedError::Quantity(text.to_string()))
}

/// Reference data for `cusip`. A miss is logged and yields the empty bond;
/// the record is still processed.
pub(crate) fn resolve_bond(feed: &'static str, cusip: &str) -> Bond {
    let bond = get_bond(cusip);
    if bond.is_unknown() {
        warn!(feed, cusip, "No reference data for product");
    }
    bond
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_ingest_skips_bad_lines_and_blanks() {
        let mut seen = Vec::new();
        let summary = ingest("test", Cursor::new("a,1\n\nb,x\nc,3,\n"), |record| {
            let qty = parse_quantity(field(record, 1, "qty")?)?;
            seen.push((field(record, 0, "id")?.to_string(), qty));
            Ok(())
        })
        .unwrap();

        assert_eq!(seen, vec![("a".to_string(), 1), ("c".to_string(), 3)]);
        assert_eq!(summary.lines_read, 3);
        assert_eq!(summary.records, 2);
        assert_eq!(summary.skipped, 1);
    }

    #[test]
    fn test_fields_are_trimmed() {
        let mut ids = Vec::new();
        ingest("test", Cursor::new(" 9128283H1 , 99-16+ \n"), |record| {
            ids.push(field(record, 0, "cusip")?.to_string());
            assert_eq!(parse_price(field(record, 1, "price")?)?, 99.515625);
            Ok(())
        })
        .unwrap();
        assert_eq!(ids, vec!["9128283H1"]);
    }

    #[test]
    fn test_missing_field() {
        let record = StringRecord::from(vec!["9128283H1"]);
        assert!(matches!(
            field(&record, 1, "bid"),
            Err(FeedError::MissingField("bid"))
        ));
    }

    #[test]
    fn test_parse_price_accepts_decimal() {
        assert_eq!(parse_price("99.5").unwrap(), 99.5);
        assert_eq!(parse_price("100-000").unwrap(), 100.0);
        assert!(matches!(parse_price("abc"), Err(FeedError::DecimalPrice(_))));
        assert!(matches!(parse_price("99-40"), Err(FeedError::Price(_))));
        assert!(matches!(parse_price("-1.5"), Err(FeedError::DecimalPrice(_))));
    }

    #[test]
    fn test_parse_quantity_rejects_negative() {
        assert_eq!(parse_quantity("1000000").unwrap(), 1_000_000);
        assert!(matches!(parse_quantity("-5"), Err(FeedError::Quantity(_))));
        assert!(matches!(
            parse_quantity("9223372036854775808"),
            Err(FeedError::Quantity(_))
        ));
    }

    #[test]
    fn test_resolve_bond_falls_back_to_empty_bond() {
        assert_eq!(resolve_bond("test", "912810RZ3").ticker(), "US30Y");
        assert!(resolve_bond("test", "UNKNOWN").is_unknown());
    }

    #[test]
    fn test_open_missing_feed() {
        let err = open_feed(Path::new("/nonexistent/prices.txt")).unwrap_err();
        assert!(err.is_fatal());
        assert!(err.to_string().contains("prices.txt"));
    }
}
