// In crates/market-data/src/price_table.rs

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use core_types::{Instrument, PriceMatrix};
use ndarray::Array2;

use crate::types::{PriceField, normalize_header};
use crate::{Error, Result};

const TICKER_COLUMN: &str = "Ticker";
const DATE_COLUMN: &str = "Date";

/// Loads one-row-per-(instrument, date) price data into a `PriceMatrix`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PriceTable {
    field: PriceField,
}

/// Column positions resolved from the CSV header.
struct Columns {
    ticker: usize,
    date: usize,
    value: usize,
}

impl PriceTable {
    pub fn new(field: PriceField) -> Self {
        Self { field }
    }

    pub fn field(&self) -> PriceField {
        self.field
    }

    /// Reads the CSV at `path`.
    pub fn load(&self, path: impl AsRef<Path>) -> Result<PriceMatrix> {
        let path = path.as_ref();
        tracing::info!(path = %path.display(), field = %self.field, "Loading price table.");
        let file = File::open(path)?;
        self.from_reader(file)
    }

    /// Parses CSV from any reader. The first record must be the header.
    pub fn from_reader<R: Read>(&self, reader: R) -> Result<PriceMatrix> {
        let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
        let columns = self.resolve_columns(reader.headers()?)?;

        // instrument -> date -> value; BTreeMap gives both sort orders for free.
        let mut grouped: BTreeMap<Instrument, BTreeMap<NaiveDate, f64>> = BTreeMap::new();
        for record in reader.records() {
            let record = record.map_err(record_error)?;
            let line = record.position().map(|p| p.line()).unwrap_or_default();

            let ticker = record.get(columns.ticker).unwrap_or_default();
            if ticker.is_empty() {
                return Err(malformed(line, "empty ticker"));
            }
            let raw_date = record.get(columns.date).unwrap_or_default();
            let date = parse_date(raw_date)
                .ok_or_else(|| malformed(line, format!("unparseable date '{raw_date}'")))?;
            let raw_value = record.get(columns.value).unwrap_or_default();
            let value = raw_value
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| malformed(line, format!("'{raw_value}' is not a finite {}", self.field)))?;

            let rows = grouped.entry(Instrument(ticker.to_string())).or_default();
            if rows.insert(date, value).is_some() {
                return Err(malformed(line, format!("duplicate row for ({ticker}, {date})")));
            }
        }

        let matrix = stack(grouped)?;
        tracing::info!(
            instruments = matrix.num_instruments(),
            days = matrix.num_days(),
            "Price table loaded."
        );
        Ok(matrix)
    }

    fn resolve_columns(&self, headers: &csv::StringRecord) -> Result<Columns> {
        let find = |name: &str| {
            let wanted = normalize_header(name);
            headers
                .iter()
                .position(|h| normalize_header(h) == wanted)
                .ok_or_else(|| core_types::Error::malformed(format!("missing '{name}' column")))
        };
        Ok(Columns {
            ticker: find(TICKER_COLUMN)?,
            date: find(DATE_COLUMN)?,
            value: find(self.field.header())?,
        })
    }
}

fn malformed(line: u64, reason: impl std::fmt::Display) -> Error {
    core_types::Error::malformed(format!("line {line}: {reason}")).into()
}

/// Ragged rows are bad data, not a reader failure.
fn record_error(err: csv::Error) -> Error {
    match err.kind() {
        csv::ErrorKind::UnequalLengths { pos, expected_len, len } => malformed(
            pos.as_ref().map_or(0, |p| p.line()),
            format!("expected {expected_len} fields, found {len}"),
        ),
        _ => err.into(),
    }
}

/// Accepts plain dates, naive timestamps and RFC 3339. Bars are daily, so any time part is dropped.
fn parse_date(raw: &str) -> Option<NaiveDate> {
    const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];
    const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

    DATE_FORMATS
        .iter()
        .find_map(|f| NaiveDate::parse_from_str(raw, f).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|f| NaiveDateTime::parse_from_str(raw, f).ok())
                .map(|dt| dt.date())
        })
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
}

/// Stacks per-instrument rows into the matrix. Every instrument must share the
/// first instrument's calendar exactly; no reindexing is attempted.
fn stack(grouped: BTreeMap<Instrument, BTreeMap<NaiveDate, f64>>) -> Result<PriceMatrix> {
    let Some((first, reference)) = grouped.iter().next() else {
        return Err(core_types::Error::malformed("price table has no rows").into());
    };
    let dates: Vec<NaiveDate> = reference.keys().copied().collect();

    for (instrument, rows) in &grouped {
        if rows.len() != dates.len() {
            return Err(core_types::Error::shape(format!(
                "{instrument} has {} days but {first} has {}",
                rows.len(),
                dates.len()
            ))
            .into());
        }
        if !rows.keys().eq(dates.iter()) {
            return Err(core_types::Error::shape(format!(
                "{instrument} trades on different dates than {first}"
            ))
            .into());
        }
    }

    let shape = (grouped.len(), dates.len());
    let mut instruments = Vec::with_capacity(grouped.len());
    let mut flat = Vec::with_capacity(shape.0 * shape.1);
    for (instrument, rows) in grouped {
        instruments.push(instrument);
        flat.extend(rows.into_values());
    }
    let values = Array2::from_shape_vec(shape, flat)
        .map_err(|e| core_types::Error::shape(e.to_string()))?;

    Ok(PriceMatrix::new(instruments, dates, values)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    const SAMPLE: &str = "\
Date,Ticker,Open,High,Low,Close,Volume
2024-01-02,MSFT,370.0,376.0,366.5,370.9,25258600
2024-01-02,AAPL,187.1,188.4,183.9,185.6,82488700
2024-01-03,AAPL,184.2,185.9,183.4,184.3,58414500
2024-01-03,MSFT,369.0,373.3,368.5,370.6,23083500
2024-01-04,AAPL,182.2,183.1,180.9,181.9,71983600
2024-01-04,MSFT,370.7,373.1,367.2,367.9,20901500
";

    #[test]
    fn orders_instruments_and_days() {
        let prices = PriceTable::default().from_reader(SAMPLE.as_bytes()).unwrap();

        assert_eq!(prices.shape(), (2, 3));
        assert_eq!(prices.instruments(), &[Instrument::from("AAPL"), Instrument::from("MSFT")]);
        assert_eq!(prices.dates()[0], NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        assert_eq!(prices.row(0).to_vec(), vec![187.1, 184.2, 182.2]);
        assert_eq!(prices.row(1).to_vec(), vec![370.0, 369.0, 370.7]);
    }

    #[test]
    fn extracts_the_requested_field() {
        let prices = PriceTable::new(PriceField::Close).from_reader(SAMPLE.as_bytes()).unwrap();
        assert_eq!(prices.row(1).to_vec(), vec![370.9, 370.6, 367.9]);
    }

    #[test]
    fn accepts_timestamped_dates() {
        let csv = "Ticker,Date,Open\nAAA,2024-01-02 00:00:00,1.0\nAAA,2024-01-03T00:00:00,2.0\n";
        let prices = PriceTable::default().from_reader(csv.as_bytes()).unwrap();
        assert_eq!(prices.num_days(), 2);
    }

    #[test]
    fn duplicate_keys_are_malformed() {
        let csv = "Ticker,Date,Open\nAAA,2024-01-02,1.0\nAAA,2024-01-02,1.5\n";
        let err = PriceTable::default().from_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, Error::Data(core_types::Error::MalformedInput { .. })), "{err}");
    }

    #[test]
    fn unparseable_dates_are_malformed() {
        let csv = "Ticker,Date,Open\nAAA,yesterday,1.0\n";
        let err = PriceTable::default().from_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, Error::Data(core_types::Error::MalformedInput { .. })), "{err}");
    }

    #[test]
    fn ragged_rows_are_malformed() {
        let csv = "Ticker,Date,Open\nAAA,2024-01-02,1.0\nAAA,2024-01-03\n";
        let err = PriceTable::default().from_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, Error::Data(core_types::Error::MalformedInput { .. })), "{err}");
        assert!(err.to_string().contains("line 3"), "{err}");
    }

    #[test]
    fn missing_columns_are_malformed() {
        let csv = "Ticker,Date,Close\nAAA,2024-01-02,1.0\n";
        let err = PriceTable::new(PriceField::Open).from_reader(csv.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("missing 'Open' column"), "{err}");
    }

    #[test]
    fn empty_input_is_malformed() {
        let err = PriceTable::default().from_reader("Ticker,Date,Open\n".as_bytes()).unwrap_err();
        assert!(matches!(err, Error::Data(core_types::Error::MalformedInput { .. })));
    }

    #[test]
    fn uneven_day_counts_are_a_shape_mismatch() {
        let csv = "Ticker,Date,Open\nAAA,2024-01-02,1.0\nAAA,2024-01-03,1.1\nBBB,2024-01-02,2.0\n";
        let err = PriceTable::default().from_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, Error::Data(core_types::Error::ShapeMismatch { .. })), "{err}");
    }

    #[test]
    fn misaligned_calendars_are_a_shape_mismatch() {
        let csv = "Ticker,Date,Open\nAAA,2024-01-02,1.0\nAAA,2024-01-03,1.1\nBBB,2024-01-02,2.0\nBBB,2024-01-04,2.1\n";
        let err = PriceTable::default().from_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, Error::Data(core_types::Error::ShapeMismatch { .. })), "{err}");
    }

    #[test]
    fn loads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let prices = PriceTable::default().load(file.path()).unwrap();
        assert_eq!(prices.num_instruments(), 2);

        let err = PriceTable::default().load("does/not/exist.csv").unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
