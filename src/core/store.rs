//! Loads the historical price dataset and answers read-only queries over it.

use crate::core::coin::{Coin, CoinMeta, CoinSelection};
use crate::core::error::{LoadError, QueryError};
use chrono::{DateTime, Datelike, Months, NaiveDate, NaiveDateTime};
use csv::{ByteRecord, ReaderBuilder, StringRecord, Trim};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

/// First calendar year kept by the loader.
pub const FIRST_YEAR: i32 = 2019;
/// Last calendar year kept by the loader.
pub const LAST_YEAR: i32 = 2024;

const DATE_COLUMN: &str = "Date";
const COIN_COLUMN: &str = "Crypto";
const PRICE_COLUMN: &str = "Adj Close";

/// One normalized row of the dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceRecord {
    pub date: NaiveDate,
    pub coin: Coin,
    pub adj_close: f64,
    pub year: i32,
    /// Last calendar day of the record's month.
    pub month_end: NaiveDate,
}

impl PriceRecord {
    fn new(date: NaiveDate, coin: Coin, adj_close: f64) -> Option<Self> {
        let month_end = date
            .with_day(1)?
            .checked_add_months(Months::new(1))?
            .pred_opt()?;
        Some(Self {
            date,
            coin,
            adj_close,
            year: date.year(),
            month_end,
        })
    }
}

/// Row counts collected while loading, by outcome.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadSummary {
    pub rows_read: usize,
    pub kept: usize,
    pub missing_field: usize,
    pub bad_date: usize,
    pub out_of_window: usize,
    pub bad_price: usize,
    pub unknown_coin: usize,
}

impl LoadSummary {
    pub fn dropped(&self) -> usize {
        self.rows_read - self.kept
    }
}

/// Immutable snapshot of the price dataset.
///
/// A store only exists once loading has fully succeeded, so every holder sees
/// the complete record set. Records keep their source order.
#[derive(Debug)]
pub struct DataStore {
    records: Vec<PriceRecord>,
    summary: LoadSummary,
}

struct Columns {
    date: usize,
    coin: usize,
    price: usize,
}

impl Columns {
    fn locate(headers: &StringRecord) -> Result<Self, LoadError> {
        let find = |name: &'static str| {
            headers
                .iter()
                .position(|h| h.trim() == name)
                .ok_or(LoadError::MissingColumn(name))
        };
        Ok(Self {
            date: find(DATE_COLUMN)?,
            coin: find(COIN_COLUMN)?,
            price: find(PRICE_COLUMN)?,
        })
    }
}

impl DataStore {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        let path = path.as_ref();
        debug!("Loading dataset from {}", path.display());
        let file = File::open(path).map_err(|source| LoadError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, LoadError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(reader);
        let columns = Columns::locate(reader.headers()?)?;

        let mut records = Vec::new();
        let mut summary = LoadSummary::default();
        // Fields are decoded per row so one badly encoded cell drops only its row.
        for row in reader.byte_records() {
            let row = row?;
            summary.rows_read += 1;
            if let Some(record) = parse_row(&row, &columns, &mut summary) {
                records.push(record);
            }
        }
        summary.kept = records.len();

        if records.is_empty() {
            return Err(LoadError::NoValidRows {
                start_year: FIRST_YEAR,
                end_year: LAST_YEAR,
            });
        }

        info!(
            "Loaded {} price records ({} rows dropped)",
            summary.kept,
            summary.dropped()
        );
        debug!("Load summary: {summary:?}");
        Ok(Self { records, summary })
    }

    pub fn all_records(&self) -> &[PriceRecord] {
        &self.records
    }

    /// Records for `symbol` in source order; `ALL` returns every record.
    pub fn records_for_coin(&self, symbol: &str) -> Result<Vec<&PriceRecord>, QueryError> {
        let selection: CoinSelection = symbol.parse()?;
        Ok(self.select(selection))
    }

    pub fn select(&self, selection: CoinSelection) -> Vec<&PriceRecord> {
        self.records
            .iter()
            .filter(|r| selection.matches(r.coin))
            .collect()
    }

    pub fn coin_meta(&self, symbol: &str) -> Result<CoinMeta, QueryError> {
        symbol.parse::<Coin>().map(|coin| coin.meta())
    }

    /// Earliest date of `year` across every coin in the dataset.
    pub fn earliest_date_in_year(&self, year: i32) -> Option<NaiveDate> {
        self.records
            .iter()
            .filter(|r| r.year == year)
            .map(|r| r.date)
            .min()
    }

    /// Coins with at least one record, in catalogue order.
    pub fn coins_present(&self) -> Vec<Coin> {
        Coin::ALL
            .into_iter()
            .filter(|coin| self.records.iter().any(|r| r.coin == *coin))
            .collect()
    }

    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = self.records.iter().map(|r| r.date).min()?;
        let last = self.records.iter().map(|r| r.date).max()?;
        Some((first, last))
    }

    pub fn summary(&self) -> &LoadSummary {
        &self.summary
    }
}

fn parse_row(
    row: &ByteRecord,
    columns: &Columns,
    summary: &mut LoadSummary,
) -> Option<PriceRecord> {
    let field = |idx: usize| row.get(idx).filter(|v| !v.is_empty());
    let (Some(date), Some(symbol), Some(price)) = (
        field(columns.date),
        field(columns.coin),
        field(columns.price),
    ) else {
        summary.missing_field += 1;
        return None;
    };

    let Some(date) = text(date).and_then(parse_date) else {
        debug!(
            "Dropping row with unparseable date '{}'",
            String::from_utf8_lossy(date)
        );
        summary.bad_date += 1;
        return None;
    };
    if !(FIRST_YEAR..=LAST_YEAR).contains(&date.year()) {
        summary.out_of_window += 1;
        return None;
    }
    let Some(adj_close) = text(price)
        .and_then(|p| p.parse::<f64>().ok())
        .filter(|p| p.is_finite())
    else {
        debug!(
            "Dropping row with invalid price '{}'",
            String::from_utf8_lossy(price)
        );
        summary.bad_price += 1;
        return None;
    };
    let Some(coin) = text(symbol).and_then(|s| s.parse::<Coin>().ok()) else {
        debug!(
            "Dropping row with unknown coin '{}'",
            String::from_utf8_lossy(symbol)
        );
        summary.unknown_coin += 1;
        return None;
    };

    PriceRecord::new(date, coin, adj_close)
}

fn text(bytes: &[u8]) -> Option<&str> {
    std::str::from_utf8(bytes).ok()
}

/// Parses the date forms seen in exported price sheets; `None` if none match.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(date);
    }
    for fmt in [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
    ] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, fmt) {
            return Some(dt.date());
        }
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.date_naive());
    }
    NaiveDate::parse_from_str(value, "%m/%d/%Y").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_from(csv: &str) -> DataStore {
        DataStore::from_reader(csv.as_bytes()).expect("dataset should load")
    }

    const SAMPLE: &str = "\
Date,Open,Adj Close,Crypto
2019-01-01,1,3800.5,BTC-USD
2019-01-01,1,140.0,ETH-USD
not-a-date,1,1.0,BTC-USD
2018-12-31,1,3700.0,BTC-USD
2025-01-01,1,99000.0,BTC-USD
2020-02-15,1,,BTC-USD
2020-02-15,1,9800.0,
2020-02-15,1,abc,ETH-USD
2020-02-15,1,0.1,ADA-USD
2020-02-15 00:00:00,1,9900.0,BTC-USD
";

    #[test]
    fn load_filters_invalid_rows() {
        let store = store_from(SAMPLE);
        let records = store.all_records();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].coin, Coin::Bitcoin);
        assert_eq!(records[1].coin, Coin::Ethereum);
        assert_eq!(records[2].date, NaiveDate::from_ymd_opt(2020, 2, 15).unwrap());

        let summary = store.summary();
        assert_eq!(summary.rows_read, 10);
        assert_eq!(summary.kept, 3);
        assert_eq!(summary.bad_date, 1);
        assert_eq!(summary.out_of_window, 2);
        assert_eq!(summary.missing_field, 2);
        assert_eq!(summary.bad_price, 1);
        assert_eq!(summary.unknown_coin, 1);
        assert_eq!(summary.dropped(), 7);
    }

    #[test]
    fn load_drops_badly_encoded_rows() {
        let mut csv = b"Date,Adj Close,Crypto\n2020-01-01,100,BTC-USD\n".to_vec();
        csv.extend_from_slice(b"\xff\xfe,1,BTC-USD\n");
        csv.extend_from_slice(b"2020-01-15,\xff,BTC-USD\n");
        csv.extend_from_slice(b"2020-02-01,110,BTC-USD\n");
        let store = DataStore::from_reader(csv.as_slice()).unwrap();

        assert_eq!(store.all_records().len(), 2);
        assert_eq!(store.all_records()[1].adj_close, 110.0);
        assert_eq!(store.summary().bad_date, 1);
        assert_eq!(store.summary().bad_price, 1);
    }

    #[test]
    fn derived_fields_are_computed() {
        let store = store_from(SAMPLE);
        let leap = &store.all_records()[2];
        assert_eq!(leap.year, 2020);
        assert_eq!(leap.month_end, NaiveDate::from_ymd_opt(2020, 2, 29).unwrap());

        let december = PriceRecord::new(
            NaiveDate::from_ymd_opt(2021, 12, 5).unwrap(),
            Coin::Solana,
            1.0,
        )
        .unwrap();
        assert_eq!(december.month_end, NaiveDate::from_ymd_opt(2021, 12, 31).unwrap());
    }

    #[test]
    fn load_fails_without_valid_rows() {
        let err = DataStore::from_reader("Date,Adj Close,Crypto\n2010-01-01,1.0,BTC-USD\n".as_bytes())
            .unwrap_err();
        assert!(matches!(err, LoadError::NoValidRows { .. }));
    }

    #[test]
    fn load_fails_on_missing_column() {
        let err = DataStore::from_reader("Date,Close,Crypto\n2020-01-01,1.0,BTC-USD\n".as_bytes())
            .unwrap_err();
        assert!(matches!(err, LoadError::MissingColumn("Adj Close")));
    }

    #[test]
    fn load_fails_on_unreadable_path() {
        let err = DataStore::load("/definitely/not/here.csv").unwrap_err();
        assert!(matches!(err, LoadError::Read { .. }));
    }

    #[test]
    fn records_for_coin_filters_and_accepts_all() {
        let store = store_from(SAMPLE);
        assert_eq!(store.records_for_coin("ALL").unwrap().len(), 3);
        let btc = store.records_for_coin("BTC-USD").unwrap();
        assert_eq!(btc.len(), 2);
        assert!(btc.iter().all(|r| r.coin == Coin::Bitcoin));
        assert!(store.records_for_coin("SOL-USD").unwrap().is_empty());
        assert_eq!(
            store.records_for_coin("FOO").unwrap_err(),
            QueryError::UnknownCoin("FOO".to_string())
        );
    }

    #[test]
    fn coin_meta_rejects_unknown_symbols() {
        let store = store_from(SAMPLE);
        assert_eq!(store.coin_meta("XRP-USD").unwrap().display_name, "Ripple");
        assert!(matches!(
            store.coin_meta("ALL"),
            Err(QueryError::UnknownCoin(_))
        ));
    }

    #[test]
    fn earliest_date_spans_all_coins() {
        let store = store_from(
            "Date,Adj Close,Crypto\n\
             2021-01-03,10,BTC-USD\n\
             2021-01-01,20,ETH-USD\n\
             2021-06-01,30,BTC-USD\n",
        );
        assert_eq!(
            store.earliest_date_in_year(2021),
            NaiveDate::from_ymd_opt(2021, 1, 1)
        );
        assert_eq!(store.earliest_date_in_year(2022), None);
        assert_eq!(store.coins_present(), vec![Coin::Bitcoin, Coin::Ethereum]);
        assert_eq!(
            store.date_range(),
            Some((
                NaiveDate::from_ymd_opt(2021, 1, 1).unwrap(),
                NaiveDate::from_ymd_opt(2021, 6, 1).unwrap()
            ))
        );
    }

    #[test]
    fn parse_date_accepts_common_forms() {
        let expected = NaiveDate::from_ymd_opt(2022, 3, 4);
        assert_eq!(parse_date("2022-03-04"), expected);
        assert_eq!(parse_date("2022-03-04 10:11:12"), expected);
        assert_eq!(parse_date("2022-03-04T10:11:12.500"), expected);
        assert_eq!(parse_date("2022-03-04T10:11:12+00:00"), expected);
        assert_eq!(parse_date("03/04/2022"), expected);
        assert_eq!(parse_date("2022-13-01"), None);
        assert_eq!(parse_date(""), None);
    }
}
