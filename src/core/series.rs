//! Turns price records into the series each chart kind plots.
use crate::core::coin::{Coin, CoinSelection};
use crate::core::error::QueryError;
use crate::core::store::{DataStore, PriceRecord};
use chrono::NaiveDate;
use serde::{Serialize, Serializer};
use std::collections::HashMap;
use std::fmt::Display;
use std::str::FromStr;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChartKind {
    Line,
    Bar,
    Box,
    Scatter,
    LinePct,
    BarPct,
}

impl ChartKind {
    pub const ALL: [ChartKind; 6] = [
        ChartKind::Line,
        ChartKind::Bar,
        ChartKind::Box,
        ChartKind::Scatter,
        ChartKind::LinePct,
        ChartKind::BarPct,
    ];

    pub fn x_label(&self) -> &'static str {
        match self {
            ChartKind::Line | ChartKind::Scatter => "Date",
            ChartKind::Bar | ChartKind::BarPct => "Year",
            ChartKind::LinePct => "Month",
            ChartKind::Box => "Crypto",
        }
    }

    pub fn y_label(&self) -> &'static str {
        match self {
            ChartKind::LinePct | ChartKind::BarPct => "Percent",
            _ => "Adj Close",
        }
    }

    pub fn is_percent(&self) -> bool {
        matches!(self, ChartKind::LinePct | ChartKind::BarPct)
    }
}

impl Display for ChartKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                ChartKind::Line => "line",
                ChartKind::Bar => "bar",
                ChartKind::Box => "box",
                ChartKind::Scatter => "scatter",
                ChartKind::LinePct => "line-pct",
                ChartKind::BarPct => "bar-pct",
            }
        )
    }
}

impl FromStr for ChartKind {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        ChartKind::ALL
            .into_iter()
            .find(|kind| kind.to_string() == wanted)
            .ok_or_else(|| QueryError::UnsupportedChartKind(s.to_string()))
    }
}

/// X-axis value of a plotted point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BucketKey {
    Date(NaiveDate),
    Month(NaiveDate),
    Year(i32),
    Coin(Coin),
}

impl Display for BucketKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BucketKey::Date(date) => write!(f, "{date}"),
            BucketKey::Month(date) => write!(f, "{}", date.format("%Y-%m")),
            BucketKey::Year(year) => write!(f, "{year}"),
            BucketKey::Coin(coin) => write!(f, "{}", coin.display_name()),
        }
    }
}

/// Dates and years serialize as themselves, coins as their display name.
impl Serialize for BucketKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            BucketKey::Date(date) | BucketKey::Month(date) => date.serialize(serializer),
            BucketKey::Year(year) => serializer.serialize_i32(*year),
            BucketKey::Coin(coin) => serializer.serialize_str(coin.display_name()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregatedPoint {
    pub bucket: BucketKey,
    pub coin: Coin,
    pub display_name: &'static str,
    pub color: &'static str,
    /// Adjusted close, or its bucket mean for aggregated kinds.
    pub value: f64,
    /// Change against the coin's previous bucket; absent for the first one.
    pub percent_change: Option<f64>,
}

impl AggregatedPoint {
    fn new(bucket: BucketKey, coin: Coin, value: f64) -> Self {
        let meta = coin.meta();
        Self {
            bucket,
            coin,
            display_name: meta.display_name,
            color: meta.color,
            value,
            percent_change: None,
        }
    }

    /// The value a chart of `kind` plots on its y axis.
    pub fn plotted(&self, kind: ChartKind) -> Option<f64> {
        if kind.is_percent() {
            self.percent_change
        } else {
            Some(self.value)
        }
    }
}

/// Points are in first-seen order of (bucket, coin), which follows the
/// dataset and need not be chronological. Line renderers should draw from
/// [`ChartSeries::in_bucket_order`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub kind: ChartKind,
    pub x_label: &'static str,
    pub y_label: &'static str,
    pub points: Vec<AggregatedPoint>,
}

impl ChartSeries {
    /// Points sorted by (bucket, coin); ties keep their original order.
    pub fn in_bucket_order(&self) -> Vec<&AggregatedPoint> {
        let mut points: Vec<_> = self.points.iter().collect();
        points.sort_by_key(|p| (p.bucket, p.coin));
        points
    }
}

/// Outcome of a chart request.
#[derive(Debug, Clone, PartialEq)]
pub enum Series {
    /// The coin filter matched no records.
    NoSelection,
    Chart(ChartSeries),
}

/// Builds chart series from a borrowed [`DataStore`].
#[derive(Clone, Copy)]
pub struct SeriesAggregator<'a> {
    store: &'a DataStore,
}

impl<'a> SeriesAggregator<'a> {
    pub fn new(store: &'a DataStore) -> Self {
        Self { store }
    }

    /// Resolves raw selector values, then aggregates.
    pub fn aggregate(&self, coin: &str, kind: &str) -> Result<Series, QueryError> {
        let kind: ChartKind = kind.parse()?;
        let selection: CoinSelection = coin.parse()?;
        Ok(self.aggregate_selection(selection, kind))
    }

    pub fn aggregate_selection(&self, selection: CoinSelection, kind: ChartKind) -> Series {
        let records = self.store.select(selection);
        debug!(
            "Aggregating {} records for {selection} as {kind}",
            records.len()
        );
        build_series(&records, kind)
    }
}

/// Pure transform of `records` into the series for `kind`.
pub fn build_series(records: &[&PriceRecord], kind: ChartKind) -> Series {
    if records.is_empty() {
        return Series::NoSelection;
    }

    let points = match kind {
        ChartKind::Line | ChartKind::Scatter => records
            .iter()
            .map(|r| AggregatedPoint::new(BucketKey::Date(r.date), r.coin, r.adj_close))
            .collect(),
        ChartKind::Box => records
            .iter()
            .map(|r| AggregatedPoint::new(BucketKey::Coin(r.coin), r.coin, r.adj_close))
            .collect(),
        ChartKind::Bar => group_mean(records, |r| BucketKey::Year(r.year)),
        ChartKind::LinePct => {
            let mut points = group_mean(records, |r| BucketKey::Month(r.month_end));
            fill_percent_change(&mut points);
            points
        }
        ChartKind::BarPct => {
            let mut points = group_mean(records, |r| BucketKey::Year(r.year));
            fill_percent_change(&mut points);
            points
        }
    };

    Series::Chart(ChartSeries {
        kind,
        x_label: kind.x_label(),
        y_label: kind.y_label(),
        points,
    })
}

struct Accumulator {
    bucket: BucketKey,
    coin: Coin,
    sum: f64,
    count: usize,
}

/// Mean adjusted close per (bucket, coin), in order of first appearance.
fn group_mean(
    records: &[&PriceRecord],
    bucket_of: impl Fn(&PriceRecord) -> BucketKey,
) -> Vec<AggregatedPoint> {
    let mut index: HashMap<(BucketKey, Coin), usize> = HashMap::new();
    let mut groups: Vec<Accumulator> = Vec::new();

    for record in records {
        let bucket = bucket_of(*record);
        let slot = *index.entry((bucket, record.coin)).or_insert_with(|| {
            groups.push(Accumulator {
                bucket,
                coin: record.coin,
                sum: 0.0,
                count: 0,
            });
            groups.len() - 1
        });
        groups[slot].sum += record.adj_close;
        groups[slot].count += 1;
    }

    groups
        .into_iter()
        .map(|g| AggregatedPoint::new(g.bucket, g.coin, g.sum / g.count as f64))
        .collect()
}

/// Sets each point's change against the previous bucket of the same coin.
fn fill_percent_change(points: &mut [AggregatedPoint]) {
    let mut by_coin: HashMap<Coin, Vec<usize>> = HashMap::new();
    for (i, point) in points.iter().enumerate() {
        by_coin.entry(point.coin).or_default().push(i);
    }

    for indices in by_coin.values_mut() {
        indices.sort_by_key(|&i| points[i].bucket);
        for pair in indices.windows(2) {
            let prev = points[pair[0]].value;
            let curr = points[pair[1]].value;
            // A zero base has no defined change.
            if prev != 0.0 {
                points[pair[1]].percent_change = Some((curr - prev) / prev * 100.0);
            }
        }
    }
}
