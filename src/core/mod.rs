//! Price data loading, chart aggregation and return calculation

pub mod coin;
pub mod config;
pub mod error;
pub mod log;
pub mod returns;
pub mod series;
pub mod store;

// Re-export main types for cleaner imports
pub use coin::{ALL_COINS, Coin, CoinMeta, CoinSelection};
pub use error::{InputField, LoadError, QueryError};
pub use returns::{ReturnCalculator, ReturnResult};
pub use series::{AggregatedPoint, BucketKey, ChartKind, ChartSeries, Series, SeriesAggregator};
pub use store::{DataStore, PriceRecord};
