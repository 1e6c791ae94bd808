//! Error types shared by the core components

use std::fmt::Display;
use thiserror::Error;

/// Fatal failure while loading the price dataset.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to read dataset {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse dataset: {0}")]
    Parse(#[from] csv::Error),
    #[error("Dataset is missing required column '{0}'")]
    MissingColumn(&'static str),
    #[error("Dataset has no valid rows between {start_year} and {end_year}")]
    NoValidRows { start_year: i32, end_year: i32 },
}

/// Calculator input that failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputField {
    Coin,
    Year,
    Amount,
}

impl Display for InputField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                InputField::Coin => "coin",
                InputField::Year => "year",
                InputField::Amount => "amount",
            }
        )
    }
}

/// Recoverable per-request failure.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QueryError {
    #[error("Unknown coin: {0}")]
    UnknownCoin(String),
    #[error("Unsupported chart kind: {0}")]
    UnsupportedChartKind(String),
    #[error("Invalid {0}")]
    InvalidInput(InputField),
    #[error("Purchase price not available for {coin} in {year}")]
    PriceUnavailable { coin: String, year: i32 },
}
