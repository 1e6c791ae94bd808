//! Lump-sum investment outcome over the loaded price history.
use crate::core::coin::Coin;
use crate::core::error::{InputField, QueryError};
use crate::core::store::{DataStore, FIRST_YEAR, LAST_YEAR};
use anyhow::{Result, anyhow};
use chrono::NaiveDate;
use rust_decimal::{Decimal, prelude::*};
use rust_finprim::rate::cagr;
use tracing::debug;

/// Outcome of a hypothetical investment.
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnResult {
    pub coin: Coin,
    pub invested_amount: f64,
    pub current_value: f64,
    pub profit: f64,
    pub quantity: f64,
    pub purchase_price: f64,
    pub purchase_date: NaiveDate,
    pub current_price: f64,
    pub valuation_date: NaiveDate,
    /// Compound annual growth in percent, when the holding spans a positive period.
    pub annualized_return: Option<f64>,
}

impl ReturnResult {
    /// A zero profit counts as a loss.
    pub fn is_gain(&self) -> bool {
        self.profit > 0.0
    }
}

#[derive(Clone, Copy)]
pub struct ReturnCalculator<'a> {
    store: &'a DataStore,
}

impl<'a> ReturnCalculator<'a> {
    pub fn new(store: &'a DataStore) -> Self {
        Self { store }
    }

    /// Values `invested_amount` bought at the first price of `year`.
    ///
    /// The purchase date is the earliest date of `year` across the whole
    /// dataset, not just `coin`; a coin without a price on that date yields
    /// [`QueryError::PriceUnavailable`], as does a non-positive purchase
    /// price. The current price is the coin's last
    /// record in dataset order.
    pub fn compute_return(
        &self,
        coin: &str,
        year: i32,
        invested_amount: f64,
    ) -> Result<ReturnResult, QueryError> {
        if !invested_amount.is_finite() || invested_amount <= 0.0 {
            return Err(QueryError::InvalidInput(InputField::Amount));
        }
        let coin: Coin = coin
            .parse()
            .map_err(|_| QueryError::InvalidInput(InputField::Coin))?;
        if !(FIRST_YEAR..=LAST_YEAR).contains(&year) {
            return Err(QueryError::InvalidInput(InputField::Year));
        }

        let unavailable = || QueryError::PriceUnavailable {
            coin: coin.to_string(),
            year,
        };
        let anchor = self.store.earliest_date_in_year(year).ok_or_else(unavailable)?;
        let purchase = self
            .store
            .all_records()
            .iter()
            .find(|r| r.coin == coin && r.date == anchor)
            .filter(|r| r.adj_close > 0.0)
            .ok_or_else(unavailable)?;
        let current = self
            .store
            .all_records()
            .iter()
            .rev()
            .find(|r| r.coin == coin)
            .ok_or_else(unavailable)?;

        let quantity = invested_amount / purchase.adj_close;
        let current_value = quantity * current.adj_close;
        let profit = current_value - invested_amount;
        debug!(
            "{coin}: bought {quantity} at {} on {anchor}, now {} on {}",
            purchase.adj_close, current.adj_close, current.date
        );

        let annualized_return =
            annualized(purchase.adj_close, current.adj_close, anchor, current.date)
                .inspect_err(|e| debug!("No annualized return for {coin}: {e}"))
                .ok();

        Ok(ReturnResult {
            coin,
            invested_amount,
            current_value,
            profit,
            quantity,
            purchase_price: purchase.adj_close,
            purchase_date: anchor,
            current_price: current.adj_close,
            valuation_date: current.date,
            annualized_return,
        })
    }
}

/// Bound on the yearly growth factor handed to `cagr`; `Decimal` powers
/// panic on overflow.
const MAX_GROWTH_FACTOR: f64 = 1e12;

fn annualized(begin: f64, end: f64, from: NaiveDate, to: NaiveDate) -> Result<f64> {
    let days = (to - from).num_days();
    if days <= 0 {
        return Err(anyhow!("Holding period is not positive"));
    }
    if begin <= 0.0 || end <= 0.0 {
        return Err(anyhow!("Prices must be positive"));
    }
    let factor = (end / begin).powf(365.0 / days as f64);
    if !factor.is_finite() || !(1.0 / MAX_GROWTH_FACTOR..=MAX_GROWTH_FACTOR).contains(&factor) {
        return Err(anyhow!("Annualized growth factor {factor} is out of range"));
    }

    let begin_bal = Decimal::from_f64(begin).ok_or_else(|| anyhow!("Invalid purchase price"))?;
    let end_bal = Decimal::from_f64(end).ok_or_else(|| anyhow!("Invalid current price"))?;
    let n_years =
        Decimal::from_f64(days as f64 / 365.0).ok_or_else(|| anyhow!("Invalid duration"))?;

    let rate = cagr(begin_bal, end_bal, n_years);
    (rate * Decimal::from(100))
        .to_f64()
        .ok_or_else(|| anyhow!("CAGR percentage conversion failed"))
}
