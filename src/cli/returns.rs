use super::{ui, user_message};
use crate::core::{DataStore, ReturnCalculator, ReturnResult};
use anyhow::Result;
use comfy_table::Cell;
use tracing::info;

pub const MISSING_FIELDS: &str = "Please fill in all fields.";
pub const PRICE_UNAVAILABLE: &str =
    "Purchase price not available for the selected coin and year.";

pub fn run(
    store: &DataStore,
    coin: Option<&str>,
    year: Option<i32>,
    amount: Option<f64>,
    currency_prefix: &str,
) -> Result<()> {
    let (Some(coin), Some(year), Some(amount)) = (coin, year, amount) else {
        println!("{}", ui::style_text(MISSING_FIELDS, ui::StyleType::Notice));
        return Ok(());
    };

    info!("Calculating return of {amount} in {coin} bought in {year}");
    match ReturnCalculator::new(store).compute_return(coin, year, amount) {
        Ok(result) => {
            println!("{}", format_message(&result, currency_prefix));
            println!("{}", details_table(&result, currency_prefix));
        }
        Err(e) => println!("{}", ui::style_text(&user_message(&e), ui::StyleType::Notice)),
    }
    Ok(())
}

/// One-line outcome, green for a gain and red otherwise.
pub fn format_message(result: &ReturnResult, currency_prefix: &str) -> String {
    let text = plain_message(result, currency_prefix);
    let style_type = if result.is_gain() {
        ui::StyleType::Gain
    } else {
        ui::StyleType::Loss
    };
    ui::style_text(&text, style_type)
}

pub fn plain_message(result: &ReturnResult, currency_prefix: &str) -> String {
    format!(
        "Current value: {currency_prefix}{:.2}, Investment profit: {currency_prefix}{:.2}",
        result.current_value, result.profit
    )
}

fn details_table(result: &ReturnResult, currency_prefix: &str) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![ui::header_cell(result.coin.display_name()), ui::header_cell("")]);
    let money = |v: f64| format!("{currency_prefix}{v:.2}");
    table.add_row(vec![
        Cell::new(format!("Bought {}", result.purchase_date)),
        Cell::new(money(result.purchase_price)),
    ]);
    table.add_row(vec![
        Cell::new(format!("Valued {}", result.valuation_date)),
        Cell::new(money(result.current_price)),
    ]);
    table.add_row(vec![Cell::new("Units"), Cell::new(format!("{:.6}", result.quantity))]);
    table.add_row(vec![
        Cell::new("Annualized"),
        result.annualized_return.map_or_else(ui::na_cell, ui::change_cell),
    ]);
    table.to_string()
}
