use super::ui;
use crate::core::{Coin, CoinSelection, DataStore};
use chrono::NaiveDate;
use comfy_table::{Cell, CellAlignment};

/// Catalogue table with per-coin record counts and date coverage.
pub fn render(store: &DataStore) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Symbol"),
        ui::header_cell("Name"),
        ui::header_cell("Records"),
        ui::header_cell("First"),
        ui::header_cell("Last"),
    ]);

    for coin in Coin::ALL {
        let records = store.select(CoinSelection::Single(coin));
        let first = records.iter().map(|r| r.date).min();
        let last = records.iter().map(|r| r.date).max();
        let date_cell = |d: Option<NaiveDate>| {
            d.map_or_else(ui::na_cell, |d| Cell::new(d.to_string()))
        };
        table.add_row(vec![
            Cell::new(coin.symbol()),
            ui::coin_cell(coin),
            Cell::new(records.len()).set_alignment(CellAlignment::Right),
            date_cell(first),
            date_cell(last),
        ]);
    }

    let summary = store.summary();
    let footer = match store.date_range() {
        Some((first, last)) => format!(
            "{} records from {first} to {last} ({} rows dropped)",
            summary.kept,
            summary.dropped()
        ),
        None => "No records".to_string(),
    };
    format!("{table}\n{}", ui::style_text(&footer, ui::StyleType::Subtle))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_every_coin_with_counts() {
        let store = DataStore::from_reader(
            "Date,Adj Close,Crypto\n\
             2020-01-01,1,DOGE-USD\n\
             2020-02-01,2,DOGE-USD\n\
             2017-01-01,2,DOGE-USD\n"
                .as_bytes(),
        )
        .unwrap();
        let output = render(&store);
        for coin in Coin::ALL {
            assert!(output.contains(coin.symbol()));
        }
        assert!(output.contains("2020-02-01"));
        assert!(output.contains("(1 rows dropped)"));
    }
}
