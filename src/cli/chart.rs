use super::{ui, user_message};
use crate::core::{ChartSeries, DataStore, Series, SeriesAggregator};
use anyhow::{Context, Result};
use comfy_table::Cell;
use serde_json::json;
use tracing::info;

pub const NO_SELECTION: &str = "No coin selected.";
const TITLE: &str = "Adjusted close price over time";

pub fn run(store: &DataStore, coin: &str, kind: &str, as_json: bool) -> Result<()> {
    info!("Building {kind} chart for {coin}");
    let series = match SeriesAggregator::new(store).aggregate(coin, kind) {
        Ok(series) => series,
        Err(e) => {
            println!("{}", ui::style_text(&user_message(&e), ui::StyleType::Notice));
            return Ok(());
        }
    };

    let output = if as_json {
        render_json(&series)?
    } else {
        render_table(&series)
    };
    println!("{output}");
    Ok(())
}

/// Chart-ready JSON for an external renderer.
pub fn render_json(series: &Series) -> Result<String> {
    let value = match series {
        Series::NoSelection => json!({ "message": NO_SELECTION, "points": [] }),
        Series::Chart(chart) => serde_json::to_value(chart).context("Failed to serialize series")?,
    };
    serde_json::to_string_pretty(&value).context("Failed to serialize series")
}

pub fn render_table(series: &Series) -> String {
    match series {
        Series::NoSelection => ui::style_text(NO_SELECTION, ui::StyleType::Notice),
        Series::Chart(chart) => chart_table(chart),
    }
}

fn chart_table(chart: &ChartSeries) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Crypto"),
        ui::header_cell(chart.x_label),
        ui::header_cell(chart.y_label),
    ]);

    for point in chart.in_bucket_order() {
        let y = match point.plotted(chart.kind) {
            Some(v) if chart.kind.is_percent() => ui::change_cell(v),
            Some(v) => ui::value_cell(v),
            None => ui::na_cell(),
        };
        table.add_row(vec![
            ui::coin_cell(point.coin),
            Cell::new(point.bucket.to_string()),
            y,
        ]);
    }

    format!(
        "{} {}\n\n{table}",
        ui::style_text(TITLE, ui::StyleType::Title),
        ui::style_text(&format!("({})", chart.kind), ui::StyleType::Subtle)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> DataStore {
        DataStore::from_reader(
            "Date,Adj Close,Crypto\n\
             2020-01-01,100,BTC-USD\n\
             2021-01-01,150,BTC-USD\n"
                .as_bytes(),
        )
        .unwrap()
    }

    #[test]
    fn table_lists_points_with_display_names() {
        let store = store();
        let series = SeriesAggregator::new(&store).aggregate("BTC-USD", "bar-pct").unwrap();
        let output = render_table(&series);
        assert!(output.contains("Bitcoin"));
        assert!(output.contains("Percent"));
        assert!(output.contains("N/A"));
        assert!(output.contains("50.00%"));
        assert!(!output.contains("BTC-USD"));
    }

    #[test]
    fn table_rows_follow_bucket_order() {
        let store = DataStore::from_reader(
            "Date,Adj Close,Crypto\n\
             2021-03-01,30,XRP-USD\n\
             2021-01-01,10,XRP-USD\n"
                .as_bytes(),
        )
        .unwrap();
        let series = SeriesAggregator::new(&store).aggregate("XRP-USD", "line").unwrap();
        let output = render_table(&series);
        let january = output.find("2021-01-01").unwrap();
        let march = output.find("2021-03-01").unwrap();
        assert!(january < march);
    }

    #[test]
    fn json_reports_empty_selection() {
        let store = store();
        let series = SeriesAggregator::new(&store).aggregate("ETH-USD", "line").unwrap();
        let value: serde_json::Value = serde_json::from_str(&render_json(&series).unwrap()).unwrap();
        assert_eq!(value["message"], NO_SELECTION);
        assert_eq!(value["points"].as_array().unwrap().len(), 0);
    }

    #[test]
    fn json_carries_axis_labels() {
        let store = store();
        let series = SeriesAggregator::new(&store).aggregate("ALL", "line").unwrap();
        let value: serde_json::Value = serde_json::from_str(&render_json(&series).unwrap()).unwrap();
        assert_eq!(value["x_label"], "Date");
        assert_eq!(value["y_label"], "Adj Close");
        assert_eq!(value["points"][1]["bucket"], "2021-01-01");
        assert_eq!(value["points"][1]["color"], "blue");
    }
}
