use crate::core::Coin;
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Defines different styles for text elements.
pub enum StyleType {
    Title,
    Gain,
    Loss,
    Notice,
    Subtle,
}

/// Applies a consistent style to a string.
pub fn style_text(text: &str, style_type: StyleType) -> String {
    let styled = match style_type {
        StyleType::Title => style(text).bold().underlined(),
        StyleType::Gain => style(text).green().bold(),
        StyleType::Loss => style(text).red().bold(),
        StyleType::Notice => style(text).yellow(),
        StyleType::Subtle => style(text).dim(),
    };
    styled.to_string()
}

/// Creates a new `comfy_table::Table` with standard styling.
pub fn new_styled_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Creates a styled header cell for a table.
pub fn header_cell(text: &str) -> Cell {
    Cell::new(text)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

/// Right-aligned cell with two decimals.
pub fn value_cell(value: f64) -> Cell {
    Cell::new(format!("{value:.2}")).set_alignment(CellAlignment::Right)
}

/// Creates a cell for displaying percentage change with color coding.
pub fn change_cell(change: f64) -> Cell {
    let text = format!("{change:.2}%");
    if change >= 0.0 {
        Cell::new(text)
            .fg(Color::Green)
            .set_alignment(CellAlignment::Right)
    } else {
        Cell::new(text)
            .fg(Color::Red)
            .set_alignment(CellAlignment::Right)
    }
}

/// Creates a cell for "N/A" values.
pub fn na_cell() -> Cell {
    Cell::new("N/A")
        .fg(Color::DarkGrey)
        .set_alignment(CellAlignment::Right)
}

/// Display name of `coin`, tinted with its legend color.
pub fn coin_cell(coin: Coin) -> Cell {
    Cell::new(coin.display_name()).fg(legend_color(coin.color()))
}

fn legend_color(name: &str) -> Color {
    match name {
        "blue" => Color::Blue,
        "orange" => Color::Rgb {
            r: 255,
            g: 165,
            b: 0,
        },
        "cyan" => Color::Cyan,
        "red" => Color::Red,
        "gold" => Color::Rgb {
            r: 255,
            g: 215,
            b: 0,
        },
        "lightgreen" => Color::Green,
        "purple" => Color::Magenta,
        "gray" => Color::Grey,
        _ => Color::White,
    }
}

/// Creates a spinner shown while a blocking step runs.
pub fn new_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg} [{elapsed_precise}]")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legend_colors_cover_catalogue() {
        for coin in Coin::ALL {
            let color = legend_color(coin.color());
            if coin != Coin::Monero {
                assert_ne!(color, Color::White, "{coin} fell back to white");
            }
        }
    }

    #[test]
    fn change_cell_formats_two_decimals() {
        assert_eq!(change_cell(12.346).content(), "12.35%");
        assert_eq!(change_cell(-1.0).content(), "-1.00%");
        assert_eq!(value_cell(1500.0).content(), "1500.00");
    }
}
