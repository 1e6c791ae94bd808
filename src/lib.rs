pub mod cli;
pub mod core;

use crate::core::{DataStore, config::AppConfig};
use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::{debug, info};

/// A request handled against the loaded dataset.
#[derive(Debug, Clone)]
pub enum AppCommand {
    Chart {
        coin: Option<String>,
        kind: Option<String>,
        json: bool,
    },
    Returns {
        coin: Option<String>,
        year: Option<i32>,
        amount: Option<f64>,
    },
    Coins,
}

pub fn run_command(
    command: AppCommand,
    config_path: Option<&str>,
    dataset: Option<&str>,
) -> Result<()> {
    info!("Crypto dashboard starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let dataset_path = match dataset {
        Some(path) => PathBuf::from(path),
        None => config.dataset_path()?,
    };

    // The store is only handed out once loading has succeeded.
    let pb = cli::ui::new_spinner("Loading dataset...");
    let loaded = DataStore::load(&dataset_path);
    pb.finish_and_clear();
    let store = loaded
        .with_context(|| format!("Failed to load dataset {}", dataset_path.display()))?;

    match command {
        AppCommand::Chart { coin, kind, json } => {
            let coin = coin.unwrap_or_else(|| config.defaults.coin.clone());
            let kind = kind.unwrap_or_else(|| config.defaults.chart.clone());
            cli::chart::run(&store, &coin, &kind, json)
        }
        AppCommand::Returns { coin, year, amount } => cli::returns::run(
            &store,
            coin.as_deref(),
            year,
            amount,
            &config.currency_prefix,
        ),
        AppCommand::Coins => {
            println!("{}", cli::coins::render(&store));
            Ok(())
        }
    }
}
