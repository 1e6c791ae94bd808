use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use cryptodash::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    /// Price dataset to load, overriding the configured one
    #[arg(short, long, global = true)]
    dataset: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl From<Commands> for cryptodash::AppCommand {
    fn from(cmd: Commands) -> cryptodash::AppCommand {
        match cmd {
            Commands::Chart { coin, kind, json } => {
                cryptodash::AppCommand::Chart { coin, kind, json }
            }
            Commands::Returns { coin, year, amount } => {
                cryptodash::AppCommand::Returns { coin, year, amount }
            }
            Commands::Coins => cryptodash::AppCommand::Coins,
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Display the series for a coin and chart kind
    Chart {
        /// Coin symbol such as BTC-USD, or ALL
        #[arg(long)]
        coin: Option<String>,
        /// One of line, bar, box, scatter, line-pct, bar-pct
        #[arg(long)]
        kind: Option<String>,
        /// Print chart-ready JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Estimate the return of an investment made at the start of a year
    Returns {
        /// Coin symbol such as BTC-USD
        #[arg(long)]
        coin: Option<String>,
        /// Purchase year, 2019 to 2024
        #[arg(long)]
        year: Option<i32>,
        /// Amount invested
        #[arg(long, allow_negative_numbers = true)]
        amount: Option<f64>,
    },
    /// List supported coins and their coverage in the dataset
    Coins,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => cryptodash::cli::setup::setup(),
        Some(cmd) => cryptodash::run_command(
            cmd.into(),
            cli.config_path.as_deref(),
            cli.dataset.as_deref(),
        ),
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
