// In app/src/main.rs

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use core_types::Decision;
use tracing_subscriber::filter::{LevelFilter, Targets};
use tracing_subscriber::prelude::*;

// --- Command-Line Interface Definition ---

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about,
    long_about = "Computes moving-average crossover trades over a daily price table, scores them, and saves the trade grid."
)]
struct Cli {
    /// CSV of daily prices with `Ticker`, `Date` and price columns.
    #[arg(short, long)]
    prices: PathBuf,
}

fn main() -> Result<()> {
    // Load environment variables from a .env file, if it exists.
    dotenvy::dotenv().ok();

    // Parse command-line arguments.
    let cli = Cli::parse();

    let settings = app_config::load_settings().context("Failed to load application settings")?;

    let level: LevelFilter = settings
        .app
        .log_level
        .parse()
        .with_context(|| format!("Invalid log level `{}`", settings.app.log_level))?;
    let fmt_layer = tracing_subscriber::fmt::layer().with_filter(Targets::new().with_default(level));
    tracing_subscriber::registry().with(fmt_layer).init();

    tracing::info!("Starting crossover pipeline");

    let outcome = crossover::pipeline::run(&cli.prices, &settings)?;

    tracing::info!(
        buys = outcome.trades.count(Decision::Buy),
        sells = outcome.trades.count(Decision::Sell),
        net_pnl = %outcome.report.net_pnl_absolute,
        output = %settings.data.output_path.display(),
        "Pipeline finished."
    );
    Ok(())
}
