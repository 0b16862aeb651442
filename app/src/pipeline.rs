// In app/src/pipeline.rs

use std::path::Path;

use analytics::types::PerformanceReport;
use anyhow::{Context, Result};
use app_config::Settings;
use backtester::Evaluator;
use core_types::{Decision, PriceMatrix, TradeMatrix};
use market_data::PriceTable;
use strategies::{MACrossover, Strategy};

/// Everything a pipeline run produces besides the saved trade file.
#[derive(Debug)]
pub struct PipelineOutcome {
    pub prices: PriceMatrix,
    pub trades: TradeMatrix,
    pub report: PerformanceReport,
}

/// Loads prices, computes crossover trades, saves the trade grid to
/// `settings.data.output_path` and evaluates it.
///
/// Any structural problem in the input aborts the run before anything is written.
/// The trade grid is on disk before evaluation starts.
pub fn run(prices_path: &Path, settings: &Settings) -> Result<PipelineOutcome> {
    settings.strategy.validate().context("Invalid strategy settings")?;
    let starting_cash = settings.evaluation.starting_cash()?;

    let prices = PriceTable::new(settings.data.price_field)
        .load(prices_path)
        .with_context(|| format!("Failed to load prices from {}", prices_path.display()))?;
    tracing::info!(
        instruments = prices.num_instruments(),
        days = prices.num_days(),
        "Price matrix loaded."
    );

    let trades = generate_trades(&prices, &MACrossover::new(settings.strategy));

    storage::save_trades(&settings.data.output_path, &trades)
        .with_context(|| format!("Failed to save trades to {}", settings.data.output_path.display()))?;

    let evaluator = Evaluator::new(settings.evaluation.simulation());
    let report = evaluator
        .evaluate(&trades, &prices, starting_cash, settings.evaluation.verbose)
        .context("Evaluation failed")?;

    Ok(PipelineOutcome { prices, trades, report })
}

/// Runs `strategy` over every instrument, warning about rows too short to ever trade.
pub fn generate_trades(prices: &PriceMatrix, strategy: &MACrossover) -> TradeMatrix {
    for warning in strategies::history_warnings(prices, strategy.settings().slow_window) {
        tracing::warn!(instrument = %warning.instrument, "{warning}");
    }

    let trades = strategy.compute_signals(prices);
    tracing::info!(
        strategy = strategy.name(),
        buys = trades.count(Decision::Buy),
        sells = trades.count(Decision::Sell),
        "Signals computed."
    );
    trades
}
