pub mod error;
pub mod logger;

use analytics::engine::AnalyticsEngine;
use analytics::types::PerformanceReport;
use core_types::{Decision, PriceMatrix, TradeMatrix};
use execution::{Executor, OrderRequest, Portfolio, SimulatedExecutor, SimulationSettings};
use rust_decimal::Decimal;

pub use error::{Error, Result};
pub use logger::TradeLogger;

/// Replays a trade matrix against its price matrix under a cash/position model.
///
/// Each `Buy`/`Sell` cell is a position target for that instrument, filled at
/// that day's price; `Hold` leaves the position alone.
#[derive(Debug, Clone, Default)]
pub struct Evaluator {
    settings: SimulationSettings,
}

impl Evaluator {
    pub fn new(settings: SimulationSettings) -> Self {
        Self { settings }
    }

    pub fn evaluate(
        &self,
        trades: &TradeMatrix,
        prices: &PriceMatrix,
        starting_cash: Decimal,
        verbose: bool,
    ) -> Result<PerformanceReport> {
        if trades.shape() != prices.shape() {
            return Err(core_types::Error::shape(format!(
                "trade matrix is {:?} but price matrix is {:?}",
                trades.shape(),
                prices.shape()
            ))
            .into());
        }
        if starting_cash < Decimal::ZERO {
            return Err(Error::InvalidStartingCash(starting_cash));
        }

        let mut executor = SimulatedExecutor::new(self.settings)?;
        let mut portfolio = Portfolio::new(starting_cash);
        let mut logger = TradeLogger::new();
        let mut orders_executed = 0u32;
        let mut orders_vetoed = 0u32;
        let mut fees_paid = Decimal::ZERO;

        tracing::info!(
            executor = executor.name(),
            instruments = prices.num_instruments(),
            days = prices.num_days(),
            %starting_cash,
            "Evaluating trades."
        );

        let (rows, days) = prices.shape();
        for day in 0..days {
            let day_prices = prices.column(day);
            let day_decisions = trades.column(day);

            for row in 0..rows {
                let decision = day_decisions[row];
                if decision == Decision::Hold {
                    continue;
                }
                let order = OrderRequest { row, decision };
                match executor.execute(&order, day_prices[row], day, &mut portfolio) {
                    Ok(Some(execution)) => {
                        orders_executed += 1;
                        fees_paid += execution.fee;
                        if let Some(closed) = &execution.closed {
                            let instrument = prices.instruments()[row].clone();
                            logger.record_trade(instrument, closed, &execution);
                        }
                    }
                    Ok(None) => {}
                    Err(e) => {
                        orders_vetoed += 1;
                        tracing::warn!(
                            instrument = %prices.instruments()[row],
                            day,
                            ?decision,
                            error = %e,
                            "Order vetoed."
                        );
                    }
                }
            }

            let value = portfolio.mark_to_market(day_prices, day)?;
            logger.record_equity(day, prices.dates().get(day).copied(), value);
        }

        let mut report = AnalyticsEngine::new().calculate(starting_cash, &logger.trades, &logger.equity_curve);
        report.final_cash = portfolio.cash;
        report.fees_paid = fees_paid;
        report.orders_executed = orders_executed;
        report.orders_vetoed = orders_vetoed;
        report.unrealized_pnl = portfolio.unrealized_pnl()?;

        tracing::info!(
            final_value = %report.final_value,
            net_pnl = %report.net_pnl_absolute,
            orders_executed,
            orders_vetoed,
            "Evaluation finished."
        );

        if verbose {
            print_report(&report);
        }
        Ok(report)
    }
}

/// Evaluates with the default simulation settings (one unit per position, no fees).
pub fn evaluate(
    trades: &TradeMatrix,
    prices: &PriceMatrix,
    starting_cash: Decimal,
    verbose: bool,
) -> Result<PerformanceReport> {
    Evaluator::default().evaluate(trades, prices, starting_cash, verbose)
}

/// Helper function to print the performance report in a readable format.
pub fn print_report(report: &PerformanceReport) {
    println!("\n--- Evaluation Report ---");
    println!("-----------------------------------");
    println!("Starting Cash:         ${:.2}", report.starting_cash);
    println!("Final Cash:            ${:.2}", report.final_cash);
    println!("Final Portfolio Value: ${:.2}", report.final_value);
    println!("Net P&L:               ${:.2} ({:.2}%)", report.net_pnl_absolute, report.net_pnl_percentage);
    println!("Realized P&L:          ${:.2}", report.realized_pnl);
    println!("Unrealized P&L:        ${:.2}", report.unrealized_pnl);
    println!("Fees Paid:             ${:.2}", report.fees_paid);
    println!("-----------------------------------");
    println!("Trading Days:          {}", report.trading_days);
    println!("Orders Executed:       {}", report.orders_executed);
    println!("Orders Vetoed:         {}", report.orders_vetoed);
    println!("Closed Trades:         {}", report.total_trades);
    println!("Win Rate:              {:.2}%", report.win_rate);
    println!("Profit Factor:         {:.2}", report.profit_factor);
    println!("Expectancy:            ${:.2}", report.expectancy);
    println!("-----------------------------------");
    println!("Max Drawdown:          ${:.2} ({:.2}%)", report.max_drawdown_absolute, report.max_drawdown_percentage);
    println!("Max Drawdown Duration: {} days", report.drawdown_duration_days);
    println!("Sharpe Ratio:          {:.3}", report.sharpe_ratio);
    println!("Sortino Ratio:         {:.3}", report.sortino_ratio);
    println!("-----------------------------------");
}
