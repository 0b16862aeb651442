use crate::types::{ClosedTrade, EquityPoint, PerformanceReport};
use rust_decimal::Decimal;
use rust_decimal::prelude::*;
use rust_decimal_macros::dec;

/// The engine responsible for calculating performance metrics from trade data.
#[derive(Default)]
pub struct AnalyticsEngine;

impl AnalyticsEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Calculates the trade and equity metrics of a report.
    ///
    /// Account fields that only the simulation knows (cash, fees, order counts,
    /// unrealized P&L) are left for the caller to fill in.
    pub fn calculate(
        &self,
        initial_capital: Decimal,
        trades: &[ClosedTrade],
        equity_curve: &[EquityPoint],
    ) -> PerformanceReport {
        let mut report = PerformanceReport::new();
        report.starting_cash = initial_capital;
        report.trading_days = equity_curve.len();

        // --- Account ---
        report.final_value = equity_curve.last().map_or(initial_capital, |p| p.value);
        report.net_pnl_absolute = report.final_value - initial_capital;
        if initial_capital > dec!(0) {
            report.net_pnl_percentage = report
                .net_pnl_absolute
                .checked_div(initial_capital)
                .and_then(|r| r.to_f64())
                .unwrap_or(0.0) * 100.0;
        }
        report.realized_pnl = trades.iter().map(|t| t.pnl).sum();

        // --- Trade quality ---
        report.total_trades = trades.len() as u32;
        if !trades.is_empty() {
            let wins = trades.iter().filter(|t| t.pnl > dec!(0)).count();
            report.win_rate = (wins as f64 / trades.len() as f64) * 100.0;

            let gross_profit: Decimal = trades.iter().filter(|t| t.pnl > dec!(0)).map(|t| t.pnl).sum();
            let gross_loss: Decimal = trades.iter().filter(|t| t.pnl < dec!(0)).map(|t| t.pnl).sum::<Decimal>().abs();
            report.profit_factor = if gross_loss > dec!(0) {
                gross_profit.checked_div(gross_loss).and_then(|r| r.to_f64()).unwrap_or(0.0)
            } else if gross_profit > dec!(0) {
                f64::INFINITY // Pure profit
            } else {
                0.0
            };

            report.expectancy = report.realized_pnl / Decimal::from(trades.len());
        }

        // --- Risk ---
        let (max_drawdown, peak_at_max, duration) = drawdown(initial_capital, equity_curve);
        report.max_drawdown_absolute = max_drawdown;
        if peak_at_max > dec!(0) {
            report.max_drawdown_percentage =
                max_drawdown.checked_div(peak_at_max).and_then(|r| r.to_f64()).unwrap_or(0.0) * 100.0;
        }
        report.drawdown_duration_days = duration;

        let returns = daily_returns(equity_curve);
        if !returns.is_empty() {
            let mean_return = returns.iter().sum::<f64>() / returns.len() as f64;
            let variance = returns.iter().map(|r| (r - mean_return).powi(2)).sum::<f64>() / returns.len() as f64;
            let std_dev = variance.sqrt();
            // Periodic (daily) ratio; not annualized.
            report.sharpe_ratio = if std_dev > 0.0 { mean_return / std_dev } else { 0.0 };

            let negative: Vec<f64> = returns.iter().copied().filter(|r| *r < 0.0).collect();
            let downside_deviation = if negative.is_empty() {
                0.0
            } else {
                (negative.iter().map(|r| r.powi(2)).sum::<f64>() / negative.len() as f64).sqrt()
            };
            report.sortino_ratio = if downside_deviation > 0.0 {
                mean_return / downside_deviation
            } else if mean_return > 0.0 {
                f64::INFINITY // No downside risk
            } else {
                0.0
            };
        }

        report
    }
}

/// Simple returns between consecutive equity points. Steps from a
/// non-positive value have no meaningful return and are skipped.
fn daily_returns(equity_curve: &[EquityPoint]) -> Vec<f64> {
    equity_curve
        .windows(2)
        .filter(|w| w[0].value > dec!(0))
        .map(|w| {
            w[1].value
                .checked_div(w[0].value)
                .and_then(|r| (r - dec!(1)).to_f64())
                .unwrap_or(0.0)
        })
        .collect()
}

/// Returns (largest peak-to-trough drop, the peak it was measured from,
/// longest number of days spent below a prior peak).
fn drawdown(initial_capital: Decimal, equity_curve: &[EquityPoint]) -> (Decimal, Decimal, usize) {
    let mut peak = initial_capital;
    let mut max_drawdown = dec!(0);
    let mut peak_at_max = initial_capital;
    let mut underwater_since: Option<usize> = None;
    let mut longest = 0;

    for point in equity_curve {
        if point.value >= peak {
            if let Some(start) = underwater_since.take() {
                longest = longest.max(point.day - start);
            }
            peak = point.value;
        } else {
            underwater_since.get_or_insert(point.day);
            let drop = peak - point.value;
            if drop > max_drawdown {
                max_drawdown = drop;
                peak_at_max = peak;
            }
        }
    }
    if let (Some(start), Some(last)) = (underwater_since, equity_curve.last()) {
        longest = longest.max(last.day + 1 - start);
    }

    (max_drawdown, peak_at_max, longest)
}
