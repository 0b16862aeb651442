// In crates/analytics/src/types.rs

use chrono::NaiveDate;
use core_types::{Instrument, Side};
use rust_decimal::Decimal;
use serde::Serialize;

/// A round trip in one instrument, from the fill that opened it to the fill that closed it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClosedTrade {
    pub instrument: Instrument,
    pub side: Side,
    pub entry_day: usize,
    pub exit_day: usize,
    pub entry_price: Decimal,
    pub exit_price: Decimal,
    pub quantity: Decimal,
    /// Net of `fees`.
    pub pnl: Decimal,
    pub fees: Decimal,
}

/// A struct to hold a point in the portfolio's equity curve.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EquityPoint {
    pub day: usize,
    pub date: Option<NaiveDate>,
    pub value: Decimal,
}

/// A report of how a trade matrix performed against its price matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct PerformanceReport {
    // Account
    pub starting_cash: Decimal,
    pub final_cash: Decimal,
    pub final_value: Decimal,
    pub net_pnl_absolute: Decimal,
    pub net_pnl_percentage: f64,
    pub realized_pnl: Decimal,
    pub unrealized_pnl: Decimal,
    pub fees_paid: Decimal,

    // Activity
    pub trading_days: usize,
    pub orders_executed: u32,
    pub orders_vetoed: u32,
    pub total_trades: u32,

    // Trade quality
    pub win_rate: f64,
    pub profit_factor: f64,
    pub expectancy: Decimal,

    // Risk
    pub max_drawdown_absolute: Decimal,
    pub max_drawdown_percentage: f64,
    pub drawdown_duration_days: usize,
    pub sharpe_ratio: f64,
    pub sortino_ratio: f64,
}

impl PerformanceReport {
    /// Creates a new, empty report with zero values.
    pub fn new() -> Self {
        Self::default()
    }
}
