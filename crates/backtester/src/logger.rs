// In crates/backtester/src/logger.rs

use analytics::types::{ClosedTrade, EquityPoint};
use chrono::NaiveDate;
use core_types::Instrument;
use execution::{Closed, Execution};
use rust_decimal::Decimal;

/// A logger responsible for recording trades and equity changes during an evaluation.
#[derive(Debug, Default)]
pub struct TradeLogger {
    pub trades: Vec<ClosedTrade>,
    pub equity_curve: Vec<EquityPoint>,
}

impl TradeLogger {
    /// Creates a new, empty logger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a point in the equity curve.
    pub fn record_equity(&mut self, day: usize, date: Option<NaiveDate>, value: Decimal) {
        self.equity_curve.push(EquityPoint { day, date, value });
    }

    /// Records a completed round trip by combining the closed position and the execution that closed it.
    pub fn record_trade(&mut self, instrument: Instrument, closed: &Closed, close_exec: &Execution) {
        let position = &closed.position;
        let fees = position.entry_fee + closed.exit_fee;

        self.trades.push(ClosedTrade {
            instrument,
            side: position.side,
            entry_day: position.entry_day,
            exit_day: close_exec.day,
            entry_price: position.entry_price,
            exit_price: close_exec.price,
            quantity: position.quantity,
            pnl: closed.pnl,
            fees,
        });
    }
}
