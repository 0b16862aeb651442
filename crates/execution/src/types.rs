// In crates/execution/src/types.rs

use std::collections::BTreeMap;

use core_types::{Decision, Side};
use ndarray::ArrayView1;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{Error, Result, to_price};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationSettings {
    /// Units held per open position (long or short).
    #[serde(default = "default_position_size")]
    pub position_size: f64,

    /// Fee charged on traded notional (e.g., 0.0004 for 0.04%).
    #[serde(default)]
    pub commission_rate: f64,
}

fn default_position_size() -> f64 { 1.0 }

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            position_size: default_position_size(),
            commission_rate: 0.0,
        }
    }
}

impl SimulationSettings {
    pub fn validate(&self) -> Result<()> {
        if !(self.position_size.is_finite() && self.position_size > 0.0) {
            return Err(Error::InvalidSettings(format!(
                "position_size must be positive, got {}",
                self.position_size
            )));
        }
        if !(0.0..1.0).contains(&self.commission_rate) {
            return Err(Error::InvalidSettings(format!(
                "commission_rate must be in [0, 1), got {}",
                self.commission_rate
            )));
        }
        Ok(())
    }
}

/// Asks for the position of instrument `row` to match `decision`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderRequest {
    pub row: usize,
    pub decision: Decision,
}

/// An open position in one instrument.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Position {
    pub side: Side,
    /// Always positive; the direction lives in `side`.
    pub quantity: Decimal,
    pub entry_price: Decimal,
    pub entry_day: usize,
    pub entry_fee: Decimal,
    /// Most recent tradeable price seen for the instrument.
    pub last_price: Decimal,
}

impl Position {
    /// Signed mark-to-market value at `price`.
    pub fn exposure(&self, price: Decimal) -> Result<Decimal> {
        self.quantity
            .checked_mul(price)
            .map(|v| v * Decimal::from(self.side.sign()))
            .ok_or(Error::Overflow("valuing a position"))
    }

    /// Gross profit of closing at `price`, fees excluded.
    pub fn gross_pnl(&self, price: Decimal) -> Result<Decimal> {
        price
            .checked_sub(self.entry_price)
            .and_then(|diff| diff.checked_mul(self.quantity))
            .map(|v| v * Decimal::from(self.side.sign()))
            .ok_or(Error::Overflow("computing position P&L"))
    }
}

/// A position that an execution closed, and the fee paid to close it.
#[derive(Debug, Clone, PartialEq)]
pub struct Closed {
    pub position: Position,
    pub exit_fee: Decimal,
    /// Realized profit net of the entry and exit fees.
    pub pnl: Decimal,
}

/// The result of a filled order.
#[derive(Debug, Clone, PartialEq)]
pub struct Execution {
    pub row: usize,
    pub day: usize,
    /// The side of the position held after the fill.
    pub side: Side,
    pub price: Decimal,
    /// Units traded, counting both the closing and the opening leg.
    pub quantity: Decimal,
    pub fee: Decimal,
    pub closed: Option<Closed>,
}

/// Represents the state of the simulated trading portfolio.
#[derive(Debug, Clone)]
pub struct Portfolio {
    pub initial_cash: Decimal,
    pub cash: Decimal,
    /// Open positions keyed by `PriceMatrix` row.
    pub positions: BTreeMap<usize, Position>,
}

impl Portfolio {
    /// Creates a new portfolio with an initial cash balance.
    pub fn new(initial_cash: Decimal) -> Self {
        Self {
            initial_cash,
            cash: initial_cash,
            positions: BTreeMap::new(),
        }
    }

    /// Re-marks every open position at `prices` (one day's column) and returns
    /// cash plus their signed value.
    ///
    /// A price that cannot be traded (zero, negative) leaves the position at
    /// its previous mark.
    pub fn mark_to_market(&mut self, prices: ArrayView1<'_, f64>, day: usize) -> Result<Decimal> {
        for (row, position) in self.positions.iter_mut() {
            match to_price(prices[*row], *row, day) {
                Ok(price) => position.last_price = price,
                Err(e) => tracing::debug!(row, day, error = %e, "Keeping previous mark."),
            }
        }
        self.market_value()
    }

    /// Cash plus the signed value of every open position at its last mark.
    pub fn market_value(&self) -> Result<Decimal> {
        self.positions.values().try_fold(self.cash, |value, position| {
            value
                .checked_add(position.exposure(position.last_price)?)
                .ok_or(Error::Overflow("summing portfolio value"))
        })
    }

    /// Profit that would be realised by closing everything at the last marks, fees excluded.
    pub fn unrealized_pnl(&self) -> Result<Decimal> {
        self.positions.values().try_fold(Decimal::ZERO, |pnl, position| {
            pnl.checked_add(position.gross_pnl(position.last_price)?)
                .ok_or(Error::Overflow("summing unrealized P&L"))
        })
    }
}
