// In crates/core-types/src/types.rs

use std::fmt;

use chrono::NaiveDate;
use ndarray::{Array2, ArrayView1, ArrayView2};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// An instrument identifier (ticker symbol).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Instrument(pub String);

impl fmt::Display for Instrument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Instrument {
    fn from(value: &str) -> Self {
        Instrument(value.to_string())
    }
}

/// A per-instrument, per-day trade decision.
///
/// The discriminants are the values written to the persisted trade grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(i8)]
pub enum Decision {
    /// Enter or flip short.
    Sell = -1,
    /// Keep whatever position is currently held.
    #[default]
    Hold = 0,
    /// Enter or flip long.
    Buy = 1,
}

impl Decision {
    pub fn value(self) -> i8 {
        self as i8
    }

    pub fn as_f64(self) -> f64 {
        f64::from(self.value())
    }
}

impl TryFrom<i8> for Decision {
    type Error = Error;

    fn try_from(value: i8) -> Result<Self> {
        match value {
            -1 => Ok(Decision::Sell),
            0 => Ok(Decision::Hold),
            1 => Ok(Decision::Buy),
            other => Err(Error::malformed(format!("{other} is not a trade decision"))),
        }
    }
}

impl TryFrom<f64> for Decision {
    type Error = Error;

    fn try_from(value: f64) -> Result<Self> {
        if value == -1.0 {
            Ok(Decision::Sell)
        } else if value == 0.0 {
            Ok(Decision::Hold)
        } else if value == 1.0 {
            Ok(Decision::Buy)
        } else {
            Err(Error::malformed(format!("{value} is not a trade decision")))
        }
    }
}

/// The direction of an open position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Long,
    Short,
}

impl Side {
    /// +1 for long, -1 for short.
    pub fn sign(self) -> i8 {
        match self {
            Side::Long => 1,
            Side::Short => -1,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Long => f.write_str("LONG"),
            Side::Short => f.write_str("SHORT"),
        }
    }
}

impl Decision {
    /// The position a decision asks for; `Hold` asks for no change.
    pub fn target_side(self) -> Option<Side> {
        match self {
            Decision::Buy => Some(Side::Long),
            Decision::Sell => Some(Side::Short),
            Decision::Hold => None,
        }
    }
}

/// A rectangular (instrument x day) grid of prices for a single price field.
///
/// Rows are ordered by instrument identifier, columns by ascending date.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceMatrix {
    instruments: Vec<Instrument>,
    dates: Vec<NaiveDate>,
    values: Array2<f64>,
}

impl PriceMatrix {
    /// Builds a matrix, checking that the labels agree with the grid's shape
    /// and that both axes are strictly ordered.
    pub fn new(instruments: Vec<Instrument>, dates: Vec<NaiveDate>, values: Array2<f64>) -> Result<Self> {
        let (rows, cols) = values.dim();
        if instruments.len() != rows {
            return Err(Error::shape(format!(
                "{} instrument labels for {} price rows",
                instruments.len(),
                rows
            )));
        }
        if dates.len() != cols {
            return Err(Error::shape(format!("{} dates for {} price columns", dates.len(), cols)));
        }
        if instruments.windows(2).any(|w| w[0] >= w[1]) {
            return Err(Error::malformed("instruments must be unique and sorted ascending"));
        }
        if dates.windows(2).any(|w| w[0] >= w[1]) {
            return Err(Error::malformed("dates must be unique and sorted ascending"));
        }
        Ok(Self { instruments, dates, values })
    }

    pub fn num_instruments(&self) -> usize {
        self.values.nrows()
    }

    pub fn num_days(&self) -> usize {
        self.values.ncols()
    }

    pub fn shape(&self) -> (usize, usize) {
        self.values.dim()
    }

    /// The row-index to instrument lookup.
    pub fn instruments(&self) -> &[Instrument] {
        &self.instruments
    }

    pub fn instrument(&self, row: usize) -> Option<&Instrument> {
        self.instruments.get(row)
    }

    pub fn row_of(&self, instrument: &Instrument) -> Option<usize> {
        self.instruments.binary_search(instrument).ok()
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn row(&self, row: usize) -> ArrayView1<'_, f64> {
        self.values.row(row)
    }

    pub fn column(&self, day: usize) -> ArrayView1<'_, f64> {
        self.values.column(day)
    }

    pub fn values(&self) -> ArrayView2<'_, f64> {
        self.values.view()
    }
}

/// A grid of decisions with the same shape as the `PriceMatrix` it was computed from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TradeMatrix {
    grid: Array2<Decision>,
}

impl TradeMatrix {
    /// A matrix where every cell is `Hold`.
    pub fn hold(shape: (usize, usize)) -> Self {
        Self { grid: Array2::from_elem(shape, Decision::Hold) }
    }

    pub fn from_grid(grid: Array2<Decision>) -> Self {
        Self { grid }
    }

    pub fn shape(&self) -> (usize, usize) {
        self.grid.dim()
    }

    pub fn get(&self, row: usize, day: usize) -> Option<Decision> {
        self.grid.get((row, day)).copied()
    }

    pub fn row(&self, row: usize) -> ArrayView1<'_, Decision> {
        self.grid.row(row)
    }

    pub fn column(&self, day: usize) -> ArrayView1<'_, Decision> {
        self.grid.column(day)
    }

    pub fn grid(&self) -> ArrayView2<'_, Decision> {
        self.grid.view()
    }

    pub fn count(&self, decision: Decision) -> usize {
        self.grid.iter().filter(|d| **d == decision).count()
    }

    /// The `{-1, 0, 1}` numeric form used for persistence.
    pub fn to_numeric(&self) -> Array2<f64> {
        self.grid.mapv(Decision::as_f64)
    }

    pub fn from_numeric(values: &Array2<f64>) -> Result<Self> {
        let mut grid = Array2::from_elem(values.dim(), Decision::Hold);
        for ((row, day), value) in values.indexed_iter() {
            grid[(row, day)] = Decision::try_from(*value).map_err(|_| {
                Error::malformed(format!("cell ({row}, {day}) holds {value}, expected -1, 0 or 1"))
            })?;
        }
        Ok(Self { grid })
    }
}

/// Non-fatal: the instrument has fewer days than the slow window, so its
/// trade row stays all `Hold`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsufficientHistory {
    pub instrument: Instrument,
    pub days: usize,
    pub slow_window: usize,
}

impl fmt::Display for InsufficientHistory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} has {} days of history, fewer than the slow window of {}",
            self.instrument, self.days, self.slow_window
        )
    }
}
