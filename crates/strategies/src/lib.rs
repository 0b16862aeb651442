// In crates/strategies/src/lib.rs

use core_types::{Decision, InsufficientHistory, PriceMatrix, TradeMatrix};
use ndarray::{Array2, ArrayView1, ArrayViewMut1, Zip};

pub mod error;
pub mod ma_crossover;
pub mod sma;
pub mod types;

pub use error::{Error, Result};
pub use ma_crossover::MACrossover;
pub use types::CrossoverSettings;

/// The universal interface for a signal-generating strategy.
///
/// A strategy looks at one instrument's price history at a time and fills that
/// instrument's decision row. Rows never see each other, which is what lets
/// `compute_signals` hand each row to its own rayon task.
pub trait Strategy: Sync {
    /// The name of the strategy.
    fn name(&self) -> &'static str;

    /// Fills `decisions` (pre-set to `Hold`) from one instrument's `prices`.
    fn assess_row(&self, prices: ArrayView1<'_, f64>, decisions: ArrayViewMut1<'_, Decision>);

    /// Runs `assess_row` over every instrument in parallel and gathers the
    /// rows into a `TradeMatrix` of the same shape as `prices`.
    fn compute_signals(&self, prices: &PriceMatrix) -> TradeMatrix {
        let mut grid = Array2::from_elem(prices.shape(), Decision::Hold);
        Zip::from(grid.rows_mut())
            .and(prices.values().rows())
            .par_for_each(|decisions, row| self.assess_row(row, decisions));
        TradeMatrix::from_grid(grid)
    }
}

/// Computes crossover signals for every instrument.
///
/// `fast_window < slow_window` is expected but not enforced.
pub fn compute_signals(prices: &PriceMatrix, fast_window: usize, slow_window: usize) -> TradeMatrix {
    MACrossover::new(CrossoverSettings { fast_window, slow_window }).compute_signals(prices)
}

/// Instruments whose history is too short for the slow window to ever fill.
pub fn history_warnings(prices: &PriceMatrix, slow_window: usize) -> Vec<InsufficientHistory> {
    let days = prices.num_days();
    if days >= slow_window {
        return Vec::new();
    }
    prices
        .instruments()
        .iter()
        .map(|instrument| InsufficientHistory {
            instrument: instrument.clone(),
            days,
            slow_window,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn prices(days: usize) -> PriceMatrix {
        let start = NaiveDate::from_ymd_opt(2023, 6, 1).unwrap();
        PriceMatrix::new(
            vec!["AAA".into(), "BBB".into()],
            start.iter_days().take(days).collect(),
            Array2::from_elem((2, days), 1.0),
        )
        .unwrap()
    }

    #[test]
    fn short_history_is_reported_per_instrument() {
        let warnings = history_warnings(&prices(10), 40);
        assert_eq!(warnings.len(), 2);
        assert_eq!(warnings[1].instrument, core_types::Instrument::from("BBB"));
        assert_eq!(warnings[0].days, 10);
        assert!(history_warnings(&prices(40), 40).is_empty());
    }

    #[test]
    fn free_function_uses_the_given_windows() {
        let trades = compute_signals(&prices(50), 5, 40);
        assert_eq!(trades.shape(), (2, 50));
        assert_eq!(trades.count(Decision::Hold), 100);
    }
}
