// In crates/strategies/src/ma_crossover.rs

use std::borrow::Cow;

use core_types::Decision;
use ndarray::{ArrayView1, ArrayViewMut1};

use crate::Strategy;
use crate::sma::simple_moving_average;
use crate::types::CrossoverSettings;

/// Fast/slow simple moving-average crossover with next-bar execution.
#[derive(Debug, Clone)]
pub struct MACrossover {
    settings: CrossoverSettings,
}

impl MACrossover {
    /// Creates a new `MACrossover` strategy instance from its settings.
    pub fn new(settings: CrossoverSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &CrossoverSettings {
        &self.settings
    }
}

/// Classifies the transition between two consecutive (fast, slow) observations.
pub fn crossover(prev_fast: f64, prev_slow: f64, fast: f64, slow: f64) -> Decision {
    if fast > slow && prev_fast <= prev_slow {
        // Bullish: fast line just crossed above the slow line.
        Decision::Buy
    } else if fast < slow && prev_fast >= prev_slow {
        // Bearish: fast line just crossed below the slow line.
        Decision::Sell
    } else {
        Decision::Hold
    }
}

impl Strategy for MACrossover {
    fn name(&self) -> &'static str {
        "MACrossover"
    }

    fn assess_row(&self, prices: ArrayView1<'_, f64>, mut decisions: ArrayViewMut1<'_, Decision>) {
        let series = match prices.as_slice() {
            Some(slice) => Cow::Borrowed(slice),
            None => Cow::Owned(prices.to_vec()),
        };
        let fast = simple_moving_average(&series, self.settings.fast_window);
        let slow = simple_moving_average(&series, self.settings.slow_window);

        // A transition seen on `day` is traded on `day + 1`, so the first and
        // last days are never written.
        for day in 1..series.len().saturating_sub(1) {
            let (Some(prev_fast), Some(prev_slow), Some(fast), Some(slow)) =
                (fast[day - 1], slow[day - 1], fast[day], slow[day])
            else {
                continue;
            };
            decisions[day + 1] = crossover(prev_fast, prev_slow, fast, slow);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use core_types::{Instrument, PriceMatrix, TradeMatrix};
    use ndarray::{Array1, Array2};
    use pretty_assertions::assert_eq;

    const RAMP: [f64; 15] = [
        10.0, 10.0, 10.0, 10.0, 10.0, 11.0, 12.0, 13.0, 14.0, 15.0, 14.0, 13.0, 12.0, 11.0, 10.0,
    ];

    fn strategy(fast_window: usize, slow_window: usize) -> MACrossover {
        MACrossover::new(CrossoverSettings { fast_window, slow_window })
    }

    fn matrix(rows: &[&[f64]]) -> PriceMatrix {
        let days = rows.first().map_or(0, |r| r.len());
        let instruments = (0..rows.len()).map(|i| Instrument(format!("T{i:03}"))).collect();
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let dates = start.iter_days().take(days).collect();
        let flat: Vec<f64> = rows.iter().flat_map(|r| r.iter().copied()).collect();
        let values = Array2::from_shape_vec((rows.len(), days), flat).unwrap();
        PriceMatrix::new(instruments, dates, values).unwrap()
    }

    fn decisions(strategy: &MACrossover, prices: &[f64]) -> Vec<Decision> {
        let prices = Array1::from(prices.to_vec());
        let mut out = Array1::from_elem(prices.len(), Decision::Hold);
        strategy.assess_row(prices.view(), out.view_mut());
        out.to_vec()
    }

    #[test]
    fn crossover_rules() {
        assert_eq!(crossover(1.0, 1.0, 2.0, 1.0), Decision::Buy);
        assert_eq!(crossover(1.0, 2.0, 2.0, 1.0), Decision::Buy);
        assert_eq!(crossover(1.0, 1.0, 1.0, 2.0), Decision::Sell);
        assert_eq!(crossover(2.0, 1.0, 1.0, 2.0), Decision::Sell);
        assert_eq!(crossover(2.0, 1.0, 3.0, 1.0), Decision::Hold);
        assert_eq!(crossover(1.0, 1.0, 1.0, 1.0), Decision::Hold);
    }

    #[test]
    fn ramp_up_then_down_buys_once_and_sells_once() {
        let row = decisions(&strategy(2, 4), &RAMP);

        let mut expected = vec![Decision::Hold; RAMP.len()];
        // fast crosses above slow on day 5, below on day 11; both traded a day later.
        expected[6] = Decision::Buy;
        expected[12] = Decision::Sell;
        assert_eq!(row, expected);
    }

    #[test]
    fn flat_prices_never_trade() {
        let row = decisions(&strategy(2, 4), &[42.0; 30]);
        assert!(row.iter().all(|d| *d == Decision::Hold));
    }

    #[test]
    fn history_shorter_than_the_slow_window_is_all_hold() {
        let row = decisions(&strategy(2, 20), &RAMP);
        assert!(row.iter().all(|d| *d == Decision::Hold));
    }

    #[test]
    fn mirrored_prices_mirror_the_signals() {
        let mirrored: Vec<f64> = RAMP.iter().map(|p| 30.0 - p).collect();
        let up = decisions(&strategy(2, 4), &RAMP);
        let down = decisions(&strategy(2, 4), &mirrored);

        let flipped: Vec<Decision> = up
            .iter()
            .map(|d| match d {
                Decision::Buy => Decision::Sell,
                Decision::Sell => Decision::Buy,
                Decision::Hold => Decision::Hold,
            })
            .collect();
        assert_eq!(down, flipped);
    }

    #[test]
    fn first_and_last_days_stay_hold() {
        // Crossover on the second-to-last day would be traded past the end.
        let prices = [5.0, 5.0, 5.0, 5.0, 5.0, 5.0, 9.0];
        let row = decisions(&strategy(1, 3), &prices);
        assert_eq!(row.first(), Some(&Decision::Hold));
        assert_eq!(row.last(), Some(&Decision::Hold));
        assert!(row.iter().all(|d| *d == Decision::Hold));
    }

    #[test]
    fn matrix_output_matches_shape_and_is_deterministic() {
        let falling: Vec<f64> = RAMP.iter().rev().copied().collect();
        let zigzag: Vec<f64> = (0..15).map(|i| if (i / 3) % 2 == 0 { 10.0 + i as f64 } else { 30.0 - i as f64 }).collect();
        let flat = [7.0; 15];
        let prices = matrix(&[&RAMP[..], &falling[..], &zigzag[..], &flat[..]]);
        let strategy = strategy(2, 4);

        let first = strategy.compute_signals(&prices);
        let second = strategy.compute_signals(&prices);
        assert_eq!(first.shape(), prices.shape());
        assert_eq!(first, second);

        // The parallel pass must equal an independent per-row pass.
        for row in 0..prices.num_instruments() {
            let expected = decisions(&strategy, &prices.row(row).to_vec());
            assert_eq!(first.row(row).to_vec(), expected);
        }
        assert_eq!(first.row(3).to_vec(), vec![Decision::Hold; 15]);
    }

    #[test]
    fn empty_matrix_yields_empty_trades() {
        let prices = matrix(&[]);
        let trades: TradeMatrix = strategy(2, 4).compute_signals(&prices);
        assert_eq!(trades.shape(), (0, 0));
    }
}
