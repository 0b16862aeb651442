// In crates/strategies/src/sma.rs

/// Trailing simple moving average computed with a running sum.
///
/// `out[d]` is the mean of `values[d + 1 - window..=d]` and is `None` for
/// `d < window - 1`. A zero window yields no values at all.
pub fn simple_moving_average(values: &[f64], window: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    if window == 0 || values.len() < window {
        return out;
    }

    let mut sum: f64 = values[..window - 1].iter().sum();
    for day in window - 1..values.len() {
        sum += values[day];
        out[day] = Some(sum / window as f64);
        sum -= values[day + 1 - window];
    }
    out
}
