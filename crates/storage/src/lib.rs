// In crates/storage/src/lib.rs

use std::path::Path;

use core_types::TradeMatrix;
use ndarray::Array2;
use ndarray_npy::{read_npy, write_npy};

pub mod error;

pub use error::{Error, Result};

/// Conventional name of the persisted trade grid.
pub const DEFAULT_TRADES_FILE: &str = "trades.npy";

/// Writes the trade grid as a `(instruments, days)` float64 `.npy` array of `-1`, `0` and `1`.
pub fn save_trades(path: impl AsRef<Path>, trades: &TradeMatrix) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    write_npy(path, &trades.to_numeric())?;

    let (instruments, days) = trades.shape();
    tracing::info!(path = %path.display(), instruments, days, "Trades saved.");
    Ok(())
}

/// Reads a grid written by `save_trades`.
pub fn load_trades(path: impl AsRef<Path>) -> Result<TradeMatrix> {
    let values: Array2<f64> = read_npy(path.as_ref())?;
    Ok(TradeMatrix::from_numeric(&values)?)
}
