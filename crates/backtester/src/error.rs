// In crates/backtester/src/error.rs

use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Data(#[from] core_types::Error),

    #[error(transparent)]
    Execution(#[from] execution::Error),

    #[error("Starting cash must not be negative, got {0}")]
    InvalidStartingCash(Decimal),
}

pub type Result<T> = std::result::Result<T, Error>;
