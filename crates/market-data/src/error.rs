// In crates/market-data/src/error.rs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to open price file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Data(#[from] core_types::Error),

    #[error("Unknown price field '{0}'")]
    UnknownField(String),
}

pub type Result<T> = std::result::Result<T, Error>;
