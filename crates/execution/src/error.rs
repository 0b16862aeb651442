// In crates/execution/src/error.rs

use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum Error {
    #[error("Order for row {row} needs {required} in cash but only {available} is available")]
    InsufficientCash {
        row: usize,
        required: Decimal,
        available: Decimal,
    },

    #[error("Price {price} for row {row} on day {day} cannot be traded")]
    InvalidPrice { row: usize, day: usize, price: f64 },

    #[error("Decimal overflow while {0}")]
    Overflow(&'static str),

    #[error("Invalid simulation settings: {0}")]
    InvalidSettings(String),
}

pub type Result<T> = std::result::Result<T, Error>;
