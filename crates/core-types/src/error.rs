// In crates/core-types/src/error.rs

use thiserror::Error;

/// Structural failures of the input data. Both abort the whole run.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Malformed input: {reason}")]
    MalformedInput { reason: String },

    #[error("Shape mismatch: {reason}")]
    ShapeMismatch { reason: String },
}

impl Error {
    pub fn malformed(reason: impl Into<String>) -> Self {
        Error::MalformedInput { reason: reason.into() }
    }

    pub fn shape(reason: impl Into<String>) -> Self {
        Error::ShapeMismatch { reason: reason.into() }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
