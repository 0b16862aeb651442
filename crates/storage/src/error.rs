// In crates/storage/src/error.rs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to write trades: {0}")]
    Write(#[from] ndarray_npy::WriteNpyError),

    #[error("Failed to read trades: {0}")]
    Read(#[from] ndarray_npy::ReadNpyError),

    #[error("Failed to prepare output directory: {0}")]
    Io(#[from] std::io::Error),

    #[error("Trade file is corrupt: {0}")]
    Corrupt(#[from] core_types::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
