// In crates/market-data/src/lib.rs

pub mod error;
pub mod price_table;
pub mod types;

// Re-export public types
pub use error::{Error, Result};
pub use price_table::PriceTable;
pub use types::PriceField;
