// In crates/execution/src/lib.rs

use rust_decimal::Decimal;

pub mod error;
pub mod simulated;
pub mod types;

// Re-export public types
pub use error::{Error, Result};
pub use simulated::SimulatedExecutor;
pub use types::{Closed, Execution, OrderRequest, Portfolio, Position, SimulationSettings};

/// The universal interface for an execution handler.
///
/// An `Executor` takes a position-target `OrderRequest` and moves the
/// portfolio toward that target at the given price.
pub trait Executor {
    /// The name of the executor.
    fn name(&self) -> &'static str;

    /// Executes a given order request.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(Execution))`: the portfolio changed.
    /// * `Ok(None)`: the order asked for the position already held (or for `Hold`).
    /// * `Err(_)`: the order was rejected and the portfolio is untouched.
    fn execute(
        &mut self,
        order: &OrderRequest,
        current_price: f64,
        day: usize,
        portfolio: &mut Portfolio,
    ) -> Result<Option<Execution>>;
}

/// Converts a matrix price into a tradeable decimal price.
pub fn to_price(price: f64, row: usize, day: usize) -> Result<Decimal> {
    use rust_decimal::prelude::FromPrimitive;

    Decimal::from_f64(price)
        .filter(|p| *p > Decimal::ZERO)
        .ok_or(Error::InvalidPrice { row, day, price })
}
