// In crates/strategies/src/types.rs

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct CrossoverSettings {
    /// Window of the fast simple moving average, in days.
    #[serde(default = "default_fast_window")]
    pub fast_window: usize,
    /// Window of the slow simple moving average, in days.
    #[serde(default = "default_slow_window")]
    pub slow_window: usize,
}

fn default_fast_window() -> usize { 5 }
fn default_slow_window() -> usize { 40 }

impl Default for CrossoverSettings {
    fn default() -> Self {
        Self {
            fast_window: default_fast_window(),
            slow_window: default_slow_window(),
        }
    }
}

impl CrossoverSettings {
    /// Zero-length windows are rejected. A fast window that is not shorter
    /// than the slow one is allowed but produces an inverted strategy.
    pub fn validate(&self) -> Result<()> {
        if self.fast_window == 0 || self.slow_window == 0 {
            return Err(Error::InvalidParameters(format!(
                "moving-average windows must be positive (fast = {}, slow = {})",
                self.fast_window, self.slow_window
            )));
        }
        if self.fast_window >= self.slow_window {
            tracing::warn!(
                fast_window = self.fast_window,
                slow_window = self.slow_window,
                "Fast window is not shorter than the slow window; crossover semantics are inverted."
            );
        }
        Ok(())
    }
}
