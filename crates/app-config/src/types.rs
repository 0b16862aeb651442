// In crates/app-config/src/types.rs

use std::path::PathBuf;

use execution::SimulationSettings;
use market_data::PriceField;
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use serde::Deserialize;
use strategies::CrossoverSettings;

use crate::{Error, Result};

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Settings {
    /// The application's general settings.
    pub app: AppSettings,
    /// Where prices come from and where trades go.
    pub data: DataSettings,
    /// Moving-average windows for the crossover rule.
    pub strategy: CrossoverSettings,
    /// Cash/position model used to score the trades.
    pub evaluation: EvaluationSettings,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct AppSettings {
    /// The log level for the application.
    pub log_level: String,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct DataSettings {
    pub price_field: PriceField,
    pub output_path: PathBuf,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct EvaluationSettings {
    pub starting_cash: f64,
    pub position_size: f64,
    pub commission_rate: f64,
    /// Print the performance report to stdout.
    pub verbose: bool,
}

impl EvaluationSettings {
    pub fn simulation(&self) -> SimulationSettings {
        SimulationSettings {
            position_size: self.position_size,
            commission_rate: self.commission_rate,
        }
    }

    pub fn starting_cash(&self) -> Result<Decimal> {
        Decimal::from_f64(self.starting_cash)
            .filter(|cash| !cash.is_sign_negative())
            .ok_or_else(|| Error::InvalidValue {
                key: "evaluation.starting_cash",
                reason: format!("{} is not a non-negative amount", self.starting_cash),
            })
    }
}
