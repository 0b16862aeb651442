// In crates/app-config/src/lib.rs

use std::path::Path;

use config::{Config, ConfigBuilder, Environment, File, builder::DefaultState};

pub mod error;
pub mod types;

// Re-export the most important types for easy access.
pub use error::{Error, Result};
pub use types::{AppSettings, DataSettings, EvaluationSettings, Settings};

/// Directory searched for `base.toml` and the environment-specific file.
pub const CONFIG_DIR: &str = "config";

/// Loads the application settings from various sources.
///
/// Layers, lowest priority first:
/// 1. Built-in defaults.
/// 2. `config/base.toml`, if present.
/// 3. The environment-specific file (e.g., `config/development.toml`), if present.
/// 4. Environment variables (e.g., `APP__STRATEGY__FAST_WINDOW=10`).
pub fn load_settings() -> Result<Settings> {
    // Get the current environment. Default to "development" if not set.
    let environment = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "development".into());

    load_settings_from(
        Path::new(CONFIG_DIR),
        &environment,
        Environment::with_prefix("APP").separator("__"),
    )
}

/// Same as [`load_settings`] with an explicit config directory, environment
/// name and variable source.
pub fn load_settings_from(config_dir: &Path, environment: &str, env: Environment) -> Result<Settings> {
    let settings = defaults()?
        .add_source(File::from(config_dir.join("base")).required(false))
        .add_source(File::from(config_dir.join(environment)).required(false))
        .add_source(env)
        .build()?;

    // Deserialize the configuration into our `Settings` struct.
    let settings: Settings = settings.try_deserialize()?;

    Ok(settings)
}

fn defaults() -> Result<ConfigBuilder<DefaultState>> {
    let builder = Config::builder()
        .set_default("app.log_level", "info")?
        .set_default("data.price_field", "Open")?
        .set_default("data.output_path", storage::DEFAULT_TRADES_FILE)?
        .set_default("strategy.fast_window", 5_i64)?
        .set_default("strategy.slow_window", 40_i64)?
        .set_default("evaluation.starting_cash", 25_000.0)?
        .set_default("evaluation.position_size", 1.0)?
        .set_default("evaluation.commission_rate", 0.0)?
        .set_default("evaluation.verbose", true)?;
    Ok(builder)
}
