//! Configuration management.

mod settings;

pub use settings::{
    default_universe, AppConfig, AppSettings, ConfigValidationError, DataSettings,
    ExecutionSettingsConfig, LoggingConfig, SessionSettings,
};

use config::{Config, ConfigError, Environment, File};
use std::path::Path;

/// Load configuration from file and environment.
///
/// Environment variables prefixed `TREND` override file values, with `__`
/// separating nested keys (`TREND__STRATEGY__VOLATILITY_THRESHOLD=0.02`).
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let config = Config::builder()
        .add_source(File::from(path).required(true))
        .add_source(
            Environment::with_prefix("TREND")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    config.try_deserialize()
}
