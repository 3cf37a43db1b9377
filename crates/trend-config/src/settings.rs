//! Configuration structures.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use trend_core::error::{ParamsError, UniverseError};
use trend_core::types::{AssetClass, InstrumentDescriptor, StrategyParams, TradingMode, Universe};

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub app: AppSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub session: SessionSettings,
    #[serde(default)]
    pub strategy: StrategyParams,
    #[serde(default)]
    pub execution: ExecutionSettingsConfig,
    #[serde(default)]
    pub data: DataSettings,
    #[serde(default = "default_universe")]
    pub universe: Vec<InstrumentDescriptor>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            app: AppSettings::default(),
            logging: LoggingConfig::default(),
            session: SessionSettings::default(),
            strategy: StrategyParams::default(),
            execution: ExecutionSettingsConfig::default(),
            data: DataSettings::default(),
            universe: default_universe(),
        }
    }
}

/// Configuration that loaded but cannot be run.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigValidationError {
    #[error("Invalid universe: {0}")]
    Universe(#[from] UniverseError),

    #[error("Invalid strategy parameters: {0}")]
    Strategy(#[from] ParamsError),

    #[error("execution.max_concurrency must be greater than 0")]
    ZeroConcurrency,

    #[error("execution.request_timeout_secs must be greater than 0")]
    ZeroTimeout,

    #[error("Unknown log format {0:?} (expected \"pretty\" or \"json\")")]
    LogFormat(String),
}

impl AppConfig {
    /// Check everything a cycle relies on.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        self.universe()?;
        self.strategy.validate()?;

        if self.execution.max_concurrency == 0 {
            return Err(ConfigValidationError::ZeroConcurrency);
        }
        if self.execution.request_timeout_secs == Some(0) {
            return Err(ConfigValidationError::ZeroTimeout);
        }
        if !matches!(self.logging.format.as_str(), "pretty" | "json") {
            return Err(ConfigValidationError::LogFormat(self.logging.format.clone()));
        }

        Ok(())
    }

    /// The configured instruments as a validated universe.
    pub fn universe(&self) -> Result<Universe, UniverseError> {
        Universe::new(self.universe.clone())
    }

    /// Render back to TOML.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

/// General app settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    pub name: String,
    pub environment: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            name: "futures-trend".to_string(),
            environment: "development".to_string(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
    pub file: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            file: None,
        }
    }
}

impl LoggingConfig {
    pub fn is_json(&self) -> bool {
        self.format == "json"
    }
}

/// Venue session settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    pub mode: TradingMode,
    /// Venue label reported on sessions
    pub venue: String,
    /// JSON-lines record of paper orders, kept across runs
    pub journal: Option<String>,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            mode: TradingMode::Paper,
            venue: "paper".to_string(),
            journal: None,
        }
    }
}

/// Cycle execution settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutionSettingsConfig {
    pub max_concurrency: usize,
    pub request_timeout_secs: Option<u64>,
    pub dry_run: bool,
}

impl Default for ExecutionSettingsConfig {
    fn default() -> Self {
        Self {
            max_concurrency: 4,
            request_timeout_secs: None,
            dry_run: false,
        }
    }
}

/// Market data location.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataSettings {
    pub directory: String,
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            directory: "data".to_string(),
        }
    }
}

/// Diversified basket of liquid US futures.
pub fn default_universe() -> Vec<InstrumentDescriptor> {
    use AssetClass::*;

    [
        ("ZC", "CBOT", Grains),
        ("ZW", "CBOT", Grains),
        ("ZS", "CBOT", Grains),
        ("ZM", "CBOT", Grains),
        ("ZL", "CBOT", Grains),
        ("LE", "CME", Livestock),
        ("CL", "NYMEX", Energy),
        ("HO", "NYMEX", Energy),
        ("RB", "NYMEX", Energy),
        ("NG", "NYMEX", Energy),
        ("GC", "COMEX", Metals),
        ("SI", "COMEX", Metals),
        ("HG", "COMEX", Metals),
        ("SB", "NYBOT", Softs),
        ("KC", "NYBOT", Softs),
        ("CT", "NYBOT", Softs),
        ("ZF", "CBOT", Rates),
        ("ZN", "CBOT", Rates),
        ("ZB", "CBOT", Rates),
        ("AUD", "CME", Currencies),
        ("GBP", "CME", Currencies),
        ("CAD", "CME", Currencies),
        ("EUR", "CME", Currencies),
        ("CHF", "CME", Currencies),
        ("JPY", "CME", Currencies),
    ]
    .into_iter()
    .map(|(symbol, exchange, category)| InstrumentDescriptor::new(symbol, exchange, "USD", category))
    .collect()
}
