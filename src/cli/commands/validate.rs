//! Validate configuration command.

use anyhow::Result;
use config::ConfigError;
use std::path::Path;
use trend_config::AppConfig;

pub async fn run(
    config_path: &Path,
    loaded: Result<AppConfig, ConfigError>,
    show: bool,
) -> Result<()> {
    println!("Validating configuration: {:?}", config_path);

    let config = match loaded {
        Ok(config) => config,
        Err(e) => {
            println!("Configuration error: {}", e);
            return Err(e.into());
        }
    };

    if let Err(e) = config.validate() {
        println!("Configuration error: {}", e);
        return Err(e.into());
    }

    let strategy = &config.strategy;
    println!("Configuration is valid!");
    println!();
    println!("App: {}", config.app.name);
    println!("Environment: {}", config.app.environment);
    println!("Log level: {}", config.logging.level);
    println!("Session: {} via {}", config.session.mode, config.session.venue);
    println!("Lookback: {} of {} bars", strategy.lookback, strategy.bar_size);
    println!(
        "Windows: volatility {} returns, moving average {} closes ({} bars needed)",
        strategy.volatility_window,
        strategy.ma_window,
        strategy.required_bars()
    );
    println!("Volatility threshold: {}", strategy.volatility_threshold);
    println!("Rebalance day: {}", strategy.rebalance_day);
    println!("Order quantity: {}", strategy.order_quantity);
    println!("Max concurrency: {}", config.execution.max_concurrency);
    println!("Data directory: {}", config.data.directory);
    println!("Instruments: {}", config.universe.len());

    if show {
        println!();
        println!("{}", config.to_toml()?);
    }

    Ok(())
}
