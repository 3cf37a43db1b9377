//! CLI command implementations.

pub mod run;
pub mod signals;
pub mod universe;
pub mod validate;

use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use trend_broker::PaperVenue;
use trend_config::AppConfig;
use trend_data::CsvMarketData;
use trend_engine::{ExecutionCoordinator, ExecutionSettings};

/// Wire the CSV data source and paper venue into a coordinator.
pub fn build_coordinator(
    config: &AppConfig,
    data_dir: Option<&Path>,
    dry_run: bool,
) -> Result<ExecutionCoordinator> {
    config.validate().context("Invalid configuration")?;
    let universe = config.universe()?;

    let directory = data_dir
        .map(Path::to_path_buf)
        .unwrap_or_else(|| config.data.directory.clone().into());
    let data = Arc::new(CsvMarketData::new(directory));

    let mut venue = PaperVenue::new(config.session.venue.clone());
    if let Some(journal) = &config.session.journal {
        venue = venue
            .with_journal(journal)
            .with_context(|| format!("Failed to open order journal {}", journal))?;
    }
    let venue = Arc::new(venue);

    let mut settings = ExecutionSettings::default()
        .with_max_concurrency(config.execution.max_concurrency)
        .with_dry_run(config.execution.dry_run || dry_run);
    if let Some(secs) = config.execution.request_timeout_secs {
        settings = settings.with_request_timeout(Duration::from_secs(secs));
    }

    let coordinator = ExecutionCoordinator::new(
        venue.clone(),
        data,
        venue,
        universe,
        config.strategy.clone(),
        settings,
    )?;

    Ok(coordinator)
}
