//! Run one trading cycle.

use anyhow::{Context, Result};
use chrono::Local;
use tokio::sync::watch;
use tracing::{debug, info, warn};
use trend_config::AppConfig;

use super::build_coordinator;
use crate::cli::RunArgs;

pub async fn run(args: RunArgs, config: AppConfig) -> Result<()> {
    let date = args.date.unwrap_or_else(|| Local::now().date_naive());
    let mode = args.mode.unwrap_or(config.session.mode);
    let coordinator = build_coordinator(&config, args.data_dir.as_deref(), args.dry_run)?;

    info!(
        %date,
        %mode,
        instruments = coordinator.universe().len(),
        "Running cycle"
    );
    debug!(symbols = ?coordinator.universe().symbols(), "Universe");

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received; letting in-flight requests finish");
            let _ = shutdown_tx.send(true);
        }
    });

    let summary = coordinator
        .run_cycle(date, mode, Some(shutdown_rx))
        .await
        .context("Cycle aborted")?;

    info!(status = %summary.status, gates_open = summary.gates_open(), "Cycle complete");
    for outcome in summary.outcomes.iter().filter(|o| o.status.is_failure()) {
        warn!(
            symbol = %outcome.symbol(),
            status = %outcome.status,
            reason = outcome.reason.as_deref().unwrap_or(""),
            "Instrument failed"
        );
    }

    if args.json {
        println!("{}", summary.to_json()?);
    } else {
        println!("{}", summary.summary());
    }

    Ok(())
}
