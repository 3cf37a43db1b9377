//! Show the latest signals without trading.

use anyhow::{Context, Result};
use chrono::Local;
use trend_config::AppConfig;

use super::build_coordinator;
use crate::cli::SignalsArgs;

pub async fn run(args: SignalsArgs, config: AppConfig) -> Result<()> {
    let date = args.date.unwrap_or_else(|| Local::now().date_naive());
    let coordinator = build_coordinator(&config, args.data_dir.as_deref(), true)?;

    let summary = coordinator
        .preview(date, config.session.mode)
        .await
        .context("Signal scan aborted")?;

    if args.json {
        println!("{}", summary.to_json()?);
        return Ok(());
    }

    println!(
        "{:<6} {:<11} {:>12} {:>12} {:>9} {:>6}",
        "SYMBOL", "DATE", "CLOSE", "MA", "VOL", "SIGNAL"
    );
    println!("{}", "-".repeat(61));

    for outcome in &summary.outcomes {
        match &outcome.snapshot {
            Some(snap) => println!(
                "{:<6} {:<11} {:>12.4} {:>12.4} {:>9.4} {:>6}",
                outcome.symbol(),
                snap.latest.date,
                snap.latest.close,
                snap.latest.moving_average,
                snap.volatility(),
                snap.signal()
            ),
            None => println!(
                "{:<6} {}",
                outcome.symbol(),
                outcome.reason.as_deref().unwrap_or("no snapshot")
            ),
        }
    }
    println!();

    match &summary.gate {
        Some(gate) => {
            println!(
                "Basket volatility {:.4} vs threshold {:.4} over {} instruments",
                gate.average_volatility, gate.threshold, gate.contributors
            );
            match gate.closed_reason() {
                Some(reason) => println!("Gates closed: {}", reason),
                None => println!("Gates open: orders would be submitted on {}", date),
            }
        }
        None => println!("No instrument produced a snapshot"),
    }

    Ok(())
}
