//! List configured instruments.

use anyhow::Result;
use trend_config::AppConfig;

pub async fn run(config: AppConfig) -> Result<()> {
    let universe = config.universe()?;

    println!("Universe ({} instruments):", universe.len());
    println!();
    println!("  {:<6} {:<8} {:<9} {}", "SYMBOL", "EXCHANGE", "CURRENCY", "CATEGORY");
    for instrument in &universe {
        println!(
            "  {:<6} {:<8} {:<9} {}",
            instrument.symbol, instrument.exchange, instrument.currency, instrument.category
        );
    }

    Ok(())
}
