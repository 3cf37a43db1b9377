//! CSV market data source.
//!
//! Expects one `<SYMBOL>.csv` file of daily bars per instrument family and a
//! shared `contracts.csv` listing the dated contracts of every family.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use csv::ReaderBuilder;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;
use trend_core::error::{DataFetchError, MetadataFetchError};
use trend_core::traits::MarketDataSource;
use trend_core::types::{
    Bar, BarSize, InstrumentDescriptor, Lookback, RawContractMetadata, Session,
};

/// File name of the contract listing inside the data directory.
pub const CONTRACTS_FILE: &str = "contracts.csv";

/// CSV record format.
#[derive(Debug, Deserialize)]
struct CsvRecord {
    #[serde(alias = "Date", alias = "timestamp", alias = "Timestamp")]
    date: String,
    #[serde(alias = "Open", default)]
    open: Option<f64>,
    #[serde(alias = "High", default)]
    high: Option<f64>,
    #[serde(alias = "Low", default)]
    low: Option<f64>,
    #[serde(alias = "Close", alias = "Adj Close")]
    close: f64,
    #[serde(alias = "Volume", default)]
    volume: Option<f64>,
}

/// Market data read from a directory of CSV files.
#[derive(Debug, Clone)]
pub struct CsvMarketData {
    directory: PathBuf,
}

impl CsvMarketData {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    fn bars_path(&self, symbol: &str) -> PathBuf {
        self.directory.join(format!("{}.csv", symbol))
    }

    /// Load every bar in a symbol's file, sorted by date.
    pub fn load_bars(&self, symbol: &str) -> Result<Vec<Bar>, DataFetchError> {
        let path = self.bars_path(symbol);
        if !path.exists() {
            return Err(DataFetchError::NoData(symbol.to_string()));
        }

        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_path(&path)
            .map_err(|e| DataFetchError::Transport(e.to_string()))?;

        let mut bars = Vec::new();
        for result in reader.deserialize() {
            let record: CsvRecord = result.map_err(|e| DataFetchError::Parse(e.to_string()))?;
            let date = parse_date(&record.date)?;
            let close = record.close;

            bars.push(Bar::new(
                date,
                record.open.unwrap_or(close),
                record.high.unwrap_or(close),
                record.low.unwrap_or(close),
                close,
                record.volume.unwrap_or(0.0),
            ));
        }

        // Duplicates are left in place for series validation to reject.
        bars.sort_by_key(|b| b.date);

        Ok(bars)
    }

    /// Load the listed contracts of one family.
    pub fn load_contracts(&self, symbol: &str) -> Result<Vec<RawContractMetadata>, MetadataFetchError> {
        let path = self.directory.join(CONTRACTS_FILE);
        if !path.exists() {
            return Err(MetadataFetchError::NotFound(symbol.to_string()));
        }

        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_path(&path)
            .map_err(|e| MetadataFetchError::Transport(e.to_string()))?;

        let mut contracts = Vec::new();
        for result in reader.deserialize() {
            let meta: RawContractMetadata =
                result.map_err(|e| MetadataFetchError::Parse(e.to_string()))?;
            if meta.symbol == symbol {
                contracts.push(meta);
            }
        }

        if contracts.is_empty() {
            return Err(MetadataFetchError::NotFound(symbol.to_string()));
        }

        Ok(contracts)
    }
}

/// Keep the bars inside the lookback window ending at the latest bar.
fn trim_to_lookback(bars: Vec<Bar>, lookback: Lookback) -> Vec<Bar> {
    let Some(latest) = bars.last().map(|b| b.date) else {
        return bars;
    };
    let start = lookback.start_from(latest);
    bars.into_iter().filter(|b| b.date >= start).collect()
}

/// Parse the date formats commonly found in exported price files.
fn parse_date(raw: &str) -> Result<NaiveDate, DataFetchError> {
    const FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%Y%m%d"];

    for format in FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(raw, format) {
            return Ok(d);
        }
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Ok(dt.date());
    }

    // Unix timestamp, seconds or milliseconds
    if let Ok(ts) = raw.parse::<i64>() {
        let millis = if ts > 10_000_000_000 { ts } else { ts * 1000 };
        if let Some(dt) = DateTime::from_timestamp_millis(millis) {
            return Ok(dt.date_naive());
        }
    }

    Err(DataFetchError::Parse(format!("Could not parse date: {}", raw)))
}

#[async_trait]
impl MarketDataSource for CsvMarketData {
    async fn fetch_daily_bars(
        &self,
        _session: &Session,
        instrument: &InstrumentDescriptor,
        lookback: Lookback,
        bar_size: BarSize,
    ) -> Result<Vec<Bar>, DataFetchError> {
        if bar_size != BarSize::Daily {
            return Err(DataFetchError::NoData(format!(
                "{} ({} bars are not stored)",
                instrument.symbol, bar_size
            )));
        }

        let bars = trim_to_lookback(self.load_bars(&instrument.symbol)?, lookback);
        if bars.is_empty() {
            return Err(DataFetchError::NoData(instrument.symbol.clone()));
        }

        debug!(
            symbol = %instrument.symbol,
            bars = bars.len(),
            first = %bars[0].date,
            last = %bars[bars.len() - 1].date,
            "Loaded bars from CSV"
        );
        Ok(bars)
    }

    async fn fetch_available_contracts(
        &self,
        _session: &Session,
        instrument: &InstrumentDescriptor,
    ) -> Result<Vec<RawContractMetadata>, MetadataFetchError> {
        let contracts = self.load_contracts(&instrument.symbol)?;
        debug!(symbol = %instrument.symbol, listed = contracts.len(), "Loaded contracts from CSV");
        Ok(contracts)
    }

    fn name(&self) -> &str {
        "csv"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use trend_core::types::{AssetClass, LookbackUnit, TradingMode};

    fn corn() -> InstrumentDescriptor {
        InstrumentDescriptor::new("ZC", "CBOT", "USD", AssetClass::Grains)
    }

    fn session() -> Session {
        Session::new(TradingMode::Paper, "test")
    }

    #[test]
    fn test_parse_date() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        assert_eq!(parse_date("2024-01-15").unwrap(), expected);
        assert_eq!(parse_date("2024/01/15").unwrap(), expected);
        assert_eq!(parse_date("01/15/2024").unwrap(), expected);
        assert_eq!(parse_date("20240115").unwrap(), expected);
        assert_eq!(parse_date("2024-01-15 10:30:00").unwrap(), expected);
        assert_eq!(parse_date("1705312800000").unwrap(), expected); // Unix ms
        assert_eq!(parse_date("1705312800").unwrap(), expected); // Unix sec
        assert!(parse_date("yesterday").is_err());
    }

    #[tokio::test]
    async fn test_fetch_sorts_and_aliases_columns() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("ZC.csv"),
            "Date,Open,High,Low,Adj Close,Volume\n\
             2024-01-03,451,455,449,453.5,1200\n\
             2024-01-02,448,452,447,450.25,1000\n",
        )
        .unwrap();

        let source = CsvMarketData::new(dir.path());
        let bars = source
            .fetch_daily_bars(&session(), &corn(), Lookback::default(), BarSize::Daily)
            .await
            .unwrap();

        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        assert_eq!(bars[0].close, 450.25);
        assert_eq!(bars[1].volume, 1200.0);
    }

    #[tokio::test]
    async fn test_close_only_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("ZC.csv"), "date,close\n2024-01-02,450\n").unwrap();

        let bars = CsvMarketData::new(dir.path()).load_bars("ZC").unwrap();
        assert_eq!(bars[0].open, 450.0);
        assert_eq!(bars[0].volume, 0.0);
    }

    #[tokio::test]
    async fn test_trims_to_lookback() {
        let dir = tempfile::tempdir().unwrap();
        let mut body = String::from("date,close\n");
        for day in 1..=31 {
            body.push_str(&format!("2024-01-{:02},{}\n", day, 100 + day));
        }
        fs::write(dir.path().join("ZC.csv"), body).unwrap();

        let source = CsvMarketData::new(dir.path());
        let bars = source
            .fetch_daily_bars(
                &session(),
                &corn(),
                Lookback::new(10, LookbackUnit::Days),
                BarSize::Daily,
            )
            .await
            .unwrap();

        // 2024-01-21 ..= 2024-01-31
        assert_eq!(bars.len(), 11);
        assert_eq!(bars[0].date, NaiveDate::from_ymd_opt(2024, 1, 21).unwrap());
    }

    #[tokio::test]
    async fn test_missing_and_bad_files() {
        let dir = tempfile::tempdir().unwrap();
        let source = CsvMarketData::new(dir.path());

        let err = source
            .fetch_daily_bars(&session(), &corn(), Lookback::default(), BarSize::Daily)
            .await
            .unwrap_err();
        assert_eq!(err, DataFetchError::NoData("ZC".to_string()));

        fs::write(dir.path().join("ZC.csv"), "date,close\nnot-a-date,450\n").unwrap();
        let err = source
            .fetch_daily_bars(&session(), &corn(), Lookback::default(), BarSize::Daily)
            .await
            .unwrap_err();
        assert!(matches!(err, DataFetchError::Parse(_)));

        fs::write(dir.path().join("ZC.csv"), "date,close\n").unwrap();
        let err = source
            .fetch_daily_bars(&session(), &corn(), Lookback::default(), BarSize::Daily)
            .await
            .unwrap_err();
        assert_eq!(err, DataFetchError::NoData("ZC".to_string()));
    }

    #[tokio::test]
    async fn test_weekly_not_served() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("ZC.csv"), "date,close\n2024-01-02,450\n").unwrap();

        let err = CsvMarketData::new(dir.path())
            .fetch_daily_bars(&session(), &corn(), Lookback::default(), BarSize::Weekly)
            .await
            .unwrap_err();
        assert!(matches!(err, DataFetchError::NoData(_)));
    }

    #[tokio::test]
    async fn test_contracts_filtered_by_symbol() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(CONTRACTS_FILE),
            "symbol,contract_id,local_symbol,exchange,currency,expiry,multiplier\n\
             ZC,101,ZCH4,CBOT,USD,202403,5000\n\
             CL,201,CLJ4,NYMEX,USD,20240320,1000\n\
             ZC,102,ZCK4,CBOT,USD,202405,\n\
             ZC,103,,CBOT,USD,,\n",
        )
        .unwrap();

        let source = CsvMarketData::new(dir.path());
        let contracts = source
            .fetch_available_contracts(&session(), &corn())
            .await
            .unwrap();

        assert_eq!(contracts.len(), 3);
        assert_eq!(contracts[0].expiry, "202403");
        assert_eq!(contracts[0].multiplier, Some(5000.0));
        assert_eq!(contracts[1].multiplier, None);
        assert_eq!(contracts[2].expiry, "");

        let gold = InstrumentDescriptor::new("GC", "COMEX", "USD", AssetClass::Metals);
        let err = source
            .fetch_available_contracts(&session(), &gold)
            .await
            .unwrap_err();
        assert_eq!(err, MetadataFetchError::NotFound("GC".to_string()));
    }
}
