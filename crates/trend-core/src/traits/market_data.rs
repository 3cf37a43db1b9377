//! Market data source trait definition.

use crate::error::{DataFetchError, MetadataFetchError};
use crate::types::{Bar, BarSize, InstrumentDescriptor, Lookback, RawContractMetadata, Session};
use async_trait::async_trait;

/// Source of daily bars and listed contract metadata.
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// Fetch historical bars for an instrument family's continuous series.
    ///
    /// # Arguments
    /// * `session` - The active venue session
    /// * `instrument` - The instrument family to fetch
    /// * `lookback` - How much history to request
    /// * `bar_size` - Bar size to request
    ///
    /// # Returns
    /// Bars ordered from oldest to newest
    async fn fetch_daily_bars(
        &self,
        session: &Session,
        instrument: &InstrumentDescriptor,
        lookback: Lookback,
        bar_size: BarSize,
    ) -> Result<Vec<Bar>, DataFetchError>;

    /// Fetch every listed dated contract of an instrument family.
    ///
    /// Entries are returned as reported; malformed expiry tokens are allowed.
    async fn fetch_available_contracts(
        &self,
        session: &Session,
        instrument: &InstrumentDescriptor,
    ) -> Result<Vec<RawContractMetadata>, MetadataFetchError>;

    /// Get the data source name.
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AssetClass, TradingMode};
    use chrono::NaiveDate;

    struct StaticSource;

    #[async_trait]
    impl MarketDataSource for StaticSource {
        async fn fetch_daily_bars(
            &self,
            _session: &Session,
            instrument: &InstrumentDescriptor,
            _lookback: Lookback,
            _bar_size: BarSize,
        ) -> Result<Vec<Bar>, DataFetchError> {
            if instrument.symbol == "ZC" {
                let date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
                Ok(vec![Bar::from_close(date, 450.0)])
            } else {
                Err(DataFetchError::SymbolNotFound(instrument.symbol.clone()))
            }
        }

        async fn fetch_available_contracts(
            &self,
            _session: &Session,
            instrument: &InstrumentDescriptor,
        ) -> Result<Vec<RawContractMetadata>, MetadataFetchError> {
            Err(MetadataFetchError::NotFound(instrument.symbol.clone()))
        }

        fn name(&self) -> &str {
            "static"
        }
    }

    #[tokio::test]
    async fn test_trait_object_dispatch() {
        let source: Box<dyn MarketDataSource> = Box::new(StaticSource);
        let session = Session::new(TradingMode::Paper, "test");
        let corn = InstrumentDescriptor::new("ZC", "CBOT", "USD", AssetClass::Grains);
        let gold = InstrumentDescriptor::new("GC", "COMEX", "USD", AssetClass::Metals);

        let bars = source
            .fetch_daily_bars(&session, &corn, Lookback::default(), BarSize::Daily)
            .await
            .unwrap();
        assert_eq!(bars.len(), 1);

        let err = source
            .fetch_daily_bars(&session, &gold, Lookback::default(), BarSize::Daily)
            .await
            .unwrap_err();
        assert_eq!(err, DataFetchError::SymbolNotFound("GC".to_string()));
    }
}
