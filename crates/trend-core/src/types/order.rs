//! Order intents and venue acknowledgements.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{InstrumentSnapshot, TradableContract};

/// Order side (buy or sell).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Buy,
    Sell,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Buy => write!(f, "BUY"),
            Side::Sell => write!(f, "SELL"),
        }
    }
}

/// A fixed-size market order for one resolved contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderIntent {
    /// Family symbol code
    pub symbol: String,
    /// Contract to trade
    pub contract: TradableContract,
    /// Buy or sell
    pub side: Side,
    /// Number of contracts
    pub quantity: u32,
    /// Idempotency key; identical for the same instrument, contract, side
    /// and cycle date
    pub client_order_id: String,
}

impl OrderIntent {
    /// Build the intent for a snapshot's signal on `cycle_date`.
    pub fn new(
        snapshot: &InstrumentSnapshot,
        contract: TradableContract,
        quantity: u32,
        cycle_date: NaiveDate,
    ) -> Self {
        let side = snapshot.signal().side();
        let client_order_id = format!(
            "{}-{}-{}-{}",
            snapshot.symbol(),
            contract.expiry,
            cycle_date.format("%Y%m%d"),
            side
        );

        Self {
            symbol: snapshot.symbol().to_string(),
            contract,
            side,
            quantity,
            client_order_id,
        }
    }
}

/// Venue verdict on a submitted intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AckStatus {
    /// New order accepted
    Accepted,
    /// Client order id seen before; original order returned
    Duplicate,
}

/// Acknowledgement returned by an order gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderAck {
    pub order_id: Uuid,
    pub client_order_id: String,
    pub status: AckStatus,
    pub acknowledged_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{
        AssetClass, ExpiryToken, IndicatorRow, InstrumentDescriptor, RawContractMetadata,
        TrendSignal,
    };

    fn snapshot(signal: TrendSignal) -> InstrumentSnapshot {
        let date = NaiveDate::from_ymd_opt(2024, 1, 25).unwrap();
        InstrumentSnapshot::new(
            InstrumentDescriptor::new("CL", "NYMEX", "USD", AssetClass::Energy),
            IndicatorRow {
                date,
                close: 75.0,
                period_return: 0.01,
                volatility: 0.02,
                moving_average: 74.0,
                signal,
            },
            250,
        )
    }

    fn contract() -> TradableContract {
        let meta = RawContractMetadata {
            contract_id: "1001".to_string(),
            symbol: "CL".to_string(),
            local_symbol: "CLH4".to_string(),
            exchange: "NYMEX".to_string(),
            currency: "USD".to_string(),
            expiry: "20240220".to_string(),
            multiplier: Some(1000.0),
        };
        let expiry = ExpiryToken::parse(&meta.expiry).unwrap();
        TradableContract::from_metadata(&meta, expiry)
    }

    #[test]
    fn test_intent_direction_follows_signal() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 25).unwrap();

        let long = OrderIntent::new(&snapshot(TrendSignal::Long), contract(), 1, date);
        assert_eq!(long.side, Side::Buy);
        assert_eq!(long.quantity, 1);

        let short = OrderIntent::new(&snapshot(TrendSignal::Short), contract(), 1, date);
        assert_eq!(short.side, Side::Sell);
    }

    #[test]
    fn test_client_order_id_is_deterministic() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 25).unwrap();
        let a = OrderIntent::new(&snapshot(TrendSignal::Long), contract(), 1, date);
        let b = OrderIntent::new(&snapshot(TrendSignal::Long), contract(), 1, date);

        assert_eq!(a.client_order_id, "CL-20240220-20240125-BUY");
        assert_eq!(a.client_order_id, b.client_order_id);
    }
}
