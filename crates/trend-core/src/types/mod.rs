//! Core data types for the trend engine.

mod bar_size;
mod contract;
mod instrument;
mod ohlcv;
mod order;
mod params;
mod session;
mod snapshot;

pub use bar_size::{BarSize, Lookback, LookbackUnit};
pub use contract::{ExpiryToken, RawContractMetadata, TradableContract};
pub use instrument::{AssetClass, InstrumentDescriptor, Universe};
pub use ohlcv::{Bar, PriceSeries};
pub use order::{AckStatus, OrderAck, OrderIntent, Side};
pub use params::StrategyParams;
pub use session::{Session, TradingMode};
pub use snapshot::{IndicatorRow, InstrumentSnapshot, TrendSignal};
