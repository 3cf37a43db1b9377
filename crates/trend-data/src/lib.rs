//! File-backed market data for the futures trend engine.

mod csv_source;

pub use csv_source::{CsvMarketData, CONTRACTS_FILE};
