//! Core traits for the trend engine.

mod gateway;
mod indicator;
mod market_data;
mod session;

pub use gateway::OrderGateway;
pub use indicator::Indicator;
pub use market_data::MarketDataSource;
pub use session::SessionProvider;
