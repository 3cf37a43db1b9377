//! Session provider trait definition.

use crate::error::ConnectionError;
use crate::types::{Session, TradingMode};
use async_trait::async_trait;

/// Establishes and tears down the venue session used by one cycle.
#[async_trait]
pub trait SessionProvider: Send + Sync {
    /// Connect in paper or live mode.
    async fn connect(&self, mode: TradingMode) -> Result<Session, ConnectionError>;

    /// Release the session. Never fails from the caller's point of view.
    async fn disconnect(&self, session: Session);

    /// Get the provider name.
    fn name(&self) -> &str;
}
