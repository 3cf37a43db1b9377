//! Order gateway trait definition.

use crate::error::SubmissionError;
use crate::types::{OrderAck, OrderIntent, Session, TradableContract};
use async_trait::async_trait;

/// Submits orders to the venue.
#[async_trait]
pub trait OrderGateway: Send + Sync {
    /// Submit one order intent for a resolved contract.
    ///
    /// Gateways should treat `intent.client_order_id` as an idempotency key.
    async fn submit(
        &self,
        session: &Session,
        contract: &TradableContract,
        intent: &OrderIntent,
    ) -> Result<OrderAck, SubmissionError>;

    /// Get the gateway name.
    fn name(&self) -> &str;
}
