//! Paper venue for dry runs and simulation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info};
use trend_core::error::{ConnectionError, SubmissionError};
use trend_core::traits::{OrderGateway, SessionProvider};
use trend_core::types::{
    AckStatus, OrderAck, OrderIntent, Session, TradableContract, TradingMode,
};
use uuid::Uuid;

/// An order accepted by the paper venue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaperOrder {
    pub order_id: Uuid,
    pub session_id: Uuid,
    pub intent: OrderIntent,
    pub received_at: DateTime<Utc>,
}

/// In-process venue that accepts paper sessions and records orders.
///
/// Orders are keyed by client order id, so resubmitting an intent returns
/// the original order instead of creating a second one. With a journal the
/// record survives restarts.
pub struct PaperVenue {
    name: String,
    orders: Arc<Mutex<Vec<PaperOrder>>>,
    journal: Option<PathBuf>,
    active_sessions: AtomicUsize,
}

impl PaperVenue {
    /// Create a venue with an empty in-memory order book.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            orders: Arc::new(Mutex::new(Vec::new())),
            journal: None,
            active_sessions: AtomicUsize::new(0),
        }
    }

    /// Back the order record with a JSON-lines journal, loading any orders
    /// already in it.
    pub fn with_journal(mut self, path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        if path.exists() {
            let reader = BufReader::new(File::open(&path)?);
            let mut orders = Vec::new();
            for line in reader.lines() {
                let line = line?;
                if line.trim().is_empty() {
                    continue;
                }
                let order: PaperOrder = serde_json::from_str(&line)
                    .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
                orders.push(order);
            }
            debug!(path = %path.display(), orders = orders.len(), "Loaded paper order journal");
            self.orders = Arc::new(Mutex::new(orders));
        }
        self.journal = Some(path);
        Ok(self)
    }

    /// Orders accepted so far, in submission order.
    pub fn orders(&self) -> Vec<PaperOrder> {
        self.lock_orders().clone()
    }

    /// Sessions connected and not yet released.
    pub fn active_sessions(&self) -> usize {
        self.active_sessions.load(Ordering::SeqCst)
    }

    fn lock_orders(&self) -> MutexGuard<'_, Vec<PaperOrder>> {
        self.orders.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn append_journal(&self, order: &PaperOrder) -> Result<(), SubmissionError> {
        let Some(path) = &self.journal else {
            return Ok(());
        };
        let line =
            serde_json::to_string(order).map_err(|e| SubmissionError::Transport(e.to_string()))?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| SubmissionError::Transport(e.to_string()))?;
        writeln!(file, "{}", line).map_err(|e| SubmissionError::Transport(e.to_string()))
    }
}

impl Default for PaperVenue {
    fn default() -> Self {
        Self::new("paper")
    }
}

#[async_trait]
impl SessionProvider for PaperVenue {
    async fn connect(&self, mode: TradingMode) -> Result<Session, ConnectionError> {
        if mode == TradingMode::Live {
            return Err(ConnectionError::Unsupported(format!(
                "{} only accepts paper sessions",
                self.name
            )));
        }
        self.active_sessions.fetch_add(1, Ordering::SeqCst);
        Ok(Session::new(mode, self.name.clone()))
    }

    async fn disconnect(&self, session: Session) {
        let _ = self
            .active_sessions
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1));
        debug!(session = %session.id, "Paper session released");
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[async_trait]
impl OrderGateway for PaperVenue {
    async fn submit(
        &self,
        session: &Session,
        contract: &TradableContract,
        intent: &OrderIntent,
    ) -> Result<OrderAck, SubmissionError> {
        if session.mode != TradingMode::Paper {
            return Err(SubmissionError::Rejected(
                "paper venue requires a paper session".to_string(),
            ));
        }
        if intent.quantity == 0 {
            return Err(SubmissionError::InvalidQuantity(intent.quantity));
        }
        if contract.symbol != intent.symbol {
            return Err(SubmissionError::Rejected(format!(
                "contract {} does not belong to {}",
                contract, intent.symbol
            )));
        }

        let mut orders = self.lock_orders();
        if let Some(existing) = orders
            .iter()
            .find(|o| o.intent.client_order_id == intent.client_order_id)
        {
            info!(
                client_order_id = %intent.client_order_id,
                order_id = %existing.order_id,
                "Duplicate paper order"
            );
            return Ok(OrderAck {
                order_id: existing.order_id,
                client_order_id: intent.client_order_id.clone(),
                status: AckStatus::Duplicate,
                acknowledged_at: Utc::now(),
            });
        }

        let order = PaperOrder {
            order_id: Uuid::new_v4(),
            session_id: session.id,
            intent: intent.clone(),
            received_at: Utc::now(),
        };
        self.append_journal(&order)?;
        orders.push(order.clone());

        info!(
            symbol = %intent.symbol,
            side = %intent.side,
            quantity = intent.quantity,
            contract = %contract,
            order_id = %order.order_id,
            "Paper order accepted"
        );

        Ok(OrderAck {
            order_id: order.order_id,
            client_order_id: intent.client_order_id.clone(),
            status: AckStatus::Accepted,
            acknowledged_at: order.received_at,
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use trend_core::types::{
        AssetClass, ExpiryToken, IndicatorRow, InstrumentDescriptor, InstrumentSnapshot,
        RawContractMetadata, Side, TrendSignal,
    };

    fn contract(symbol: &str) -> TradableContract {
        let meta = RawContractMetadata {
            contract_id: "4001".to_string(),
            symbol: symbol.to_string(),
            local_symbol: format!("{}M4", symbol),
            exchange: "COMEX".to_string(),
            currency: "USD".to_string(),
            expiry: "202406".to_string(),
            multiplier: Some(100.0),
        };
        TradableContract::from_metadata(&meta, ExpiryToken::parse("202406").unwrap())
    }

    fn intent(quantity: u32) -> OrderIntent {
        let date = NaiveDate::from_ymd_opt(2024, 3, 25).unwrap();
        let snapshot = InstrumentSnapshot::new(
            InstrumentDescriptor::new("GC", "COMEX", "USD", AssetClass::Metals),
            IndicatorRow {
                date,
                close: 2150.0,
                period_return: 0.004,
                volatility: 0.018,
                moving_average: 2050.0,
                signal: TrendSignal::Long,
            },
            400,
        );
        OrderIntent::new(&snapshot, contract("GC"), quantity, date)
    }

    #[tokio::test]
    async fn test_live_mode_unsupported() {
        let venue = PaperVenue::default();
        let err = venue.connect(TradingMode::Live).await.unwrap_err();
        assert!(matches!(err, ConnectionError::Unsupported(_)));
        assert_eq!(venue.active_sessions(), 0);
    }

    #[tokio::test]
    async fn test_session_lifecycle() {
        let venue = PaperVenue::default();
        let session = venue.connect(TradingMode::Paper).await.unwrap();
        assert_eq!(session.mode, TradingMode::Paper);
        assert_eq!(session.venue, "paper");
        assert_eq!(venue.active_sessions(), 1);

        venue.disconnect(session).await;
        assert_eq!(venue.active_sessions(), 0);
    }

    #[tokio::test]
    async fn test_submit_and_dedupe() {
        let venue = PaperVenue::default();
        let session = venue.connect(TradingMode::Paper).await.unwrap();
        let order = intent(1);

        let first = venue.submit(&session, &order.contract, &order).await.unwrap();
        assert_eq!(first.status, AckStatus::Accepted);
        assert_eq!(first.client_order_id, "GC-202406-20240325-BUY");

        let second = venue.submit(&session, &order.contract, &order).await.unwrap();
        assert_eq!(second.status, AckStatus::Duplicate);
        assert_eq!(second.order_id, first.order_id);

        let orders = venue.orders();
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].intent.side, Side::Buy);
    }

    #[tokio::test]
    async fn test_rejects_invalid_orders() {
        let venue = PaperVenue::default();
        let session = venue.connect(TradingMode::Paper).await.unwrap();

        let zero = intent(0);
        assert_eq!(
            venue.submit(&session, &zero.contract, &zero).await.unwrap_err(),
            SubmissionError::InvalidQuantity(0)
        );

        let order = intent(1);
        let err = venue
            .submit(&session, &contract("SI"), &order)
            .await
            .unwrap_err();
        assert!(matches!(err, SubmissionError::Rejected(_)));

        let live = Session::new(TradingMode::Live, "elsewhere");
        let err = venue.submit(&live, &order.contract, &order).await.unwrap_err();
        assert!(matches!(err, SubmissionError::Rejected(_)));

        assert!(venue.orders().is_empty());
    }

    #[tokio::test]
    async fn test_journal_survives_restart() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("orders.jsonl");
        let order = intent(1);

        let venue = PaperVenue::default().with_journal(&path).unwrap();
        let session = venue.connect(TradingMode::Paper).await.unwrap();
        let first = venue.submit(&session, &order.contract, &order).await.unwrap();

        let reopened = PaperVenue::default().with_journal(&path).unwrap();
        assert_eq!(reopened.orders().len(), 1);
        let session = reopened.connect(TradingMode::Paper).await.unwrap();
        let again = reopened
            .submit(&session, &order.contract, &order)
            .await
            .unwrap();
        assert_eq!(again.status, AckStatus::Duplicate);
        assert_eq!(again.order_id, first.order_id);
    }
}
