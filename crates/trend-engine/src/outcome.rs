//! Per-instrument cycle outcomes.

use serde::{Deserialize, Serialize};
use std::fmt;
use trend_core::types::{InstrumentDescriptor, InstrumentSnapshot, OrderAck, OrderIntent};

/// Terminal state of one instrument within a cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OutcomeStatus {
    /// Bars could not be fetched, the request timed out or nothing came back
    FetchFailed,
    /// Bars were returned but do not form a valid series
    MalformedSeries,
    /// Valid series, too short for every indicator to be defined
    InsufficientHistory { bars: usize },
    /// Snapshot produced; no order was attempted
    Computed,
    /// No tradable contract could be determined
    ResolutionFailed,
    /// The gateway refused or failed the order
    SubmissionFailed,
    /// Order acknowledged by the gateway
    Submitted,
    /// Order built but not sent
    DryRun,
    /// Skipped after cancellation was requested
    Cancelled,
}

impl OutcomeStatus {
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            OutcomeStatus::FetchFailed
                | OutcomeStatus::MalformedSeries
                | OutcomeStatus::ResolutionFailed
                | OutcomeStatus::SubmissionFailed
        )
    }
}

impl fmt::Display for OutcomeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutcomeStatus::FetchFailed => write!(f, "fetch failed"),
            OutcomeStatus::MalformedSeries => write!(f, "malformed series"),
            OutcomeStatus::InsufficientHistory { bars } => {
                write!(f, "insufficient history ({} bars)", bars)
            }
            OutcomeStatus::Computed => write!(f, "computed"),
            OutcomeStatus::ResolutionFailed => write!(f, "resolution failed"),
            OutcomeStatus::SubmissionFailed => write!(f, "submission failed"),
            OutcomeStatus::Submitted => write!(f, "submitted"),
            OutcomeStatus::DryRun => write!(f, "dry run"),
            OutcomeStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// What happened to one instrument during a cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstrumentOutcome {
    pub instrument: InstrumentDescriptor,
    pub status: OutcomeStatus,
    /// Latest indicator snapshot, when one was computed
    pub snapshot: Option<InstrumentSnapshot>,
    /// Order built for this instrument
    pub intent: Option<OrderIntent>,
    /// Gateway acknowledgement
    pub ack: Option<OrderAck>,
    /// Human-readable failure or skip reason
    pub reason: Option<String>,
}

impl InstrumentOutcome {
    fn new(instrument: InstrumentDescriptor, status: OutcomeStatus) -> Self {
        Self {
            instrument,
            status,
            snapshot: None,
            intent: None,
            ack: None,
            reason: None,
        }
    }

    pub(crate) fn failed(
        instrument: InstrumentDescriptor,
        status: OutcomeStatus,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            reason: Some(reason.into()),
            ..Self::new(instrument, status)
        }
    }

    pub(crate) fn cancelled(instrument: InstrumentDescriptor) -> Self {
        Self::failed(instrument, OutcomeStatus::Cancelled, "cancellation requested")
    }

    pub(crate) fn computed(snapshot: InstrumentSnapshot) -> Self {
        Self {
            snapshot: Some(snapshot.clone()),
            ..Self::new(snapshot.instrument, OutcomeStatus::Computed)
        }
    }

    pub fn symbol(&self) -> &str {
        &self.instrument.symbol
    }

    /// Transition a computed outcome to a later terminal state.
    pub(crate) fn advance(mut self, status: OutcomeStatus, reason: Option<String>) -> Self {
        self.status = status;
        self.reason = reason;
        self
    }
}
