//! Execution cycle for the volatility-gated trend strategy.
//!
//! A cycle connects a session, fetches and computes every instrument of the
//! universe, evaluates the basket volatility and calendar gates, and, when
//! both are open, resolves the front-month contract and submits one order per
//! instrument. Per-instrument failures are recorded in the [`CycleSummary`]
//! and never abort the cycle.

mod coordinator;
mod error;
mod outcome;
mod report;
mod settings;

pub use coordinator::{CyclePhase, ExecutionCoordinator};
pub use error::{CoordinatorError, CycleError};
pub use outcome::{InstrumentOutcome, OutcomeStatus};
pub use report::{CycleCounts, CycleStatus, CycleSummary};
pub use settings::ExecutionSettings;
