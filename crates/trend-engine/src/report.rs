//! Cycle summary and text report.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use trend_core::types::TradingMode;
use trend_gates::GateDecision;

use crate::outcome::{InstrumentOutcome, OutcomeStatus};

/// How a cycle ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CycleStatus {
    /// All phases ran; orders may or may not have been submitted
    Completed,
    /// No instrument produced a snapshot, so the gates were never evaluated
    NoData,
    /// Cancellation was requested before every instrument finished
    Cancelled,
}

impl fmt::Display for CycleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CycleStatus::Completed => write!(f, "completed"),
            CycleStatus::NoData => write!(f, "no data"),
            CycleStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Tallies over the per-instrument outcomes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleCounts {
    pub attempted: usize,
    pub computed: usize,
    pub fetch_failures: usize,
    pub malformed_series: usize,
    pub insufficient_history: usize,
    pub resolution_failures: usize,
    pub submission_failures: usize,
    pub submitted: usize,
    pub dry_run: usize,
    pub cancelled: usize,
}

impl CycleCounts {
    pub fn from_outcomes(outcomes: &[InstrumentOutcome]) -> Self {
        let mut counts = Self {
            attempted: outcomes.len(),
            ..Default::default()
        };

        for outcome in outcomes {
            if outcome.snapshot.is_some() {
                counts.computed += 1;
            }
            match outcome.status {
                OutcomeStatus::FetchFailed => counts.fetch_failures += 1,
                OutcomeStatus::MalformedSeries => counts.malformed_series += 1,
                OutcomeStatus::InsufficientHistory { .. } => counts.insufficient_history += 1,
                OutcomeStatus::ResolutionFailed => counts.resolution_failures += 1,
                OutcomeStatus::SubmissionFailed => counts.submission_failures += 1,
                OutcomeStatus::Submitted => counts.submitted += 1,
                OutcomeStatus::DryRun => counts.dry_run += 1,
                OutcomeStatus::Cancelled => counts.cancelled += 1,
                OutcomeStatus::Computed => {}
            }
        }

        counts
    }
}

/// Result of one execution cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleSummary {
    pub cycle_date: NaiveDate,
    pub mode: TradingMode,
    pub status: CycleStatus,
    /// Gate evaluation, absent when the cycle ended before gating
    pub gate: Option<GateDecision>,
    /// One entry per universe instrument, in universe order
    pub outcomes: Vec<InstrumentOutcome>,
    pub counts: CycleCounts,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl CycleSummary {
    pub fn new(
        cycle_date: NaiveDate,
        mode: TradingMode,
        status: CycleStatus,
        gate: Option<GateDecision>,
        outcomes: Vec<InstrumentOutcome>,
        started_at: DateTime<Utc>,
    ) -> Self {
        let counts = CycleCounts::from_outcomes(&outcomes);
        Self {
            cycle_date,
            mode,
            status,
            gate,
            outcomes,
            counts,
            started_at,
            finished_at: Utc::now(),
        }
    }

    /// Outcome for one symbol.
    pub fn outcome(&self, symbol: &str) -> Option<&InstrumentOutcome> {
        self.outcomes.iter().find(|o| o.symbol() == symbol)
    }

    /// Whether both gates were open.
    pub fn gates_open(&self) -> bool {
        self.gate.is_some_and(|g| g.is_open())
    }

    /// Generate a text summary.
    pub fn summary(&self) -> String {
        let mut s = String::new();

        s.push_str("═══════════════════════════════════════════════════════════\n");
        s.push_str("                      CYCLE REPORT                         \n");
        s.push_str("═══════════════════════════════════════════════════════════\n\n");

        s.push_str(&format!("  Cycle Date:          {}\n", self.cycle_date));
        s.push_str(&format!("  Mode:                {}\n", self.mode));
        s.push_str(&format!("  Status:              {}\n", self.status));
        s.push_str(&format!(
            "  Duration:            {} ms\n",
            (self.finished_at - self.started_at).num_milliseconds()
        ));
        s.push('\n');

        s.push_str("GATES\n");
        s.push_str("───────────────────────────────────────────────────────────\n");
        match &self.gate {
            Some(gate) => {
                s.push_str(&format!(
                    "  Avg Volatility:      {:.4} ({} instruments)\n",
                    gate.average_volatility, gate.contributors
                ));
                s.push_str(&format!("  Threshold:           {:.4}\n", gate.threshold));
                s.push_str(&format!("  Volatile Regime:     {}\n", yes_no(gate.volatile)));
                s.push_str(&format!("  Rebalance Day:       {}\n", yes_no(gate.rebalance_day)));
                if let Some(reason) = gate.closed_reason() {
                    s.push_str(&format!("  Closed:              {}\n", reason));
                }
            }
            None => s.push_str("  Not evaluated\n"),
        }
        s.push('\n');

        s.push_str("INSTRUMENTS\n");
        s.push_str("───────────────────────────────────────────────────────────\n");
        for outcome in &self.outcomes {
            let signal = outcome
                .snapshot
                .as_ref()
                .map(|snap| {
                    format!(
                        "{} vol {:.4} close {:.4} ma {:.4}",
                        snap.signal(),
                        snap.volatility(),
                        snap.latest.close,
                        snap.latest.moving_average
                    )
                })
                .unwrap_or_default();
            s.push_str(&format!("  {:<6} {:<30} {}\n", outcome.symbol(), outcome.status, signal));
            if let Some(intent) = &outcome.intent {
                s.push_str(&format!(
                    "         {} {} {} [{}]\n",
                    intent.side, intent.quantity, intent.contract, intent.client_order_id
                ));
            }
            if let Some(reason) = &outcome.reason {
                s.push_str(&format!("         {}\n", reason));
            }
        }
        s.push('\n');

        s.push_str("COUNTS\n");
        s.push_str("───────────────────────────────────────────────────────────\n");
        s.push_str(&format!("  Attempted:           {}\n", self.counts.attempted));
        s.push_str(&format!("  Computed:            {}\n", self.counts.computed));
        s.push_str(&format!("  Fetch Failures:      {}\n", self.counts.fetch_failures));
        s.push_str(&format!("  Malformed Series:    {}\n", self.counts.malformed_series));
        s.push_str(&format!("  Short History:       {}\n", self.counts.insufficient_history));
        s.push_str(&format!("  Resolution Failures: {}\n", self.counts.resolution_failures));
        s.push_str(&format!("  Submission Failures: {}\n", self.counts.submission_failures));
        s.push_str(&format!("  Submitted:           {}\n", self.counts.submitted));
        if self.counts.dry_run > 0 {
            s.push_str(&format!("  Dry Run:             {}\n", self.counts.dry_run));
        }
        if self.counts.cancelled > 0 {
            s.push_str(&format!("  Cancelled:           {}\n", self.counts.cancelled));
        }
        s.push('\n');

        s.push_str("═══════════════════════════════════════════════════════════\n");

        s
    }

    /// Export to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}
