//! Combined gate decision for one cycle.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::info;
use trend_core::error::AggregationError;
use trend_core::types::{InstrumentSnapshot, StrategyParams};

use crate::{RebalanceClock, VolatilityAggregator};

/// Outcome of both gates for one cycle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GateDecision {
    /// Average realized volatility across contributing instruments
    pub average_volatility: f64,
    /// Threshold the average was compared against
    pub threshold: f64,
    /// Number of instruments that contributed
    pub contributors: usize,
    /// Volatility gate
    pub volatile: bool,
    /// Calendar gate
    pub rebalance_day: bool,
}

impl GateDecision {
    /// Evaluate both gates over this cycle's snapshots.
    ///
    /// Fails with [`AggregationError::EmptyInput`] when no instrument produced
    /// a snapshot, which callers must keep distinct from a closed gate.
    pub fn evaluate(
        snapshots: &[InstrumentSnapshot],
        params: &StrategyParams,
        date: NaiveDate,
    ) -> Result<Self, AggregationError> {
        let latest: BTreeMap<String, f64> = snapshots
            .iter()
            .map(|s| (s.symbol().to_string(), s.volatility()))
            .collect();

        let aggregator = VolatilityAggregator::new(params.volatility_threshold);
        let (average_volatility, volatile) = aggregator.evaluate(&latest)?;
        let rebalance_day = RebalanceClock::new(params.rebalance_day).is_rebalance_day(date);

        info!(
            average_volatility,
            threshold = params.volatility_threshold,
            contributors = latest.len(),
            volatile,
            rebalance_day,
            "Gates evaluated"
        );

        Ok(Self {
            average_volatility,
            threshold: params.volatility_threshold,
            contributors: latest.len(),
            volatile,
            rebalance_day,
        })
    }

    /// Both gates open.
    pub fn is_open(&self) -> bool {
        self.volatile && self.rebalance_day
    }

    /// Human-readable reason when closed.
    pub fn closed_reason(&self) -> Option<&'static str> {
        match (self.volatile, self.rebalance_day) {
            (true, true) => None,
            (false, true) => Some("volatility below threshold"),
            (true, false) => Some("not a rebalance day"),
            (false, false) => Some("not a rebalance day and volatility below threshold"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trend_core::types::{AssetClass, IndicatorRow, InstrumentDescriptor, TrendSignal};

    fn snapshot(symbol: &str, volatility: f64) -> InstrumentSnapshot {
        let date = NaiveDate::from_ymd_opt(2024, 3, 25).unwrap();
        InstrumentSnapshot::new(
            InstrumentDescriptor::new(symbol, "CME", "USD", AssetClass::Other),
            IndicatorRow {
                date,
                close: 100.0,
                period_return: 0.0,
                volatility,
                moving_average: 99.0,
                signal: TrendSignal::Long,
            },
            300,
        )
    }

    #[test]
    fn test_gate_combinations() {
        let params = StrategyParams::default();
        let rebalance = NaiveDate::from_ymd_opt(2024, 3, 25).unwrap();
        let other = NaiveDate::from_ymd_opt(2024, 3, 26).unwrap();
        let hot = [snapshot("A", 0.02), snapshot("B", 0.02)];
        let quiet = [snapshot("A", 0.01), snapshot("B", 0.01)];

        let open = GateDecision::evaluate(&hot, &params, rebalance).unwrap();
        assert!(open.is_open());
        assert_eq!(open.contributors, 2);
        assert_eq!(open.closed_reason(), None);

        let decision = GateDecision::evaluate(&quiet, &params, rebalance).unwrap();
        assert!(!decision.is_open());
        assert_eq!(decision.closed_reason(), Some("volatility below threshold"));

        let decision = GateDecision::evaluate(&hot, &params, other).unwrap();
        assert!(!decision.is_open());
        assert_eq!(decision.closed_reason(), Some("not a rebalance day"));

        let decision = GateDecision::evaluate(&quiet, &params, other).unwrap();
        assert!(!decision.is_open());
    }

    #[test]
    fn test_no_snapshots_is_distinct_error() {
        let params = StrategyParams::default();
        let date = NaiveDate::from_ymd_opt(2024, 3, 25).unwrap();
        assert_eq!(
            GateDecision::evaluate(&[], &params, date),
            Err(AggregationError::EmptyInput)
        );
    }
}
