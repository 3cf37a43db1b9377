//! Basket-level volatility aggregation.

use std::collections::BTreeMap;
use trend_core::error::AggregationError;

/// Averages realized volatility across the instruments that produced a
/// snapshot this cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VolatilityAggregator {
    threshold: f64,
}

impl VolatilityAggregator {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Unweighted mean over the given instruments.
    ///
    /// Instruments without data are simply absent from the map, so they
    /// count in neither numerator nor denominator.
    pub fn aggregate(latest: &BTreeMap<String, f64>) -> Result<f64, AggregationError> {
        if latest.is_empty() {
            return Err(AggregationError::EmptyInput);
        }

        if let Some((symbol, _)) = latest.iter().find(|(_, v)| !v.is_finite()) {
            return Err(AggregationError::NonFinite(symbol.clone()));
        }

        Ok(latest.values().sum::<f64>() / latest.len() as f64)
    }

    /// Strictly above the threshold.
    #[inline]
    pub fn is_volatile_regime(average: f64, threshold: f64) -> bool {
        average > threshold
    }

    /// Aggregate and compare against this aggregator's threshold.
    pub fn evaluate(&self, latest: &BTreeMap<String, f64>) -> Result<(f64, bool), AggregationError> {
        let average = Self::aggregate(latest)?;
        Ok((average, Self::is_volatile_regime(average, self.threshold)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vols(entries: &[(&str, f64)]) -> BTreeMap<String, f64> {
        entries.iter().map(|(s, v)| (s.to_string(), *v)).collect()
    }

    #[test]
    fn test_aggregate_mean() {
        let avg = VolatilityAggregator::aggregate(&vols(&[("A", 0.01), ("B", 0.02), ("C", 0.03)]))
            .unwrap();
        assert!((avg - 0.02).abs() < 1e-12);
    }

    #[test]
    fn test_aggregate_empty_fails() {
        assert_eq!(
            VolatilityAggregator::aggregate(&BTreeMap::new()),
            Err(AggregationError::EmptyInput)
        );
    }

    #[test]
    fn test_aggregate_rejects_non_finite() {
        assert_eq!(
            VolatilityAggregator::aggregate(&vols(&[("A", 0.01), ("B", f64::NAN)])),
            Err(AggregationError::NonFinite("B".to_string()))
        );
    }

    #[test]
    fn test_regime_is_strict() {
        assert!(VolatilityAggregator::is_volatile_regime(0.0151, 0.015));
        assert!(!VolatilityAggregator::is_volatile_regime(0.015, 0.015));
        assert!(!VolatilityAggregator::is_volatile_regime(0.01, 0.015));
    }

    #[test]
    fn test_evaluate() {
        let aggregator = VolatilityAggregator::new(0.015);
        let (avg, volatile) = aggregator.evaluate(&vols(&[("A", 0.02), ("B", 0.02)])).unwrap();
        assert!((avg - 0.02).abs() < 1e-12);
        assert!(volatile);
    }
}
