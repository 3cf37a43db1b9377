//! Derived indicator rows and per-instrument snapshots.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::{InstrumentDescriptor, Side};

/// Directional bias derived from close versus its moving average.
///
/// There is no neutral state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendSignal {
    /// `+1`
    Long,
    /// `-1`
    Short,
}

impl TrendSignal {
    /// `Long` only when close is strictly above the average.
    #[inline]
    pub fn from_close(close: f64, moving_average: f64) -> Self {
        if close > moving_average {
            TrendSignal::Long
        } else {
            TrendSignal::Short
        }
    }

    /// Numeric form, `+1` or `-1`.
    pub fn value(&self) -> i8 {
        match self {
            TrendSignal::Long => 1,
            TrendSignal::Short => -1,
        }
    }

    /// Order direction for this signal.
    pub fn side(&self) -> Side {
        match self {
            TrendSignal::Long => Side::Buy,
            TrendSignal::Short => Side::Sell,
        }
    }
}

impl fmt::Display for TrendSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:+}", self.value())
    }
}

/// Indicator values at one bar, emitted only once every value is defined.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndicatorRow {
    /// Bar date
    pub date: NaiveDate,
    /// Close price
    pub close: f64,
    /// One-period simple return ending at this bar
    pub period_return: f64,
    /// Sample standard deviation of trailing returns
    pub volatility: f64,
    /// Trailing arithmetic mean of closes
    pub moving_average: f64,
    /// Trend signal
    pub signal: TrendSignal,
}

/// Latest indicator row of one instrument for the current cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstrumentSnapshot {
    pub instrument: InstrumentDescriptor,
    pub latest: IndicatorRow,
    /// Number of bars the row was derived from
    pub bars_used: usize,
}

impl InstrumentSnapshot {
    pub fn new(instrument: InstrumentDescriptor, latest: IndicatorRow, bars_used: usize) -> Self {
        Self {
            instrument,
            latest,
            bars_used,
        }
    }

    pub fn symbol(&self) -> &str {
        &self.instrument.symbol
    }

    pub fn volatility(&self) -> f64 {
        self.latest.volatility
    }

    pub fn signal(&self) -> TrendSignal {
        self.latest.signal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signal_from_close() {
        assert_eq!(TrendSignal::from_close(101.0, 100.0), TrendSignal::Long);
        assert_eq!(TrendSignal::from_close(99.0, 100.0), TrendSignal::Short);
        assert_eq!(TrendSignal::from_close(100.0, 100.0), TrendSignal::Short);
    }

    #[test]
    fn test_signal_side_and_display() {
        assert_eq!(TrendSignal::Long.side(), Side::Buy);
        assert_eq!(TrendSignal::Short.side(), Side::Sell);
        assert_eq!(TrendSignal::Long.to_string(), "+1");
        assert_eq!(TrendSignal::Short.to_string(), "-1");
    }
}
