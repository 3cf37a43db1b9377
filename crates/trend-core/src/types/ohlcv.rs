//! Daily bars and the per-cycle price series built from them.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::SeriesError;

/// One daily OHLCV observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// Trading date
    pub date: NaiveDate,
    /// Opening price
    pub open: f64,
    /// Highest price
    pub high: f64,
    /// Lowest price
    pub low: f64,
    /// Closing price
    pub close: f64,
    /// Trading volume
    pub volume: f64,
}

impl Bar {
    /// Create a new bar.
    pub fn new(date: NaiveDate, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            date,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Create a bar carrying only a close price.
    pub fn from_close(date: NaiveDate, close: f64) -> Self {
        Self::new(date, close, close, close, close, 0.0)
    }
}

/// Validated, date-ordered close history for one instrument.
///
/// A series is never empty, its dates strictly increase and every close is a
/// finite positive number. Calendar gaps are allowed.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    symbol: String,
    bars: Vec<Bar>,
}

impl PriceSeries {
    /// Build a series, rejecting empty, duplicate-dated, unordered or
    /// non-positive input.
    pub fn new(symbol: impl Into<String>, bars: Vec<Bar>) -> Result<Self, SeriesError> {
        if bars.is_empty() {
            return Err(SeriesError::Empty);
        }

        for bar in &bars {
            if !bar.close.is_finite() || bar.close <= 0.0 {
                return Err(SeriesError::InvalidClose {
                    date: bar.date,
                    close: bar.close,
                });
            }
        }

        for pair in bars.windows(2) {
            let (previous, next) = (pair[0].date, pair[1].date);
            if next == previous {
                return Err(SeriesError::DuplicateDate(next));
            }
            if next < previous {
                return Err(SeriesError::OutOfOrder { previous, next });
            }
        }

        Ok(Self {
            symbol: symbol.into(),
            bars,
        })
    }

    /// Symbol of the instrument family this series belongs to.
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Number of bars.
    #[inline]
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// Always false for a constructed series.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// All bars, oldest first.
    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    /// Extract close prices as a vector.
    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }
}
