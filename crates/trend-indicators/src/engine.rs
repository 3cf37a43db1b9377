//! Price series to indicator rows.

use trend_core::error::IndicatorError;
use trend_core::traits::Indicator;
use trend_core::types::{
    Bar, IndicatorRow, InstrumentDescriptor, InstrumentSnapshot, PriceSeries, StrategyParams,
    TrendSignal,
};

use crate::moving_average::Sma;
use crate::returns::simple_returns;
use crate::volatility::StdDev;

/// Derives return, realized volatility, moving average and trend signal for
/// every bar that has enough trailing history.
///
/// Stateless: computing the same series twice yields identical rows.
#[derive(Debug, Clone)]
pub struct IndicatorEngine {
    volatility: StdDev,
    average: Sma,
}

impl IndicatorEngine {
    /// Create an engine. The volatility window needs at least two returns,
    /// the moving-average window at least one close.
    pub fn new(volatility_window: usize, ma_window: usize) -> Result<Self, IndicatorError> {
        if volatility_window < 2 {
            return Err(IndicatorError::InvalidParameter(format!(
                "volatility window must be at least 2, got {}",
                volatility_window
            )));
        }
        if ma_window < 1 {
            return Err(IndicatorError::InvalidParameter(
                "moving-average window must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            volatility: StdDev::sample(volatility_window),
            average: Sma::new(ma_window),
        })
    }

    pub fn from_params(params: &StrategyParams) -> Result<Self, IndicatorError> {
        Self::new(params.volatility_window, params.ma_window)
    }

    pub fn volatility_window(&self) -> usize {
        self.volatility.period()
    }

    pub fn ma_window(&self) -> usize {
        self.average.period()
    }

    /// Index of the first bar at which every indicator is defined.
    pub fn first_defined_index(&self) -> usize {
        self.volatility_window().max(self.ma_window() - 1)
    }

    /// Compute rows for every bar with full history. An empty result means
    /// the series is too short yet, not that it is invalid.
    pub fn compute(&self, series: &PriceSeries) -> Vec<IndicatorRow> {
        let closes = series.closes();
        let returns = simple_returns(&closes);
        let volatilities = self.volatility.calculate(&returns);
        let averages = self.average.calculate(&closes);

        let vol_offset = self.volatility_window();
        let ma_offset = self.ma_window() - 1;

        series
            .bars()
            .iter()
            .enumerate()
            .skip(self.first_defined_index())
            .map(|(i, bar)| {
                let moving_average = averages[i - ma_offset];
                IndicatorRow {
                    date: bar.date,
                    close: bar.close,
                    period_return: returns[i - 1],
                    volatility: volatilities[i - vol_offset],
                    moving_average,
                    signal: TrendSignal::from_close(bar.close, moving_average),
                }
            })
            .collect()
    }

    /// Validate raw bars into a series, then compute. Only malformed input
    /// fails; a valid series too short for any row yields an empty vector.
    pub fn compute_bars(
        &self,
        symbol: &str,
        bars: Vec<Bar>,
    ) -> Result<Vec<IndicatorRow>, IndicatorError> {
        let series = PriceSeries::new(symbol, bars)?;
        Ok(self.compute(&series))
    }

    /// Latest row, if any bar has full history.
    pub fn latest(&self, series: &PriceSeries) -> Option<IndicatorRow> {
        // Only the trailing window matters for the last row.
        let needed = self.first_defined_index() + 1;
        let start = series.len().saturating_sub(needed);
        let tail = &series.bars()[start..];
        match PriceSeries::new(series.symbol(), tail.to_vec()) {
            Ok(tail) => self.compute(&tail).pop(),
            Err(_) => None,
        }
    }

    /// Snapshot of an instrument at its latest bar.
    pub fn snapshot(
        &self,
        instrument: &InstrumentDescriptor,
        series: &PriceSeries,
    ) -> Option<InstrumentSnapshot> {
        self.latest(series)
            .map(|row| InstrumentSnapshot::new(instrument.clone(), row, series.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Days, NaiveDate};
    use trend_core::error::SeriesError;

    fn series(closes: &[f64]) -> PriceSeries {
        let start = NaiveDate::from_ymd_opt(2023, 1, 2).unwrap();
        let bars = closes
            .iter()
            .enumerate()
            .map(|(i, &c)| Bar::from_close(start + Days::new(i as u64), c))
            .collect();
        PriceSeries::new("TEST", bars).unwrap()
    }

    #[test]
    fn test_rejects_bad_windows() {
        assert!(IndicatorEngine::new(1, 10).is_err());
        assert!(IndicatorEngine::new(2, 0).is_err());
        assert!(IndicatorEngine::new(2, 1).is_ok());
    }

    #[test]
    fn test_row_alignment() {
        // vol window 3 needs 3 returns (index 3); ma window 3 needs index 2.
        let engine = IndicatorEngine::new(3, 3).unwrap();
        let closes = [100.0, 102.0, 101.0, 104.0, 103.0, 107.0];
        let rows = engine.compute(&series(&closes));

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].close, 104.0);
        assert!((rows[0].period_return - (104.0 / 101.0 - 1.0)).abs() < 1e-12);
        assert!((rows[0].moving_average - (102.0 + 101.0 + 104.0) / 3.0).abs() < 1e-9);

        let r: Vec<f64> = [102.0 / 100.0, 101.0 / 102.0, 104.0 / 101.0]
            .iter()
            .map(|x| x - 1.0)
            .collect();
        let mean = r.iter().sum::<f64>() / 3.0;
        let var = r.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / 2.0;
        assert!((rows[0].volatility - var.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_ma_window_dominates() {
        let engine = IndicatorEngine::new(2, 5).unwrap();
        let rows = engine.compute(&series(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]));
        // first defined index = max(2, 4) = 4
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].close, 5.0);
    }

    #[test]
    fn test_short_series_yields_empty() {
        let engine = IndicatorEngine::new(20, 200).unwrap();
        assert!(engine.compute(&series(&[100.0; 150])).is_empty());
        assert!(engine.latest(&series(&[100.0; 150])).is_none());
    }

    #[test]
    fn test_constant_series() {
        let engine = IndicatorEngine::new(5, 10).unwrap();
        let rows = engine.compute(&series(&[250.25; 40]));

        assert!(!rows.is_empty());
        for row in rows {
            assert_eq!(row.volatility, 0.0);
            assert_eq!(row.moving_average, 250.25);
            assert_eq!(row.signal, TrendSignal::Short);
        }
    }

    #[test]
    fn test_signal_follows_trend() {
        let engine = IndicatorEngine::new(3, 5).unwrap();

        let rising: Vec<f64> = (0..20).map(|i| 100.0 + i as f64).collect();
        assert_eq!(engine.latest(&series(&rising)).unwrap().signal, TrendSignal::Long);

        let falling: Vec<f64> = (0..20).map(|i| 100.0 - i as f64).collect();
        assert_eq!(engine.latest(&series(&falling)).unwrap().signal, TrendSignal::Short);
    }

    #[test]
    fn test_latest_matches_full_compute() {
        let engine = IndicatorEngine::new(4, 6).unwrap();
        let closes: Vec<f64> = (0..50).map(|i| 100.0 + (i as f64 * 0.7).sin() * 5.0).collect();
        let s = series(&closes);

        let full = engine.compute(&s);
        assert_eq!(engine.latest(&s), full.last().copied());
    }

    #[test]
    fn test_compute_bars_short_history_is_empty() {
        let engine = IndicatorEngine::new(3, 5).unwrap();
        let start = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let bars: Vec<Bar> = (0..4)
            .map(|i| Bar::from_close(start + Days::new(i), 100.0 + i as f64))
            .collect();

        assert_eq!(engine.compute_bars("ZC", bars.clone()), Ok(vec![]));

        let mut longer = bars;
        longer.push(Bar::from_close(start + Days::new(4), 104.0));
        assert_eq!(engine.compute_bars("ZC", longer).unwrap().len(), 1);
    }

    #[test]
    fn test_compute_bars_rejects_malformed() {
        let engine = IndicatorEngine::new(2, 2).unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();

        assert_eq!(
            engine.compute_bars("ZC", vec![]),
            Err(IndicatorError::InvalidSeries(SeriesError::Empty))
        );
        assert_eq!(
            engine.compute_bars(
                "ZC",
                vec![Bar::from_close(date, 1.0), Bar::from_close(date, 2.0)]
            ),
            Err(IndicatorError::InvalidSeries(SeriesError::DuplicateDate(date)))
        );
    }
}
