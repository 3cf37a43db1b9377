//! Moving average indicators.

use trend_core::traits::Indicator;

/// Simple Moving Average (SMA).
///
/// Calculates the arithmetic mean of the last N values.
#[derive(Debug, Clone)]
pub struct Sma {
    period: usize,
}

impl Sma {
    /// Create a new SMA with the specified period.
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        Self { period }
    }
}

impl Indicator for Sma {
    type Output = f64;

    fn calculate(&self, data: &[f64]) -> Vec<f64> {
        if data.len() < self.period {
            return vec![];
        }

        let period_f64 = self.period as f64;

        // Each window is averaged as offsets from its first value, so a flat
        // window averages to exactly that value.
        data.windows(self.period)
            .map(|window| shifted_mean(window, period_f64))
            .collect()
    }

    fn period(&self) -> usize {
        self.period
    }

    fn name(&self) -> &str {
        "SMA"
    }
}

/// Mean of `window`, accumulated relative to its first element.
#[inline]
pub(crate) fn shifted_mean(window: &[f64], len: f64) -> f64 {
    let base = window[0];
    base + window.iter().map(|x| x - base).sum::<f64>() / len
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sma() {
        let sma = Sma::new(3);
        let data = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let result = sma.calculate(&data);

        assert_eq!(result.len(), 3);
        assert!((result[0] - 2.0).abs() < 0.001);
        assert!((result[1] - 3.0).abs() < 0.001);
        assert!((result[2] - 4.0).abs() < 0.001);
    }

    #[test]
    fn test_sma_insufficient_data() {
        let sma = Sma::new(5);
        assert!(sma.calculate(&[1.0, 2.0, 3.0]).is_empty());
    }

    #[test]
    fn test_sma_flat_window_is_exact() {
        let sma = Sma::new(7);
        let data = vec![101.37; 30];
        assert!(sma.calculate(&data).iter().all(|&v| v == 101.37));
    }
}
