//! Volatility indicators.

use trend_core::traits::Indicator;

use crate::moving_average::shifted_mean;

/// Rolling sample standard deviation (N - 1 denominator).
#[derive(Debug, Clone)]
pub struct StdDev {
    period: usize,
}

impl StdDev {
    pub fn sample(period: usize) -> Self {
        assert!(period > 1, "Period must be greater than 1");
        Self { period }
    }
}

impl Indicator for StdDev {
    type Output = f64;

    fn calculate(&self, data: &[f64]) -> Vec<f64> {
        if data.len() < self.period {
            return vec![];
        }

        let period_f64 = self.period as f64;
        let divisor = (self.period - 1) as f64;
        let mut result = Vec::with_capacity(data.len() - self.period + 1);

        for window in data.windows(self.period) {
            let mean = shifted_mean(window, period_f64);
            let variance: f64 = window.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / divisor;
            result.push(variance.sqrt());
        }

        result
    }

    fn period(&self) -> usize {
        self.period
    }

    fn name(&self) -> &str {
        "StdDev"
    }
}
