//! Strategy parameters passed explicitly into the indicator and gate stages.

use serde::{Deserialize, Serialize};

use super::{BarSize, Lookback};
use crate::error::ParamsError;

/// Tunables of the volatility-gated trend strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategyParams {
    /// History requested per instrument
    pub lookback: Lookback,
    /// Bar size requested per instrument
    pub bar_size: BarSize,
    /// Returns in the realized-volatility window
    pub volatility_window: usize,
    /// Closes in the moving-average window
    pub ma_window: usize,
    /// Basket volatility must exceed this to trade
    pub volatility_threshold: f64,
    /// Day of month on which orders may be submitted
    pub rebalance_day: u32,
    /// Contracts per order
    pub order_quantity: u32,
}

impl Default for StrategyParams {
    fn default() -> Self {
        Self {
            lookback: Lookback::default(),
            bar_size: BarSize::Daily,
            volatility_window: 20,
            ma_window: 200,
            volatility_threshold: 0.015,
            rebalance_day: 25,
            order_quantity: 1,
        }
    }
}

impl StrategyParams {
    /// Bars needed before the first indicator row exists.
    pub fn required_bars(&self) -> usize {
        self.volatility_window.max(self.ma_window.saturating_sub(1)) + 1
    }

    pub fn validate(&self) -> Result<(), ParamsError> {
        if self.volatility_window < 2 {
            return Err(ParamsError::WindowTooSmall {
                name: "volatility_window",
                value: self.volatility_window,
                min: 2,
            });
        }
        if self.ma_window < 1 {
            return Err(ParamsError::WindowTooSmall {
                name: "ma_window",
                value: self.ma_window,
                min: 1,
            });
        }
        if !self.volatility_threshold.is_finite() || self.volatility_threshold < 0.0 {
            return Err(ParamsError::InvalidThreshold(self.volatility_threshold));
        }
        if !(1..=31).contains(&self.rebalance_day) {
            return Err(ParamsError::InvalidRebalanceDay(self.rebalance_day));
        }
        if self.order_quantity == 0 {
            return Err(ParamsError::ZeroQuantity);
        }
        Ok(())
    }
}
