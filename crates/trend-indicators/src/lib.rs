//! Trend and realized volatility indicators.
//!
//! This crate provides:
//! - Simple moving average and rolling standard deviation
//! - One-period simple returns
//! - [`IndicatorEngine`], which turns a price series into indicator rows
//!   carrying the trend signal and realized volatility

pub mod engine;
pub mod moving_average;
pub mod returns;
pub mod volatility;

pub use engine::IndicatorEngine;
pub use moving_average::Sma;
pub use returns::simple_returns;
pub use volatility::StdDev;
