//! Cycle-level errors.

use thiserror::Error;
use trend_core::error::{ConnectionError, IndicatorError, ParamsError};

/// Errors that abort a whole cycle.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CycleError {
    #[error("Session connection failed: {0}")]
    Connection(#[from] ConnectionError),

    #[error("A cycle is already in progress")]
    CycleInProgress,
}

/// Errors building a coordinator.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoordinatorError {
    #[error("Invalid strategy parameters: {0}")]
    Params(#[from] ParamsError),

    #[error("Invalid indicator configuration: {0}")]
    Indicator(#[from] IndicatorError),

    #[error("Invalid execution settings: {0}")]
    Settings(String),
}
