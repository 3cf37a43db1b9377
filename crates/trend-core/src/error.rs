//! Error types for the trend engine.
//!
//! Only [`ConnectionError`] is fatal to a cycle. Everything else is recorded
//! against a single instrument (or, for [`AggregationError::EmptyInput`],
//! turned into a distinct cycle status) and never escapes the cycle.

use chrono::NaiveDate;
use thiserror::Error;

/// Failure to establish a session with the venue.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConnectionError {
    #[error("Venue unreachable: {0}")]
    Unreachable(String),

    #[error("Connection rejected: {0}")]
    Rejected(String),

    #[error("Unsupported session: {0}")]
    Unsupported(String),
}

/// Failure to fetch daily bars for one instrument.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DataFetchError {
    #[error("No data available for {0}")]
    NoData(String),

    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Transport error: {0}")]
    Transport(String),
}

/// Failure to fetch listed contract metadata for one instrument.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MetadataFetchError {
    #[error("No contract metadata for {0}")]
    NotFound(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Transport error: {0}")]
    Transport(String),
}

/// Failure to submit an order for one instrument.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubmissionError {
    #[error("Order rejected: {0}")]
    Rejected(String),

    #[error("Invalid quantity: {0}")]
    InvalidQuantity(u32),

    #[error("Request timed out")]
    Timeout,

    #[error("Transport error: {0}")]
    Transport(String),
}

/// A price series that violates its construction invariants.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SeriesError {
    #[error("Price series is empty")]
    Empty,

    #[error("Duplicate bar date {0}")]
    DuplicateDate(NaiveDate),

    #[error("Bar dates out of order: {next} follows {previous}")]
    OutOfOrder { previous: NaiveDate, next: NaiveDate },

    #[error("Invalid close {close} on {date}")]
    InvalidClose { date: NaiveDate, close: f64 },
}

/// Indicator calculation errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum IndicatorError {
    #[error("Invalid series: {0}")]
    InvalidSeries(#[from] SeriesError),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Basket volatility aggregation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AggregationError {
    #[error("No instruments contributed a volatility reading")]
    EmptyInput,

    #[error("Non-finite volatility reported for {0}")]
    NonFinite(String),
}

/// Front-month resolution errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolutionError {
    #[error(
        "No tradable contract for {symbol}: {listed} listed, {malformed} malformed, {expired} expired"
    )]
    NoTradableContract {
        symbol: String,
        listed: usize,
        malformed: usize,
        expired: usize,
    },
}

/// Universe construction errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UniverseError {
    #[error("Universe contains no instruments")]
    Empty,

    #[error("Duplicate symbol in universe: {0}")]
    DuplicateSymbol(String),

    #[error("Invalid symbol: {0:?}")]
    InvalidSymbol(String),
}

/// Strategy parameter validation errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParamsError {
    #[error("{name} must be at least {min}, got {value}")]
    WindowTooSmall {
        name: &'static str,
        value: usize,
        min: usize,
    },

    #[error("Volatility threshold must be finite and non-negative, got {0}")]
    InvalidThreshold(f64),

    #[error("Rebalance day must be within 1..=31, got {0}")]
    InvalidRebalanceDay(u32),

    #[error("Order quantity must be greater than 0")]
    ZeroQuantity,
}
