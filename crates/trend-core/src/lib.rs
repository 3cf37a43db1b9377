//! Core types and traits for the futures trend engine.
//!
//! This crate provides the foundational building blocks including:
//! - Market data types (Bar, PriceSeries)
//! - Instrument identity (InstrumentDescriptor, Universe)
//! - Derived indicator rows and per-instrument snapshots
//! - Contract metadata, order intents and acknowledgements
//! - The collaborator traits the engine consumes (session, market data, orders)

pub mod error;
pub mod traits;
pub mod types;

pub use error::{
    AggregationError, ConnectionError, DataFetchError, IndicatorError, MetadataFetchError,
    ParamsError, ResolutionError, SeriesError, SubmissionError, UniverseError,
};
pub use traits::*;
pub use types::*;
