//! Front-month contract resolution.
//!
//! Chooses the nearest-expiring listed contract of an instrument family from
//! whatever metadata the venue reported this cycle. Nothing is cached between
//! cycles.

mod resolver;

pub use resolver::ContractResolver;
