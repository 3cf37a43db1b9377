//! Basket volatility and calendar gates.
//!
//! Orders are only submitted when both gates are open: the basket's average
//! realized volatility is above a threshold, and today is the rebalance day.
//! The two checks are independent of each other.

mod aggregator;
mod clock;
mod decision;

pub use aggregator::VolatilityAggregator;
pub use clock::RebalanceClock;
pub use decision::GateDecision;
