//! Calendar rebalance trigger.

use chrono::{Datelike, NaiveDate};

/// Fires on one fixed day of each month.
///
/// A trigger day the month does not have (e.g. 31 in April) never fires that
/// month; there is no rollover to month end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RebalanceClock {
    trigger_day: u32,
}

impl RebalanceClock {
    pub const DEFAULT_TRIGGER_DAY: u32 = 25;

    pub fn new(trigger_day: u32) -> Self {
        Self { trigger_day }
    }

    pub fn trigger_day(&self) -> u32 {
        self.trigger_day
    }

    pub fn is_rebalance_day(&self, date: NaiveDate) -> bool {
        date.day() == self.trigger_day
    }
}

impl Default for RebalanceClock {
    fn default() -> Self {
        Self::new(Self::DEFAULT_TRIGGER_DAY)
    }
}
