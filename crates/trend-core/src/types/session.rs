//! Venue session handle and trading mode.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Paper or live trading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TradingMode {
    #[default]
    Paper,
    Live,
}

impl fmt::Display for TradingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradingMode::Paper => write!(f, "paper"),
            TradingMode::Live => write!(f, "live"),
        }
    }
}

impl FromStr for TradingMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "paper" => Ok(TradingMode::Paper),
            "live" => Ok(TradingMode::Live),
            _ => Err(format!("Invalid trading mode: {}", s)),
        }
    }
}

/// An established connection to a market-data/brokerage venue.
///
/// Exactly one session is active per cycle. Collaborators receive it by
/// reference and must not assume they may use it concurrently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub id: Uuid,
    pub mode: TradingMode,
    pub venue: String,
    pub connected_at: DateTime<Utc>,
}

impl Session {
    pub fn new(mode: TradingMode, venue: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            mode,
            venue: venue.into(),
            connected_at: Utc::now(),
        }
    }
}
