//! Bar size and history lookback definitions for market data requests.

use chrono::{Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Size of the bars requested from a market data source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum BarSize {
    /// Daily bars
    #[serde(rename = "1 day", alias = "1d", alias = "daily")]
    #[default]
    Daily,
    /// Weekly bars
    #[serde(rename = "1 week", alias = "1w", alias = "weekly")]
    Weekly,
}

impl fmt::Display for BarSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BarSize::Daily => "1 day",
            BarSize::Weekly => "1 week",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for BarSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "1d" | "1 day" | "daily" => Ok(BarSize::Daily),
            "1w" | "1 week" | "weekly" => Ok(BarSize::Weekly),
            _ => Err(format!("Invalid bar size: {}", s)),
        }
    }
}

/// Unit of a [`Lookback`] duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LookbackUnit {
    Days,
    Weeks,
    Months,
    Years,
}

impl LookbackUnit {
    fn code(&self) -> char {
        match self {
            LookbackUnit::Days => 'D',
            LookbackUnit::Weeks => 'W',
            LookbackUnit::Months => 'M',
            LookbackUnit::Years => 'Y',
        }
    }
}

/// How much history to request, e.g. `"2 Y"` or `"300 D"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Lookback {
    pub amount: u32,
    pub unit: LookbackUnit,
}

impl Lookback {
    pub fn new(amount: u32, unit: LookbackUnit) -> Self {
        Self { amount, unit }
    }

    /// First date covered when the window ends on `end`.
    pub fn start_from(&self, end: NaiveDate) -> NaiveDate {
        let amount = self.amount;
        let start = match self.unit {
            LookbackUnit::Days => end.checked_sub_days(Days::new(u64::from(amount))),
            LookbackUnit::Weeks => end.checked_sub_days(Days::new(u64::from(amount) * 7)),
            LookbackUnit::Months => end.checked_sub_months(Months::new(amount)),
            LookbackUnit::Years => end.checked_sub_months(Months::new(amount.saturating_mul(12))),
        };
        start.unwrap_or(NaiveDate::MIN)
    }
}

impl Default for Lookback {
    fn default() -> Self {
        Self::new(2, LookbackUnit::Years)
    }
}

impl fmt::Display for Lookback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.amount, self.unit.code())
    }
}

impl FromStr for Lookback {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split_whitespace();
        let (Some(amount), Some(unit), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(format!("Invalid lookback: {}", s));
        };

        let amount: u32 = amount
            .parse()
            .map_err(|_| format!("Invalid lookback amount: {}", s))?;
        if amount == 0 {
            return Err(format!("Lookback must be positive: {}", s));
        }

        let unit = match unit.to_uppercase().as_str() {
            "D" => LookbackUnit::Days,
            "W" => LookbackUnit::Weeks,
            "M" => LookbackUnit::Months,
            "Y" => LookbackUnit::Years,
            _ => return Err(format!("Invalid lookback unit: {}", s)),
        };

        Ok(Self::new(amount, unit))
    }
}

impl TryFrom<String> for Lookback {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Lookback> for String {
    fn from(value: Lookback) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bar_size_parse() {
        assert_eq!(BarSize::from_str("1 day").unwrap(), BarSize::Daily);
        assert_eq!(BarSize::from_str("1d").unwrap(), BarSize::Daily);
        assert_eq!(BarSize::from_str("weekly").unwrap(), BarSize::Weekly);
        assert!(BarSize::from_str("1 hour").is_err());
        assert!(BarSize::from_str("3 days").is_err());
    }

    #[test]
    fn test_bar_size_display() {
        assert_eq!(BarSize::Daily.to_string(), "1 day");
        assert_eq!(BarSize::Weekly.to_string(), "1 week");
    }

    #[test]
    fn test_lookback_parse() {
        assert_eq!(
            Lookback::from_str("2 Y").unwrap(),
            Lookback::new(2, LookbackUnit::Years)
        );
        assert_eq!(
            Lookback::from_str("300 d").unwrap(),
            Lookback::new(300, LookbackUnit::Days)
        );
        assert!(Lookback::from_str("2Y").is_err());
        assert!(Lookback::from_str("0 Y").is_err());
        assert!(Lookback::from_str("2 Q").is_err());
    }

    #[test]
    fn test_lookback_start() {
        let end = NaiveDate::from_ymd_opt(2024, 3, 25).unwrap();
        assert_eq!(
            Lookback::new(2, LookbackUnit::Years).start_from(end),
            NaiveDate::from_ymd_opt(2022, 3, 25).unwrap()
        );
        assert_eq!(
            Lookback::new(2, LookbackUnit::Weeks).start_from(end),
            NaiveDate::from_ymd_opt(2024, 3, 11).unwrap()
        );
    }

    #[test]
    fn test_lookback_serde_string() {
        let json = serde_json::to_string(&Lookback::default()).unwrap();
        assert_eq!(json, "\"2 Y\"");
        let back: Lookback = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Lookback::default());
    }
}
