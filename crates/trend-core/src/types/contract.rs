//! Listed contract metadata and the resolved tradable contract.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One listed contract as reported by a metadata source.
///
/// Nothing here is validated; the expiry token in particular may be empty or
/// malformed and is only interpreted during resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawContractMetadata {
    /// Venue-assigned contract id
    pub contract_id: String,
    /// Family symbol code
    pub symbol: String,
    /// Venue-local symbol, e.g. `ZCH4`
    #[serde(default)]
    pub local_symbol: String,
    /// Listing venue
    pub exchange: String,
    /// Settlement currency
    pub currency: String,
    /// Last trade date or contract month (`YYYYMM` or `YYYYMMDD`)
    #[serde(default)]
    pub expiry: String,
    /// Contract multiplier, if reported
    #[serde(default)]
    pub multiplier: Option<f64>,
}

/// Normalized contract-month or last-trade-date token.
///
/// Ordering is lexicographic on the normalized token, which is chronological
/// for the accepted `YYYYMM` and `YYYYMMDD` forms.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ExpiryToken {
    token: String,
    year: i32,
    month: u32,
    day: Option<u32>,
}

impl ExpiryToken {
    /// Minimum accepted token length (`YYYYMM`).
    pub const MIN_LEN: usize = 6;

    /// Parse a token, returning `None` for anything that does not resolve to
    /// a calendar month (or calendar date for the 8-digit form).
    pub fn parse(raw: &str) -> Option<Self> {
        let token = raw.trim();
        if !matches!(token.len(), 6 | 8) || !token.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }

        let year: i32 = token[0..4].parse().ok()?;
        let month: u32 = token[4..6].parse().ok()?;
        if year == 0 || !(1..=12).contains(&month) {
            return None;
        }

        let day = if token.len() == 8 {
            let day: u32 = token[6..8].parse().ok()?;
            NaiveDate::from_ymd_opt(year, month, day)?;
            Some(day)
        } else {
            None
        };

        Some(Self {
            token: token.to_string(),
            year,
            month,
            day,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.token
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// Day of the last trade date, when the token carries one.
    pub fn day(&self) -> Option<u32> {
        self.day
    }

    /// Whether the contract has already expired on `as_of`.
    ///
    /// A dated token expires after its day; a month-only token expires once
    /// its month has passed.
    pub fn is_expired(&self, as_of: NaiveDate) -> bool {
        match self.day {
            Some(day) => match NaiveDate::from_ymd_opt(self.year, self.month, day) {
                Some(last_trade) => last_trade < as_of,
                None => true,
            },
            None => (self.year, self.month) < (as_of.year(), as_of.month()),
        }
    }
}

impl fmt::Display for ExpiryToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.token)
    }
}

impl TryFrom<String> for ExpiryToken {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value).ok_or_else(|| format!("Invalid expiry token: {:?}", value))
    }
}

impl From<ExpiryToken> for String {
    fn from(value: ExpiryToken) -> Self {
        value.token
    }
}

/// A specific dated contract selected for trading this cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradableContract {
    pub symbol: String,
    pub contract_id: String,
    pub local_symbol: String,
    pub exchange: String,
    pub currency: String,
    pub expiry: ExpiryToken,
    pub multiplier: Option<f64>,
}

impl TradableContract {
    /// Build from metadata whose expiry has already been parsed.
    pub fn from_metadata(meta: &RawContractMetadata, expiry: ExpiryToken) -> Self {
        Self {
            symbol: meta.symbol.clone(),
            contract_id: meta.contract_id.clone(),
            local_symbol: meta.local_symbol.clone(),
            exchange: meta.exchange.clone(),
            currency: meta.currency.clone(),
            expiry,
            multiplier: meta.multiplier,
        }
    }
}

impl fmt::Display for TradableContract {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.local_symbol.is_empty() {
            write!(f, "{} {}", self.symbol, self.expiry)
        } else {
            write!(f, "{} {} ({})", self.symbol, self.expiry, self.local_symbol)
        }
    }
}
