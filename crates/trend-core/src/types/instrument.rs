//! Instrument families and the validated trading universe.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use crate::error::UniverseError;

/// Category tag of an instrument family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum AssetClass {
    Grains,
    #[serde(alias = "Cattle")]
    Livestock,
    Energy,
    Metals,
    Softs,
    #[serde(alias = "Treasurys", alias = "Treasuries")]
    Rates,
    #[serde(alias = "Currencys")]
    Currencies,
    Equity,
    #[default]
    Other,
}

impl fmt::Display for AssetClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AssetClass::Grains => "Grains",
            AssetClass::Livestock => "Livestock",
            AssetClass::Energy => "Energy",
            AssetClass::Metals => "Metals",
            AssetClass::Softs => "Softs",
            AssetClass::Rates => "Rates",
            AssetClass::Currencies => "Currencies",
            AssetClass::Equity => "Equity",
            AssetClass::Other => "Other",
        };
        write!(f, "{}", s)
    }
}

/// Identity of a tradable futures family, e.g. corn on CBOT.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InstrumentDescriptor {
    /// Symbol code (`ZC`, `CL`, ...)
    pub symbol: String,
    /// Listing venue
    pub exchange: String,
    /// Settlement currency
    pub currency: String,
    /// Category tag
    #[serde(default)]
    pub category: AssetClass,
}

impl InstrumentDescriptor {
    pub fn new(
        symbol: impl Into<String>,
        exchange: impl Into<String>,
        currency: impl Into<String>,
        category: AssetClass,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            exchange: exchange.into(),
            currency: currency.into(),
            category,
        }
    }
}

impl fmt::Display for InstrumentDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{} ({})", self.symbol, self.exchange, self.currency)
    }
}

/// Set of instruments traded each cycle, with unique symbol codes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Universe {
    instruments: Vec<InstrumentDescriptor>,
}

impl Universe {
    /// Validate and build a universe. Order is preserved.
    pub fn new(instruments: Vec<InstrumentDescriptor>) -> Result<Self, UniverseError> {
        if instruments.is_empty() {
            return Err(UniverseError::Empty);
        }

        let mut seen = HashSet::with_capacity(instruments.len());
        for instrument in &instruments {
            let symbol = instrument.symbol.trim();
            if symbol.is_empty() || symbol != instrument.symbol {
                return Err(UniverseError::InvalidSymbol(instrument.symbol.clone()));
            }
            if !seen.insert(symbol) {
                return Err(UniverseError::DuplicateSymbol(instrument.symbol.clone()));
            }
        }

        Ok(Self { instruments })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.instruments.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.instruments.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &InstrumentDescriptor> {
        self.instruments.iter()
    }

    /// Look up an instrument by symbol code.
    pub fn symbols(&self) -> Vec<&str> {
        self.instruments.iter().map(|i| i.symbol.as_str()).collect()
    }

    pub fn instruments(&self) -> &[InstrumentDescriptor] {
        &self.instruments
    }
}

impl<'a> IntoIterator for &'a Universe {
    type Item = &'a InstrumentDescriptor;
    type IntoIter = std::slice::Iter<'a, InstrumentDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.instruments.iter()
    }
}
