use chrono::NaiveDate;
use tracing::debug;
use trend_core::error::ResolutionError;
use trend_core::types::{ExpiryToken, InstrumentDescriptor, RawContractMetadata, TradableContract};

/// Selects the front-month contract from listed metadata.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContractResolver {
    as_of: Option<NaiveDate>,
}

impl ContractResolver {
    /// Resolver that accepts every well-formed expiry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Also discard contracts already expired on `date`.
    pub fn as_of(date: NaiveDate) -> Self {
        Self { as_of: Some(date) }
    }

    /// Resolve the earliest-expiring valid contract.
    ///
    /// Candidates with the same earliest token resolve to the first one in
    /// input order.
    pub fn resolve(
        &self,
        descriptor: &InstrumentDescriptor,
        available: &[RawContractMetadata],
    ) -> Result<TradableContract, ResolutionError> {
        let mut malformed = 0;
        let mut expired = 0;

        let mut candidates: Vec<(ExpiryToken, &RawContractMetadata)> = available
            .iter()
            .filter_map(|meta| {
                let Some(token) = ExpiryToken::parse(&meta.expiry) else {
                    malformed += 1;
                    return None;
                };
                if self.as_of.is_some_and(|date| token.is_expired(date)) {
                    expired += 1;
                    return None;
                }
                Some((token, meta))
            })
            .collect();

        // sort_by is stable
        candidates.sort_by(|a, b| a.0.cmp(&b.0));

        let Some((expiry, meta)) = candidates.into_iter().next() else {
            return Err(ResolutionError::NoTradableContract {
                symbol: descriptor.symbol.clone(),
                listed: available.len(),
                malformed,
                expired,
            });
        };

        debug!(
            symbol = %descriptor.symbol,
            expiry = %expiry,
            contract_id = %meta.contract_id,
            listed = available.len(),
            malformed,
            expired,
            "Resolved front-month contract"
        );

        Ok(TradableContract::from_metadata(meta, expiry))
    }
}
