//! The seam between the calculation engines and their reference data.

use rust_decimal::Decimal;

use crate::error::EngineResult;

use super::types::TaxTables;

/// The 50 US state codes the engine recognises. Territories are not supported.
pub const US_STATE_CODES: [&str; 50] = [
    "AL", "AK", "AZ", "AR", "CA", "CO", "CT", "DE", "FL", "GA", "HI", "ID", "IL", "IN", "IA",
    "KS", "KY", "LA", "ME", "MD", "MA", "MI", "MN", "MS", "MO", "MT", "NE", "NV", "NH", "NJ",
    "NM", "NY", "NC", "ND", "OH", "OK", "OR", "PA", "RI", "SC", "SD", "TN", "TX", "UT", "VT",
    "VA", "WA", "WV", "WI", "WY",
];

/// Supplies jurisdiction constants to the tax calculator and comparison engine.
///
/// Implementations must be read-only and safe to share between threads, since
/// comparisons evaluate contracts in parallel against the same provider.
/// Lookups fail with [`EngineError::JurisdictionNotFound`](crate::error::EngineError::JurisdictionNotFound)
/// for anything other than one of the 50 state codes.
pub trait LocationDataProvider: Send + Sync {
    /// Returns the federal and state tables for taxing income earned in `state`.
    fn tax_tables(&self, state: &str) -> EngineResult<TaxTables>;

    /// Returns the cost-of-living index (100 = national average) for a state,
    /// or for a city within it when the city has its own index.
    fn cost_of_living_index(&self, state: &str, city: Option<&str>) -> EngineResult<Decimal>;
}

/// Normalises a state code for lookup, returning `None` when it is not a US state.
pub fn normalize_state_code(code: &str) -> Option<String> {
    let upper = code.trim().to_ascii_uppercase();
    US_STATE_CODES.contains(&upper.as_str()).then_some(upper)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_codes_are_unique() {
        let mut codes = US_STATE_CODES.to_vec();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), 50);
    }

    #[test]
    fn test_normalize_accepts_lowercase() {
        assert_eq!(normalize_state_code("ca"), Some("CA".to_string()));
        assert_eq!(normalize_state_code(" tx "), Some("TX".to_string()));
    }

    #[test]
    fn test_normalize_rejects_territories_and_unknown() {
        assert_eq!(normalize_state_code("PR"), None);
        assert_eq!(normalize_state_code("DC"), None);
        assert_eq!(normalize_state_code("ZZ"), None);
    }
}
