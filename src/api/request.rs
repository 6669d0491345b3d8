//! Request types for the locum calculation API.
//!
//! Contract and paycheck calculations take the domain inputs directly as
//! their bodies; only the comparison and location endpoints need their own
//! request shapes.

use serde::{Deserialize, Serialize};

use crate::models::{ComparisonOptions, ContractInput};

/// Request body for the `/contracts/compare` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompareRequest {
    /// The contracts to compare (at least two).
    pub contracts: Vec<ContractInput>,
    /// Rank "best overall" by cost-of-living adjusted net pay.
    #[serde(default)]
    pub adjust_for_cost_of_living: bool,
}

impl CompareRequest {
    /// Returns the comparison options carried by this request.
    pub fn options(&self) -> ComparisonOptions {
        ComparisonOptions {
            adjust_for_cost_of_living: self.adjust_for_cost_of_living,
        }
    }
}

/// Query parameters for the `/locations/:state` endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LocationQuery {
    /// City for a city-level cost-of-living index.
    #[serde(default)]
    pub city: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compare_request_defaults_to_unadjusted() {
        let request: CompareRequest = serde_json::from_str(r#"{ "contracts": [] }"#).unwrap();
        assert!(request.contracts.is_empty());
        assert!(!request.options().adjust_for_cost_of_living);
    }

    #[test]
    fn test_compare_request_with_adjustment() {
        let request: CompareRequest = serde_json::from_str(
            r#"{ "contracts": [], "adjust_for_cost_of_living": true }"#,
        )
        .unwrap();
        assert!(request.options().adjust_for_cost_of_living);
    }
}
