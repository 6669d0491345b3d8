//! Multi-contract comparison models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::contract_result::ContractCalculationResult;

/// Options controlling how contracts are ranked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComparisonOptions {
    /// Rank "best overall" by net pay adjusted for local cost of living.
    pub adjust_for_cost_of_living: bool,
}

/// One contract's result within a comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparedContract {
    /// Position in the submitted list.
    pub index: usize,
    /// Label identifying the contract.
    pub label: String,
    /// Cost-of-living index of the work location.
    pub cost_of_living_index: Decimal,
    /// Net pay scaled to a national-average cost of living.
    pub adjusted_net_pay: Decimal,
    /// Full calculation result.
    pub result: ContractCalculationResult,
}

/// The winner of one ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BestPick {
    /// Position of the winning contract in the submitted list.
    pub index: usize,
    /// Label of the winning contract.
    pub label: String,
    /// The value it won with.
    pub value: Decimal,
}

/// Winners of each ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BestContracts {
    /// Highest net pay, cost-of-living adjusted when enabled.
    pub overall: BestPick,
    /// Highest effective hourly rate.
    pub hourly_rate: BestPick,
    /// Highest raw net pay.
    pub net_pay: BestPick,
    /// Highest stipends plus retirement contribution.
    pub benefits: BestPick,
}

/// The range of one metric across all contracts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Spread {
    /// Largest value.
    pub highest: Decimal,
    /// Smallest value.
    pub lowest: Decimal,
    /// `highest - lowest`.
    pub difference: Decimal,
    /// Difference as a percentage of `lowest`; absent when `lowest` is not positive.
    pub percentage_difference: Option<Decimal>,
}

/// Spreads for the compared metrics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DifferenceMetrics {
    /// Net pay.
    pub net_pay: Spread,
    /// Gross pay.
    pub gross_pay: Spread,
    /// Effective hourly rate.
    pub effective_hourly_rate: Spread,
    /// Benefits value.
    pub benefits_value: Spread,
}

/// The complete result of comparing two or more contracts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonResult {
    /// Per-contract results, in submitted order.
    pub contracts: Vec<ComparedContract>,
    /// Winners of each ranking.
    pub best: BestContracts,
    /// Spreads across all contracts.
    pub differences: DifferenceMetrics,
    /// Plain-language recommendations.
    pub recommendations: Vec<String>,
    /// Whether "best overall" was cost-of-living adjusted.
    pub adjusted_for_cost_of_living: bool,
}
