//! Core data models for the calculation engine.
//!
//! This module contains the contract and paycheck inputs, their validation,
//! and the result types produced by the engines.

mod audit;
mod comparison;
mod contract;
mod contract_result;
mod paycheck;
mod paycheck_result;
mod tax;
mod validation;

pub use audit::{AuditStep, AuditTrace, AuditWarning};
pub use comparison::{
    BestContracts, BestPick, ComparedContract, ComparisonOptions, ComparisonResult,
    DifferenceMetrics, Spread,
};
pub use contract::{
    Bonus, BonusType, ContractInput, ContractType, CoverageTier, DEFAULT_OVERTIME_MULTIPLIER,
    DEFAULT_OVERTIME_THRESHOLD, Deductions, InsuranceDeduction, InsuranceKind, Location,
    MAX_DURATION_WEEKS, RetirementContribution, StipendCategory, Stipends, TaxInfo,
};
pub use contract_result::{
    BonusSummary, ContractBreakdown, ContractCalculationResult, ContractMetrics, ContractTotals,
    DeductionBreakdown, PayPeriodFigures, StipendLine,
};
pub use paycheck::{PaycheckDeductions, PaycheckInput, YtdTotals};
pub use paycheck_result::{AnnualProjection, PaycheckAmounts, PaycheckCalculationResult};
pub use tax::{FilingStatus, PayFrequency, TaxBreakdown};
pub use validation::MAX_AMOUNT;
