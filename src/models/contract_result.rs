//! Contract calculation result models.
//!
//! This module contains the [`ContractCalculationResult`] type and its
//! associated structures: totals, an itemised breakdown, per-period figures,
//! headline metrics and the audit trace.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::audit::AuditTrace;
use super::contract::{BonusType, StipendCategory};
use super::tax::{PayFrequency, TaxBreakdown};

/// Headline totals for the contract period.
///
/// Despite the `annual` naming used by callers, every amount covers the
/// contract's own duration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractTotals {
    /// Base + overtime + bonuses + taxable stipends.
    pub gross_annual_pay: Decimal,
    /// Gross + non-taxable stipends - deductions - taxes.
    pub net_annual_pay: Decimal,
    /// All stipends, taxable or not.
    pub total_stipends: Decimal,
    /// All deductions.
    pub total_deductions: Decimal,
    /// All taxes.
    pub total_taxes: Decimal,
    /// Net pay per hour worked.
    pub effective_hourly_rate: Decimal,
    /// Gross pay divided by a full year of scheduled hours.
    pub annualized_hourly_rate: Decimal,
}

/// Bonuses of one category, summed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BonusSummary {
    /// Bonus category.
    pub bonus_type: BonusType,
    /// Total paid in this category.
    pub amount: Decimal,
    /// Portion of the total that is taxable.
    pub taxable_amount: Decimal,
}

/// One stipend category with its tax treatment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StipendLine {
    /// Stipend category.
    pub category: StipendCategory,
    /// Amount paid.
    pub amount: Decimal,
    /// Whether the amount was included in taxable income.
    pub taxable: bool,
}

/// Deductions by category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeductionBreakdown {
    /// Health insurance premiums.
    pub health_insurance: Decimal,
    /// Dental insurance premiums.
    pub dental_insurance: Decimal,
    /// Vision insurance premiums.
    pub vision_insurance: Decimal,
    /// Life insurance premiums.
    pub life_insurance: Decimal,
    /// Disability insurance premiums.
    pub disability_insurance: Decimal,
    /// Retirement contribution.
    pub retirement: Decimal,
    /// Professional fees.
    pub professional_fees: Decimal,
    /// Parking.
    pub parking: Decimal,
    /// Other.
    pub other: Decimal,
    /// Sum of the above.
    pub total: Decimal,
}

/// Itemised view of how the totals were reached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractBreakdown {
    /// Contract length in weeks.
    pub weeks: Decimal,
    /// Hours a week paid at the base rate.
    pub regular_hours_per_week: Decimal,
    /// Hours a week paid at the overtime rate.
    pub overtime_hours_per_week: Decimal,
    /// Base pay.
    pub base_pay: Decimal,
    /// Overtime hourly rate applied.
    pub overtime_rate: Decimal,
    /// Overtime pay.
    pub overtime_pay: Decimal,
    /// Bonuses by category.
    pub bonuses: Vec<BonusSummary>,
    /// All bonuses.
    pub total_bonuses: Decimal,
    /// Stipends by category.
    pub stipends: Vec<StipendLine>,
    /// Stipends included in taxable income.
    pub taxable_stipends: Decimal,
    /// Stipends paid tax-free.
    pub non_taxable_stipends: Decimal,
    /// Income passed to the tax calculator.
    pub taxable_income: Decimal,
    /// Deductions by category.
    pub deductions: DeductionBreakdown,
    /// Taxes by category.
    pub taxes: TaxBreakdown,
}

/// Figures for one pay period of the contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayPeriodFigures {
    /// Frequency the figures are based on.
    pub frequency: PayFrequency,
    /// Pay periods in the contract (may be fractional).
    pub number_of_periods: Decimal,
    /// Gross pay per period.
    pub gross_per_period: Decimal,
    /// Net pay per period.
    pub net_per_period: Decimal,
    /// Taxes per period.
    pub taxes_per_period: Decimal,
    /// Stipends per period.
    pub stipends_per_period: Decimal,
    /// Deductions per period.
    pub deductions_per_period: Decimal,
}

/// Headline ratios.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractMetrics {
    /// Taxes as a fraction of gross pay.
    pub effective_tax_rate: Decimal,
    /// Net pay as a percentage of everything paid out (gross + non-taxable stipends).
    pub take_home_percentage: Decimal,
    /// Stipends plus retirement contribution.
    pub benefits_value: Decimal,
}

/// The complete result of a contract calculation.
///
/// Recomputed from the input on every call; the engine keeps nothing between
/// calls, so identical inputs produce identical results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractCalculationResult {
    /// Label identifying the contract.
    pub label: String,
    /// Version of the engine that produced the result.
    pub engine_version: String,
    /// Headline totals.
    pub totals: ContractTotals,
    /// Itemised breakdown.
    pub breakdown: ContractBreakdown,
    /// Per-period figures.
    pub pay_period: PayPeriodFigures,
    /// Headline ratios.
    pub metrics: ContractMetrics,
    /// Steps and warnings recorded during calculation.
    pub audit_trace: AuditTrace,
}
