//! Paycheck calculation result models.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::audit::AuditTrace;
use super::paycheck::YtdTotals;
use super::tax::{PayFrequency, TaxBreakdown};

/// The current period's pay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaycheckAmounts {
    /// Gross pay.
    pub gross_pay: Decimal,
    /// Pre-tax deductions.
    pub pre_tax_deductions: Decimal,
    /// Roth deductions.
    pub roth_deductions: Decimal,
    /// After-tax deductions.
    pub after_tax_deductions: Decimal,
    /// All deductions.
    pub total_deductions: Decimal,
    /// Wages subject to income tax (gross less pre-tax deductions).
    pub taxable_wages: Decimal,
    /// All taxes withheld.
    pub total_taxes: Decimal,
    /// Take-home pay.
    pub net_pay: Decimal,
}

/// Full-year figures extrapolated from this paycheck.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnualProjection {
    /// Projected gross wages.
    pub gross: Decimal,
    /// Projected federal income tax.
    pub federal_tax: Decimal,
    /// Projected state income tax.
    pub state_tax: Decimal,
    /// Projected total taxes.
    pub total_taxes: Decimal,
    /// Projected pre-tax, Roth and after-tax deductions.
    pub deductions: Decimal,
    /// Projected take-home pay: gross less taxes and deductions.
    pub net: Decimal,
}

/// The complete result of a paycheck calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaycheckCalculationResult {
    /// Version of the engine that produced the result.
    pub engine_version: String,
    /// Date of the paycheck.
    pub pay_date: NaiveDate,
    /// Pay frequency.
    pub pay_frequency: PayFrequency,
    /// State whose income tax was withheld.
    pub withholding_state: String,
    /// This period's amounts.
    pub current: PaycheckAmounts,
    /// This period's taxes by category.
    pub taxes: TaxBreakdown,
    /// Year-to-date totals including this paycheck.
    pub ytd: YtdTotals,
    /// Full-year projection.
    pub projection: AnnualProjection,
    /// Pay periods in the year.
    pub periods_per_year: u32,
    /// Pay periods paid so far, this one included.
    pub periods_elapsed: u32,
    /// Pay periods left in the year.
    pub periods_remaining: u32,
    /// Steps and warnings recorded during calculation.
    pub audit_trace: AuditTrace,
}
