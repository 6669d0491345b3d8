//! Paycheck input model and year-to-date totals.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::tax::{FilingStatus, PayFrequency, TaxBreakdown};
use super::validation::Violations;
use crate::error::Violation;

/// Year-to-date accumulators for one employee-year.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct YtdTotals {
    /// Gross wages paid.
    pub gross: Decimal,
    /// Federal income tax withheld.
    pub federal_tax: Decimal,
    /// State income tax withheld.
    pub state_tax: Decimal,
    /// Social security withheld.
    pub social_security: Decimal,
    /// Medicare withheld, surtax included.
    pub medicare: Decimal,
    /// State disability / paid leave withheld.
    pub state_disability: Decimal,
    /// Pre-tax, Roth and after-tax deductions taken.
    pub deductions: Decimal,
}

impl YtdTotals {
    /// Returns all taxes withheld so far.
    pub fn total_taxes(&self) -> Decimal {
        self.federal_tax + self.state_tax + self.social_security + self.medicare + self.state_disability
    }

    /// Returns these totals with one more paycheck added.
    pub fn add_paycheck(
        &self,
        gross: Decimal,
        deductions: Decimal,
        taxes: &TaxBreakdown,
    ) -> YtdTotals {
        YtdTotals {
            gross: self.gross + gross,
            deductions: self.deductions + deductions,
            federal_tax: self.federal_tax + taxes.federal_income_tax,
            state_tax: self.state_tax + taxes.state_income_tax,
            social_security: self.social_security + taxes.social_security,
            medicare: self.medicare + taxes.medicare + taxes.additional_medicare,
            state_disability: self.state_disability + taxes.state_disability,
        }
    }

    fn validate_into(&self, v: &mut Violations) {
        v.amount("ytd.gross", self.gross);
        v.amount("ytd.federal_tax", self.federal_tax);
        v.amount("ytd.state_tax", self.state_tax);
        v.amount("ytd.social_security", self.social_security);
        v.amount("ytd.medicare", self.medicare);
        v.amount("ytd.state_disability", self.state_disability);
        v.amount("ytd.deductions", self.deductions);
    }
}

/// Deductions taken from this paycheck.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaycheckDeductions {
    /// Pre-tax deductions (traditional 401k, section 125 premiums).
    /// These reduce the federal and state income tax base.
    pub pre_tax: Decimal,
    /// Roth contributions; taxed as wages.
    pub roth: Decimal,
    /// Other after-tax deductions.
    pub after_tax: Decimal,
    /// Extra federal withholding requested by the employee.
    pub additional_withholding: Decimal,
}

impl PaycheckDeductions {
    /// Returns pre-tax, Roth and after-tax deductions combined.
    pub fn total(&self) -> Decimal {
        self.pre_tax + self.roth + self.after_tax
    }
}

/// One pay period's wages and context.
///
/// The caller must submit each real pay period exactly once: the engine adds
/// this paycheck to the supplied YTD figures, so calling twice with the same
/// input counts the paycheck twice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaycheckInput {
    /// Gross pay for the period; must be positive.
    pub gross_pay: Decimal,
    /// Pay frequency.
    pub pay_frequency: PayFrequency,
    /// Date the paycheck is issued.
    pub pay_date: NaiveDate,
    /// Federal filing status.
    pub filing_status: FilingStatus,
    /// Withholding allowances claimed.
    #[serde(default)]
    pub allowances: u32,
    /// State where the work is performed.
    pub work_state: String,
    /// State of residence, when different from the work state.
    #[serde(default)]
    pub residence_state: Option<String>,
    /// Totals before this paycheck.
    #[serde(default)]
    pub ytd: YtdTotals,
    /// Deductions for this period.
    #[serde(default)]
    pub deductions: PaycheckDeductions,
}

impl PaycheckInput {
    /// Checks every field and returns all violations found.
    pub fn validate(&self) -> Vec<Violation> {
        let mut v = Violations::default();

        v.positive_amount("gross_pay", self.gross_pay);
        v.state_code("work_state", &self.work_state);
        if let Some(residence) = &self.residence_state {
            v.state_code("residence_state", residence);
        }

        self.ytd.validate_into(&mut v);

        v.amount("deductions.pre_tax", self.deductions.pre_tax);
        v.amount("deductions.roth", self.deductions.roth);
        v.amount("deductions.after_tax", self.deductions.after_tax);
        v.amount(
            "deductions.additional_withholding",
            self.deductions.additional_withholding,
        );
        let committed = self.deductions.total() + self.deductions.additional_withholding;
        if self.gross_pay > Decimal::ZERO && committed > self.gross_pay {
            v.push("deductions", "deductions and additional withholding must not exceed gross_pay");
        }

        v.into_vec()
    }
}
