//! Tax calculator.
//!
//! This module computes federal and state income tax withholding plus
//! payroll taxes for one period's wages. Income tax uses the annualization
//! method: the period's taxable wages are scaled to a full year, run through
//! the annual brackets, and the annual tax is divided back over the period.

use rust_decimal::Decimal;
use tracing::debug;

use super::brackets::{bracket_tax, reduce_by_allowances};
use super::fica::{
    additional_medicare_tax, medicare_tax, social_security_tax, state_disability_tax,
};
use super::rounding::{ratio, round_money, round_rate};
use crate::config::{LocationDataProvider, StateIncomeTax, TaxTables};
use crate::error::{EngineError, EngineResult};
use crate::models::{FilingStatus, TaxBreakdown};

/// Everything the tax calculator needs to know about one period's wages.
///
/// # Example
///
/// ```
/// use locum_calc::calculation::TaxInput;
/// use locum_calc::models::FilingStatus;
/// use rust_decimal::Decimal;
///
/// let input = TaxInput::new(Decimal::from(4_000), "CA", Decimal::from(26))
///     .with_filing_status(FilingStatus::MarriedFilingJointly)
///     .with_pre_tax_deductions(Decimal::from(200))
///     .with_ytd_wages(Decimal::from(40_000));
///
/// assert_eq!(input.income_tax_base(), Decimal::from(3_800));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaxInput {
    /// Gross wages for the period.
    pub gross: Decimal,
    /// Deductions that reduce the income tax base (not the FICA base).
    pub pre_tax_deductions: Decimal,
    /// State whose tables apply.
    pub state: String,
    /// Federal filing status.
    pub filing_status: FilingStatus,
    /// Federal exemptions claimed.
    pub federal_exemptions: u32,
    /// State exemptions claimed.
    pub state_exemptions: u32,
    /// Extra federal withholding added after the bracket computation.
    pub additional_federal_withholding: Decimal,
    /// Extra state withholding added after the bracket computation.
    pub additional_state_withholding: Decimal,
    /// Number of such periods in a year.
    pub annualization_factor: Decimal,
    /// Wages already paid this year, for FICA caps and thresholds.
    pub ytd_wages: Decimal,
}

impl TaxInput {
    /// Creates an input for a single filer with no exemptions, deductions or
    /// prior wages.
    pub fn new(gross: Decimal, state: impl Into<String>, annualization_factor: Decimal) -> Self {
        Self {
            gross,
            pre_tax_deductions: Decimal::ZERO,
            state: state.into(),
            filing_status: FilingStatus::Single,
            federal_exemptions: 0,
            state_exemptions: 0,
            additional_federal_withholding: Decimal::ZERO,
            additional_state_withholding: Decimal::ZERO,
            annualization_factor,
            ytd_wages: Decimal::ZERO,
        }
    }

    /// Sets the filing status.
    pub fn with_filing_status(mut self, filing_status: FilingStatus) -> Self {
        self.filing_status = filing_status;
        self
    }

    /// Sets the pre-tax deductions.
    pub fn with_pre_tax_deductions(mut self, amount: Decimal) -> Self {
        self.pre_tax_deductions = amount;
        self
    }

    /// Sets the federal and state exemption counts.
    pub fn with_exemptions(mut self, federal: u32, state: u32) -> Self {
        self.federal_exemptions = federal;
        self.state_exemptions = state;
        self
    }

    /// Sets additional federal and state withholding.
    pub fn with_additional_withholding(mut self, federal: Decimal, state: Decimal) -> Self {
        self.additional_federal_withholding = federal;
        self.additional_state_withholding = state;
        self
    }

    /// Sets the wages already paid this year.
    pub fn with_ytd_wages(mut self, ytd_wages: Decimal) -> Self {
        self.ytd_wages = ytd_wages;
        self
    }

    /// Returns the period's income tax base: gross less pre-tax deductions,
    /// floored at zero.
    pub fn income_tax_base(&self) -> Decimal {
        (self.gross - self.pre_tax_deductions).max(Decimal::ZERO)
    }

    /// Returns how many years of payroll tax caps the period is entitled to:
    /// `1 / annualization_factor`, never less than one.
    ///
    /// A two-year contract (factor 0.5) gets two social security wage bases.
    pub fn years_spanned(&self) -> EngineResult<Decimal> {
        let years = Decimal::ONE
            .checked_div(self.annualization_factor)
            .ok_or_else(|| overflow("years spanned", self))?;
        Ok(round_rate(years).max(Decimal::ONE))
    }
}

/// Computes all taxes for one period's wages, looking the tables up from
/// `provider`.
///
/// # Errors
///
/// Returns `JurisdictionNotFound` for an unknown state and `Computation`
/// when the annualization factor is not positive or annualizing overflows.
pub fn compute_taxes<P>(input: &TaxInput, provider: &P) -> EngineResult<TaxBreakdown>
where
    P: LocationDataProvider + ?Sized,
{
    let tables = provider.tax_tables(&input.state)?;
    compute_taxes_with_tables(input, &tables)
}

/// Computes all taxes for one period's wages against already-resolved tables.
pub fn compute_taxes_with_tables(input: &TaxInput, tables: &TaxTables) -> EngineResult<TaxBreakdown> {
    let factor = input.annualization_factor;
    if factor <= Decimal::ZERO {
        return Err(EngineError::Computation {
            message: format!("annualization factor must be positive, got {}", factor),
        });
    }

    let federal = &tables.federal;
    let annual_base = input
        .income_tax_base()
        .checked_mul(factor)
        .ok_or_else(|| overflow("annualized income", input))?;

    // Federal income tax
    let federal_taxable = reduce_by_allowances(
        annual_base,
        *federal.standard_deduction.get(input.filing_status),
        input.federal_exemptions,
        federal.exemption_allowance,
    );
    let annual_federal = bracket_tax(federal.brackets.get(input.filing_status), federal_taxable);
    let federal_income_tax =
        round_money(annual_federal / factor) + input.additional_federal_withholding;

    // State income tax
    let state = &tables.state;
    let state_taxable = reduce_by_allowances(
        annual_base,
        state.standard_deduction,
        input.state_exemptions,
        state.exemption_allowance,
    );
    let annual_state = match &state.income_tax {
        StateIncomeTax::None => Decimal::ZERO,
        StateIncomeTax::Flat { rate } => state_taxable * *rate,
        StateIncomeTax::Progressive { brackets } => bracket_tax(brackets, state_taxable),
    };
    let state_income_tax = if state.income_tax.levies_tax() {
        round_money(annual_state / factor) + input.additional_state_withholding
    } else {
        Decimal::ZERO
    };

    // Payroll taxes, with one set of annual caps per year the period covers
    let years = input.years_spanned()?;
    let fica = federal.fica.over_years(years);
    let disability = state.disability.as_ref().map(|d| d.over_years(years));
    let wages = input.gross;
    let social_security = social_security_tax(wages, input.ytd_wages, &fica);
    let medicare = medicare_tax(wages, &fica);
    let additional_medicare = additional_medicare_tax(wages, input.ytd_wages, &fica);
    let state_disability = state_disability_tax(wages, input.ytd_wages, disability.as_ref());

    let total = federal_income_tax
        + state_income_tax
        + social_security
        + medicare
        + additional_medicare
        + state_disability;

    debug!(
        state = %tables.state_code,
        annual_base = %annual_base,
        federal_income_tax = %federal_income_tax,
        state_income_tax = %state_income_tax,
        total = %total,
        "Computed taxes"
    );

    Ok(TaxBreakdown {
        jurisdiction: tables.state_code.clone(),
        federal_taxable_income: round_money(federal_taxable),
        state_taxable_income: if state.income_tax.levies_tax() {
            round_money(state_taxable)
        } else {
            Decimal::ZERO
        },
        federal_income_tax,
        state_income_tax,
        social_security,
        medicare,
        additional_medicare,
        state_disability,
        total,
        effective_rate: ratio(total, input.gross),
    })
}

fn overflow(what: &str, input: &TaxInput) -> EngineError {
    EngineError::Computation {
        message: format!(
            "{} overflowed for wages of {} at annualization factor {}",
            what, input.gross, input.annualization_factor
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigLoader;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn loader() -> ConfigLoader {
        ConfigLoader::builtin().unwrap()
    }

    #[test]
    fn test_no_income_tax_state() {
        // 52000 a year from TX, single
        let input = TaxInput::new(dec("52000"), "TX", Decimal::ONE);
        let taxes = compute_taxes(&input, &loader()).unwrap();

        // (52000 - 15000) = 37000 -> 1192.50 + (37000 - 11925) x 0.12 = 4201.50
        assert_eq!(taxes.federal_taxable_income, dec("37000.00"));
        assert_eq!(taxes.federal_income_tax, dec("4201.50"));
        assert_eq!(taxes.state_income_tax, Decimal::ZERO);
        assert_eq!(taxes.state_taxable_income, Decimal::ZERO);
        assert_eq!(taxes.social_security, dec("3224.00"));
        assert_eq!(taxes.medicare, dec("754.00"));
        assert_eq!(taxes.additional_medicare, Decimal::ZERO);
        assert_eq!(taxes.state_disability, Decimal::ZERO);
        assert_eq!(taxes.total, dec("8179.50"));
        assert_eq!(taxes.jurisdiction, "TX");
    }

    #[test]
    fn test_flat_tax_state_with_exemption() {
        let loader = loader();
        let state = loader.get_state("MA").unwrap();
        let input = TaxInput::new(dec("52000"), "MA", Decimal::ONE).with_exemptions(0, 1);
        let taxes = compute_taxes(&input, &loader).unwrap();

        let expected_taxable = dec("52000") - state.standard_deduction - state.exemption_allowance;
        assert_eq!(taxes.state_taxable_income, round_money(expected_taxable));
        assert_eq!(taxes.state_income_tax, round_money(expected_taxable * dec("0.05")));
    }

    #[test]
    fn test_annualization_round_trip() {
        // Quarterly wages of 13000 annualize to 52000, so federal tax is a quarter of 4201.50
        let input = TaxInput::new(dec("13000"), "TX", dec("4"));
        let taxes = compute_taxes(&input, &loader()).unwrap();
        assert_eq!(taxes.federal_income_tax, round_money(dec("4201.50") / dec("4")));
        assert_eq!(taxes.federal_taxable_income, dec("37000.00"));
    }

    #[test]
    fn test_pre_tax_deductions_reduce_income_tax_only() {
        let plain = compute_taxes(&TaxInput::new(dec("5000"), "TX", dec("26")), &loader()).unwrap();
        let reduced = compute_taxes(
            &TaxInput::new(dec("5000"), "TX", dec("26")).with_pre_tax_deductions(dec("500")),
            &loader(),
        )
        .unwrap();

        assert!(reduced.federal_income_tax < plain.federal_income_tax);
        assert_eq!(reduced.social_security, plain.social_security);
        assert_eq!(reduced.medicare, plain.medicare);
    }

    #[test]
    fn test_pre_tax_deductions_above_gross_floor_at_zero() {
        let input = TaxInput::new(dec("1000"), "TX", dec("26")).with_pre_tax_deductions(dec("2000"));
        assert_eq!(input.income_tax_base(), Decimal::ZERO);
        let taxes = compute_taxes(&input, &loader()).unwrap();
        assert_eq!(taxes.federal_income_tax, Decimal::ZERO);
    }

    #[test]
    fn test_additional_withholding_added_after_brackets() {
        let base = compute_taxes(&TaxInput::new(dec("5000"), "MA", dec("26")), &loader()).unwrap();
        let extra = compute_taxes(
            &TaxInput::new(dec("5000"), "MA", dec("26"))
                .with_additional_withholding(dec("100"), dec("25")),
            &loader(),
        )
        .unwrap();

        assert_eq!(extra.federal_income_tax - base.federal_income_tax, dec("100"));
        assert_eq!(extra.state_income_tax - base.state_income_tax, dec("25"));
        assert_eq!(extra.total - base.total, dec("125"));
    }

    #[test]
    fn test_additional_state_withholding_ignored_without_income_tax() {
        let taxes = compute_taxes(
            &TaxInput::new(dec("5000"), "TX", dec("26"))
                .with_additional_withholding(Decimal::ZERO, dec("50")),
            &loader(),
        )
        .unwrap();
        assert_eq!(taxes.state_income_tax, Decimal::ZERO);
    }

    #[test]
    fn test_married_filing_jointly_pays_less() {
        let single = compute_taxes(&TaxInput::new(dec("8000"), "TX", dec("12")), &loader()).unwrap();
        let joint = compute_taxes(
            &TaxInput::new(dec("8000"), "TX", dec("12"))
                .with_filing_status(FilingStatus::MarriedFilingJointly),
            &loader(),
        )
        .unwrap();
        assert!(joint.federal_income_tax < single.federal_income_tax);
    }

    #[test]
    fn test_ytd_wages_cap_social_security() {
        let input = TaxInput::new(dec("10000"), "TX", dec("26")).with_ytd_wages(dec("180000"));
        let taxes = compute_taxes(&input, &loader()).unwrap();
        assert_eq!(taxes.social_security, Decimal::ZERO);
        assert_eq!(taxes.medicare, dec("145.00"));
    }

    #[test]
    fn test_california_disability_applies() {
        let taxes = compute_taxes(&TaxInput::new(dec("10000"), "CA", dec("12")), &loader()).unwrap();
        assert_eq!(taxes.state_disability, dec("120.00"));
        assert!(taxes.state_income_tax > Decimal::ZERO);
    }

    #[test]
    fn test_effective_rate_zero_when_gross_zero() {
        let taxes = compute_taxes(&TaxInput::new(Decimal::ZERO, "CA", dec("26")), &loader()).unwrap();
        assert_eq!(taxes.total, Decimal::ZERO);
        assert_eq!(taxes.effective_rate, Decimal::ZERO);
    }

    #[test]
    fn test_effective_rate_is_total_over_gross() {
        let taxes = compute_taxes(&TaxInput::new(dec("52000"), "TX", Decimal::ONE), &loader()).unwrap();
        assert_eq!(taxes.effective_rate, ratio(dec("8179.50"), dec("52000")));
    }

    #[test]
    fn test_unknown_state_not_found() {
        let result = compute_taxes(&TaxInput::new(dec("1000"), "PR", dec("26")), &loader());
        assert!(matches!(
            result,
            Err(EngineError::JurisdictionNotFound { code }) if code == "PR"
        ));
    }

    #[test]
    fn test_non_positive_factor_rejected() {
        let result = compute_taxes(&TaxInput::new(dec("1000"), "TX", Decimal::ZERO), &loader());
        assert!(matches!(result, Err(EngineError::Computation { .. })));
    }

    #[test]
    fn test_overflowing_annualization_is_computation_error() {
        let result = compute_taxes(&TaxInput::new(Decimal::MAX, "TX", dec("52")), &loader());
        assert!(matches!(result, Err(EngineError::Computation { .. })));
    }

    #[test]
    fn test_years_spanned() {
        assert_eq!(TaxInput::new(dec("1"), "TX", dec("26")).years_spanned().unwrap(), Decimal::ONE);
        assert_eq!(TaxInput::new(dec("1"), "TX", dec("0.5")).years_spanned().unwrap(), dec("2"));
        // 78 weeks
        let factor = dec("52") / dec("78");
        assert_eq!(TaxInput::new(dec("1"), "TX", factor).years_spanned().unwrap(), dec("1.5"));
    }

    #[test]
    fn test_two_year_period_gets_two_wage_bases() {
        let one_year = compute_taxes(&TaxInput::new(dec("416000"), "WA", Decimal::ONE), &loader()).unwrap();
        let two_years = compute_taxes(&TaxInput::new(dec("832000"), "WA", dec("0.5")), &loader()).unwrap();

        assert_eq!(one_year.social_security, dec("10918.20"));
        assert_eq!(two_years.social_security, dec("21836.40"));
        // (832000 - 2 x 200000) x 0.9%
        assert_eq!(two_years.additional_medicare, dec("3888.00"));
        assert_eq!(two_years.additional_medicare, one_year.additional_medicare * dec("2"));
        assert_eq!(two_years.state_disability, one_year.state_disability * dec("2"));
    }

    #[test]
    fn test_deterministic() {
        let input = TaxInput::new(dec("7345.67"), "NY", dec("24")).with_ytd_wages(dec("88000"));
        let first = compute_taxes(&input, &loader()).unwrap();
        let second = compute_taxes(&input, &loader()).unwrap();
        assert_eq!(first, second);
    }
}
