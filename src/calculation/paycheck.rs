//! Paycheck calculation engine.
//!
//! Computes withholding for a single pay period, rolls the paycheck into the
//! year-to-date totals, and projects the rest of the year assuming the same
//! paycheck every remaining period.

use rust_decimal::Decimal;
use serde_json::json;
use tracing::debug;

use super::ENGINE_VERSION;
use super::tax::{TaxInput, compute_taxes_with_tables};
use crate::config::{LocationDataProvider, TaxTables};
use crate::error::{EngineError, EngineResult, Violation, ensure_valid};
use crate::models::{
    AnnualProjection, AuditTrace, PaycheckAmounts, PaycheckCalculationResult, PaycheckInput,
};

const WITHHOLDING_REF: &str = "IRS Publication 15-T";

/// Calculates one paycheck.
///
/// Each real pay period must be submitted exactly once: the supplied YTD
/// figures are the totals before this paycheck, and the result carries them
/// with this paycheck added.
///
/// # Errors
///
/// - `Validation` listing every problem with the input, or a `deductions`
///   violation when deductions and taxes exceed gross pay
/// - `JurisdictionNotFound` for an unknown work or residence state
pub fn calculate_paycheck<P>(
    input: &PaycheckInput,
    provider: &P,
) -> EngineResult<PaycheckCalculationResult>
where
    P: LocationDataProvider + ?Sized,
{
    ensure_valid(input.validate())?;

    let mut trace = AuditTrace::default();
    let tables = withholding_tables(input, provider, &mut trace)?;

    let periods_per_year = input.pay_frequency.periods_per_year();
    let deductions = &input.deductions;
    let tax_input = TaxInput::new(
        input.gross_pay,
        tables.state_code.clone(),
        Decimal::from(periods_per_year),
    )
    .with_filing_status(input.filing_status)
    .with_pre_tax_deductions(deductions.pre_tax)
    .with_exemptions(input.allowances, input.allowances)
    .with_additional_withholding(deductions.additional_withholding, Decimal::ZERO)
    .with_ytd_wages(input.ytd.gross);
    let taxes = compute_taxes_with_tables(&tax_input, &tables)?;

    trace.record(
        "paycheck_withholding",
        "Paycheck Withholding",
        WITHHOLDING_REF,
        json!({
            "gross_pay": input.gross_pay.to_string(),
            "pre_tax_deductions": deductions.pre_tax.to_string(),
            "periods_per_year": periods_per_year,
            "ytd_wages": input.ytd.gross.to_string(),
            "allowances": input.allowances,
        }),
        json!({
            "federal_income_tax": taxes.federal_income_tax.to_string(),
            "state_income_tax": taxes.state_income_tax.to_string(),
            "social_security": taxes.social_security.to_string(),
            "medicare": taxes.medicare.to_string(),
            "additional_medicare": taxes.additional_medicare.to_string(),
            "state_disability": taxes.state_disability.to_string(),
        }),
        format!(
            "Annualized ${} over {} periods: ${} total withholding",
            tax_input.income_tax_base(),
            periods_per_year,
            taxes.total
        ),
    );

    let social_security_base = tables.federal.fica.social_security_wage_base;
    if input.ytd.gross + input.gross_pay > social_security_base {
        trace.warn(
            "social_security_wage_base_reached",
            format!(
                "Cumulative wages exceed the social security wage base of ${}",
                social_security_base
            ),
            "low",
        );
    }

    let total_deductions = deductions.total();
    let net_pay = input.gross_pay - total_deductions - taxes.total;
    if net_pay < Decimal::ZERO {
        return Err(EngineError::validation(vec![Violation::new(
            "deductions",
            format!(
                "deductions of {} and taxes of {} exceed gross pay of {}",
                total_deductions, taxes.total, input.gross_pay
            ),
        )]));
    }

    let ytd = input.ytd.add_paycheck(input.gross_pay, total_deductions, &taxes);

    let periods_elapsed = input.pay_frequency.periods_elapsed(input.pay_date);
    let periods_remaining = periods_per_year - periods_elapsed;
    if periods_elapsed == 1 && input.ytd.gross > Decimal::ZERO {
        trace.warn(
            "ytd_before_first_period",
            format!(
                "Prior year-to-date wages of ${} were supplied for the first pay period of the year",
                input.ytd.gross
            ),
            "medium",
        );
    }

    let remaining = Decimal::from(periods_remaining);
    let projected_gross = ytd.gross + input.gross_pay * remaining;
    let projected_taxes = ytd.total_taxes() + taxes.total * remaining;
    let projected_deductions = ytd.deductions + total_deductions * remaining;
    let projection = AnnualProjection {
        gross: projected_gross,
        federal_tax: ytd.federal_tax + taxes.federal_income_tax * remaining,
        state_tax: ytd.state_tax + taxes.state_income_tax * remaining,
        total_taxes: projected_taxes,
        deductions: projected_deductions,
        net: projected_gross - projected_taxes - projected_deductions,
    };

    trace.record(
        "annual_projection",
        "Annual Projection",
        "year-to-date totals",
        json!({
            "periods_elapsed": periods_elapsed,
            "periods_remaining": periods_remaining,
            "ytd_gross": ytd.gross.to_string(),
        }),
        json!({
            "projected_gross": projection.gross.to_string(),
            "projected_taxes": projection.total_taxes.to_string(),
            "projected_net": projection.net.to_string(),
        }),
        format!(
            "YTD ${} plus {} more periods at ${} = ${}",
            ytd.gross, periods_remaining, input.gross_pay, projection.gross
        ),
    );

    debug!(
        state = %tables.state_code,
        gross = %input.gross_pay,
        net = %net_pay,
        periods_elapsed,
        "Calculated paycheck"
    );

    Ok(PaycheckCalculationResult {
        engine_version: ENGINE_VERSION.to_string(),
        pay_date: input.pay_date,
        pay_frequency: input.pay_frequency,
        withholding_state: tables.state_code.clone(),
        current: PaycheckAmounts {
            gross_pay: input.gross_pay,
            pre_tax_deductions: deductions.pre_tax,
            roth_deductions: deductions.roth,
            after_tax_deductions: deductions.after_tax,
            total_deductions,
            taxable_wages: tax_input.income_tax_base(),
            total_taxes: taxes.total,
            net_pay,
        },
        taxes,
        ytd,
        projection,
        periods_per_year,
        periods_elapsed,
        periods_remaining,
        audit_trace: trace,
    })
}

/// Picks the state whose income tax is withheld.
///
/// Income tax follows the work state unless it levies none and the worker
/// lives in a different state, in which case the residence state withholds.
/// Disability contributions always follow the work state.
fn withholding_tables<P>(
    input: &PaycheckInput,
    provider: &P,
    trace: &mut AuditTrace,
) -> EngineResult<TaxTables>
where
    P: LocationDataProvider + ?Sized,
{
    let work = provider.tax_tables(&input.work_state)?;

    let residence = match &input.residence_state {
        Some(state) if !state.trim().eq_ignore_ascii_case(&work.state_code) => {
            Some(provider.tax_tables(state)?)
        }
        _ => None,
    };

    let tables = match residence {
        Some(mut residence) if !work.state.income_tax.levies_tax() => {
            trace.record(
                "withholding_state",
                "Withholding State",
                WITHHOLDING_REF,
                json!({
                    "work_state": work.state_code,
                    "residence_state": residence.state_code,
                }),
                json!({ "withholding_state": residence.state_code }),
                format!(
                    "{} levies no income tax, so {} income tax is withheld",
                    work.state.name, residence.state.name
                ),
            );
            residence.state.disability = work.state.disability.clone();
            residence
        }
        Some(residence) => {
            trace.warn(
                "residence_state_not_withheld",
                format!(
                    "Income tax is withheld for {} only; {} may require a separate filing",
                    work.state.name, residence.state.name
                ),
                "low",
            );
            work
        }
        None => work,
    };

    Ok(tables)
}
