//! Contract calculation engine.
//!
//! Turns a [`ContractInput`] into a [`ContractCalculationResult`]: base and
//! overtime pay, bonuses, stipends split by tax treatment, deductions, taxes,
//! per-period figures and headline metrics. Every figure covers the contract
//! period.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde_json::json;
use tracing::debug;

use super::ENGINE_VERSION;
use super::brackets::marginal_rate;
use super::rounding::{WEEKS_PER_YEAR, per_period, percentage, ratio, round_money, round_rate};
use super::tax::{TaxInput, compute_taxes_with_tables};
use crate::config::{LocationDataProvider, TaxTables};
use crate::error::{EngineError, EngineResult, Violation, ensure_valid};
use crate::models::{
    AuditTrace, BonusSummary, BonusType, ContractBreakdown, ContractCalculationResult,
    ContractInput, ContractMetrics, ContractTotals, DeductionBreakdown, InsuranceKind,
    PayPeriodFigures, StipendCategory, StipendLine,
};

const CONTRACT_TERMS: &str = "contract terms";
const TRAVEL_EXPENSE_REF: &str = "IRS Publication 463";
const WITHHOLDING_REF: &str = "IRS Publication 15-T";

struct Earnings {
    weeks: Decimal,
    regular_hours: Decimal,
    overtime_hours: Decimal,
    base_pay: Decimal,
    overtime_rate: Decimal,
    overtime_pay: Decimal,
}

struct BonusTotals {
    by_type: Vec<BonusSummary>,
    total: Decimal,
    taxable: Decimal,
}

struct StipendSplit {
    lines: Vec<StipendLine>,
    total: Decimal,
    taxable: Decimal,
    non_taxable: Decimal,
}

/// Calculates pay, taxes and take-home for one contract.
///
/// # Errors
///
/// - `Validation` listing every problem with the input, or a `deductions`
///   violation when deductions and taxes exceed everything the contract pays
/// - `JurisdictionNotFound` when the state is not one of the 50 US states
/// - `Computation` if annualizing the contract's pay overflows
///
/// # Example
///
/// ```
/// use locum_calc::calculation::calculate_contract;
/// use locum_calc::config::ConfigLoader;
/// use locum_calc::models::ContractInput;
/// use rust_decimal::Decimal;
///
/// let provider = ConfigLoader::builtin()?;
/// let contract: ContractInput = serde_json::from_str(r#"{
///     "specialty": "Hospitalist",
///     "location": { "state": "MA" },
///     "contract_type": "locum_tenens",
///     "start_date": "2025-01-06",
///     "end_date": "2025-04-07",
///     "hourly_rate": "100",
///     "hours_per_week": "40"
/// }"#).unwrap();
///
/// let result = calculate_contract(&contract, &provider)?;
/// assert_eq!(result.totals.gross_annual_pay, Decimal::from(52_000));
/// assert_eq!(
///     result.totals.net_annual_pay,
///     result.totals.gross_annual_pay - result.totals.total_taxes
/// );
/// # Ok::<(), locum_calc::error::EngineError>(())
/// ```
pub fn calculate_contract<P>(
    contract: &ContractInput,
    provider: &P,
) -> EngineResult<ContractCalculationResult>
where
    P: LocationDataProvider + ?Sized,
{
    ensure_valid(contract.validate())?;

    let tables = provider.tax_tables(&contract.location.state)?;
    let mut trace = AuditTrace::default();

    let earnings = calculate_earnings(contract, &mut trace);
    let bonuses = summarize_bonuses(contract, &mut trace);
    let stipends = split_stipends(contract, &tables, &mut trace);

    let taxable_income = earnings.base_pay + earnings.overtime_pay + bonuses.taxable + stipends.taxable;
    let gross = earnings.base_pay + earnings.overtime_pay + bonuses.total + stipends.taxable;

    let compensation = earnings.base_pay + earnings.overtime_pay + bonuses.total;
    let deductions = summarize_deductions(contract, compensation, &mut trace);

    let annualization_factor =
        WEEKS_PER_YEAR
            .checked_div(earnings.weeks)
            .ok_or_else(|| EngineError::Computation {
                message: format!("cannot annualize a contract of {} weeks", earnings.weeks),
            })?;
    let tax_input = TaxInput::new(taxable_income, tables.state_code.clone(), annualization_factor)
        .with_filing_status(contract.tax_info.filing_status)
        .with_exemptions(
            contract.tax_info.federal_exemptions,
            contract.tax_info.state_exemptions,
        )
        .with_additional_withholding(
            contract.tax_info.additional_federal_withholding,
            contract.tax_info.additional_state_withholding,
        );
    let taxes = compute_taxes_with_tables(&tax_input, &tables)?;

    trace.record(
        "income_tax",
        "Income Tax Withholding",
        WITHHOLDING_REF,
        json!({
            "taxable_income": taxable_income.to_string(),
            "annualization_factor": round_rate(annualization_factor).to_string(),
            "filing_status": contract.tax_info.filing_status,
            "state": tables.state_code,
            "state_income_tax": tables.state.income_tax.kind(),
        }),
        json!({
            "federal_taxable_income": taxes.federal_taxable_income.to_string(),
            "federal_marginal_rate": marginal_rate(
                tables.federal.brackets.get(contract.tax_info.filing_status),
                taxes.federal_taxable_income,
            )
            .to_string(),
            "federal_income_tax": taxes.federal_income_tax.to_string(),
            "state_taxable_income": taxes.state_taxable_income.to_string(),
            "state_income_tax": taxes.state_income_tax.to_string(),
        }),
        format!(
            "Annualized {} over {} weeks and applied {} brackets: federal ${}, state ${}",
            taxable_income,
            round_rate(earnings.weeks),
            tables.state_code,
            taxes.federal_income_tax,
            taxes.state_income_tax
        ),
    );
    trace.record(
        "payroll_tax",
        "Payroll Taxes",
        "IRC 3101",
        json!({
            "wages": taxable_income.to_string(),
        }),
        json!({
            "social_security": taxes.social_security.to_string(),
            "medicare": taxes.medicare.to_string(),
            "additional_medicare": taxes.additional_medicare.to_string(),
            "state_disability": taxes.state_disability.to_string(),
        }),
        format!(
            "Social security ${}, medicare ${}, additional medicare ${}, state disability ${}",
            taxes.social_security,
            taxes.medicare,
            taxes.additional_medicare,
            taxes.state_disability
        ),
    );

    let wage_base = tables.federal.fica.social_security_wage_base * tax_input.years_spanned()?;
    if taxable_income > wage_base {
        trace.warn(
            "social_security_wage_base_reached",
            format!(
                "Contract wages exceed the social security wage base of ${} for the contract term",
                wage_base
            ),
            "low",
        );
    }
    if !tables.state.income_tax.levies_tax()
        && contract.tax_info.additional_state_withholding > Decimal::ZERO
    {
        trace.warn(
            "additional_state_withholding_ignored",
            format!(
                "{} levies no income tax; additional state withholding of ${} was not applied",
                tables.state.name, contract.tax_info.additional_state_withholding
            ),
            "medium",
        );
    }

    let net = gross + stipends.non_taxable - deductions.total - taxes.total;
    if net < Decimal::ZERO {
        return Err(EngineError::validation(vec![Violation::new(
            "deductions",
            format!(
                "deductions of {} and taxes of {} exceed pay of {}",
                deductions.total,
                taxes.total,
                gross + stipends.non_taxable
            ),
        )]));
    }

    let hours_worked = contract.hours_per_week * earnings.weeks;
    let totals = ContractTotals {
        gross_annual_pay: gross,
        net_annual_pay: net,
        total_stipends: stipends.total,
        total_deductions: deductions.total,
        total_taxes: taxes.total,
        effective_hourly_rate: per_period(net, hours_worked),
        annualized_hourly_rate: per_period(gross, contract.hours_per_week * WEEKS_PER_YEAR),
    };

    let frequency = contract.pay_frequency();
    let periods = earnings.weeks * Decimal::from(frequency.periods_per_year()) / WEEKS_PER_YEAR;
    let pay_period = PayPeriodFigures {
        frequency,
        number_of_periods: round_rate(periods),
        gross_per_period: per_period(gross, periods),
        net_per_period: per_period(net, periods),
        taxes_per_period: per_period(taxes.total, periods),
        stipends_per_period: per_period(stipends.total, periods),
        deductions_per_period: per_period(deductions.total, periods),
    };

    let metrics = ContractMetrics {
        effective_tax_rate: ratio(taxes.total, gross),
        take_home_percentage: percentage(net, gross + stipends.non_taxable),
        benefits_value: stipends.total + deductions.retirement,
    };

    trace.record(
        "net_pay",
        "Net Pay",
        CONTRACT_TERMS,
        json!({
            "gross": gross.to_string(),
            "non_taxable_stipends": stipends.non_taxable.to_string(),
            "deductions": deductions.total.to_string(),
            "taxes": taxes.total.to_string(),
        }),
        json!({
            "net": net.to_string(),
            "effective_hourly_rate": totals.effective_hourly_rate.to_string(),
            "take_home_percentage": metrics.take_home_percentage.to_string(),
        }),
        format!(
            "${} gross + ${} non-taxable stipends - ${} deductions - ${} taxes = ${}",
            gross, stipends.non_taxable, deductions.total, taxes.total, net
        ),
    );

    debug!(
        label = %contract.label(),
        gross = %gross,
        net = %net,
        taxes = %taxes.total,
        "Calculated contract"
    );

    Ok(ContractCalculationResult {
        label: contract.label(),
        engine_version: ENGINE_VERSION.to_string(),
        totals,
        breakdown: ContractBreakdown {
            weeks: round_rate(earnings.weeks),
            regular_hours_per_week: earnings.regular_hours,
            overtime_hours_per_week: earnings.overtime_hours,
            base_pay: earnings.base_pay,
            overtime_rate: earnings.overtime_rate,
            overtime_pay: earnings.overtime_pay,
            bonuses: bonuses.by_type,
            total_bonuses: bonuses.total,
            stipends: stipends.lines,
            taxable_stipends: stipends.taxable,
            non_taxable_stipends: stipends.non_taxable,
            taxable_income,
            deductions,
            taxes,
        },
        pay_period,
        metrics,
        audit_trace: trace,
    })
}

fn calculate_earnings(contract: &ContractInput, trace: &mut AuditTrace) -> Earnings {
    let weeks = contract.weeks();
    let threshold = contract.overtime_threshold();
    let regular_hours = contract.hours_per_week.min(threshold);
    let overtime_hours = (contract.hours_per_week - threshold).max(Decimal::ZERO);

    let base_pay = round_money(contract.hourly_rate * regular_hours * weeks);
    trace.record(
        "base_pay",
        "Base Pay",
        CONTRACT_TERMS,
        json!({
            "hourly_rate": contract.hourly_rate.to_string(),
            "regular_hours_per_week": regular_hours.to_string(),
            "weeks": round_rate(weeks).to_string(),
        }),
        json!({ "base_pay": base_pay.to_string() }),
        format!(
            "${}/h x {}h x {} weeks = ${}",
            contract.hourly_rate,
            regular_hours,
            round_rate(weeks),
            base_pay
        ),
    );

    let overtime_rate = contract.overtime_rate();
    let overtime_pay = round_money(overtime_hours * overtime_rate * weeks);
    if overtime_hours > Decimal::ZERO {
        trace.record(
            "overtime_pay",
            "Overtime Pay",
            CONTRACT_TERMS,
            json!({
                "overtime_threshold": threshold.to_string(),
                "overtime_hours_per_week": overtime_hours.to_string(),
                "overtime_rate": overtime_rate.to_string(),
            }),
            json!({ "overtime_pay": overtime_pay.to_string() }),
            format!(
                "{}h/week above {}h at ${}/h x {} weeks = ${}",
                overtime_hours,
                threshold,
                overtime_rate,
                round_rate(weeks),
                overtime_pay
            ),
        );
        if overtime_rate < contract.hourly_rate {
            trace.warn(
                "overtime_rate_below_base",
                format!(
                    "Overtime rate ${} is lower than the base rate ${}",
                    overtime_rate, contract.hourly_rate
                ),
                "medium",
            );
        }
    }

    Earnings {
        weeks,
        regular_hours,
        overtime_hours,
        base_pay,
        overtime_rate,
        overtime_pay,
    }
}

fn summarize_bonuses(contract: &ContractInput, trace: &mut AuditTrace) -> BonusTotals {
    let mut grouped: BTreeMap<BonusType, (Decimal, Decimal)> = BTreeMap::new();
    for bonus in &contract.bonuses {
        let entry = grouped.entry(bonus.bonus_type).or_default();
        entry.0 += bonus.amount;
        if bonus.taxable {
            entry.1 += bonus.amount;
        }
    }

    let by_type: Vec<BonusSummary> = grouped
        .into_iter()
        .map(|(bonus_type, (amount, taxable_amount))| BonusSummary {
            bonus_type,
            amount,
            taxable_amount,
        })
        .collect();
    let total: Decimal = by_type.iter().map(|b| b.amount).sum();
    let taxable: Decimal = by_type.iter().map(|b| b.taxable_amount).sum();

    if !by_type.is_empty() {
        trace.record(
            "bonuses",
            "Bonuses",
            CONTRACT_TERMS,
            json!({ "count": contract.bonuses.len() }),
            json!({
                "total": total.to_string(),
                "taxable": taxable.to_string(),
            }),
            format!("{} bonus payment(s) totalling ${}, ${} taxable", contract.bonuses.len(), total, taxable),
        );
    }

    BonusTotals {
        by_type,
        total,
        taxable,
    }
}

/// Splits stipends into taxable and non-taxable amounts.
///
/// The jurisdiction decides which categories are reimbursements. Housing,
/// travel and meals lose that treatment when the worker is a resident of the
/// contract location, since there is no second home to cover.
fn split_stipends(
    contract: &ContractInput,
    tables: &TaxTables,
    trace: &mut AuditTrace,
) -> StipendSplit {
    let non_taxable_categories = tables.non_taxable_stipends();
    let is_resident = contract.tax_info.is_resident;

    let lines: Vec<StipendLine> = contract
        .stipends
        .entries()
        .filter(|(_, amount)| *amount > Decimal::ZERO)
        .map(|(category, amount)| StipendLine {
            category,
            amount,
            taxable: !is_stipend_non_taxable(category, contract, tables),
        })
        .collect();

    let total: Decimal = lines.iter().map(|line| line.amount).sum();
    let taxable: Decimal = lines
        .iter()
        .filter(|line| line.taxable)
        .map(|line| line.amount)
        .sum();
    let non_taxable = total - taxable;

    if !lines.is_empty() {
        trace.record(
            "stipend_taxability",
            "Stipend Taxability",
            TRAVEL_EXPENSE_REF,
            json!({
                "total": total.to_string(),
                "non_taxable_categories": non_taxable_categories,
                "is_resident": is_resident,
            }),
            json!({
                "taxable": taxable.to_string(),
                "non_taxable": non_taxable.to_string(),
            }),
            format!(
                "${} of ${} in stipends is taxable in {}",
                taxable, total, tables.state_code
            ),
        );
    }

    let resident_travel: Decimal = lines
        .iter()
        .filter(|line| is_resident && line.category.is_travel_expense())
        .map(|line| line.amount)
        .sum();
    if resident_travel > Decimal::ZERO {
        trace.warn(
            "resident_travel_stipends_taxable",
            format!(
                "Housing, travel and meal stipends of ${} are taxable because the worker is a resident of the contract location",
                resident_travel
            ),
            "medium",
        );
    }

    StipendSplit {
        lines,
        total,
        taxable,
        non_taxable,
    }
}

fn summarize_deductions(
    contract: &ContractInput,
    compensation: Decimal,
    trace: &mut AuditTrace,
) -> DeductionBreakdown {
    let deductions = &contract.deductions;
    let mut breakdown = DeductionBreakdown::default();

    for insurance in &deductions.insurance {
        let slot = match insurance.kind {
            InsuranceKind::Health => &mut breakdown.health_insurance,
            InsuranceKind::Dental => &mut breakdown.dental_insurance,
            InsuranceKind::Vision => &mut breakdown.vision_insurance,
            InsuranceKind::Life => &mut breakdown.life_insurance,
            InsuranceKind::Disability => &mut breakdown.disability_insurance,
        };
        *slot += insurance.amount;
    }

    breakdown.retirement = deductions
        .retirement
        .map_or(Decimal::ZERO, |retirement| round_money(retirement.resolve(compensation)));
    breakdown.professional_fees = deductions.professional_fees;
    breakdown.parking = deductions.parking;
    breakdown.other = deductions.other;
    breakdown.total = breakdown.health_insurance
        + breakdown.dental_insurance
        + breakdown.vision_insurance
        + breakdown.life_insurance
        + breakdown.disability_insurance
        + breakdown.retirement
        + breakdown.professional_fees
        + breakdown.parking
        + breakdown.other;

    if !breakdown.total.is_zero() {
        trace.record(
            "deductions",
            "Deductions",
            CONTRACT_TERMS,
            json!({
                "insurance_items": deductions.insurance.len(),
                "retirement": deductions.retirement,
                "compensation": compensation.to_string(),
            }),
            json!({
                "retirement": breakdown.retirement.to_string(),
                "total": breakdown.total.to_string(),
            }),
            format!(
                "Deductions total ${}, including ${} retirement",
                breakdown.total, breakdown.retirement
            ),
        );
    }

    breakdown
}

/// Returns true if income in `category` is excluded from taxable income for
/// this contract.
pub fn is_stipend_non_taxable(
    category: StipendCategory,
    contract: &ContractInput,
    tables: &TaxTables,
) -> bool {
    tables.non_taxable_stipends().contains(&category)
        && !(contract.tax_info.is_resident && category.is_travel_expense())
}
