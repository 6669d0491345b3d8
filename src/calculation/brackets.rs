//! Progressive bracket computation.

use rust_decimal::Decimal;

use crate::config::TaxBracket;

/// Applies a progressive schedule to annual taxable income.
///
/// Each bracket taxes only the slice of income that falls between its
/// bounds, so the result is the sum of `amount-in-bracket x rate` over all
/// brackets. The result is not rounded.
///
/// # Examples
///
/// ```
/// use locum_calc::calculation::bracket_tax;
/// use locum_calc::config::TaxBracket;
/// use rust_decimal::Decimal;
///
/// let brackets = vec![
///     TaxBracket { min_income: Decimal::ZERO, max_income: Some(Decimal::from(10_000)), rate: Decimal::new(10, 2) },
///     TaxBracket { min_income: Decimal::from(10_000), max_income: None, rate: Decimal::new(20, 2) },
/// ];
///
/// // 10,000 x 10% + 5,000 x 20%
/// assert_eq!(bracket_tax(&brackets, Decimal::from(15_000)), Decimal::from(2_000));
/// ```
pub fn bracket_tax(brackets: &[TaxBracket], income: Decimal) -> Decimal {
    if income <= Decimal::ZERO {
        return Decimal::ZERO;
    }

    brackets
        .iter()
        .filter(|bracket| income > bracket.min_income)
        .map(|bracket| {
            let upper = bracket.max_income.map_or(income, |max| max.min(income));
            (upper - bracket.min_income) * bracket.rate
        })
        .sum()
}

/// Returns the rate of the bracket that the last dollar of `income` falls in.
pub fn marginal_rate(brackets: &[TaxBracket], income: Decimal) -> Decimal {
    brackets
        .iter()
        .rev()
        .find(|bracket| income > bracket.min_income)
        .or_else(|| brackets.first())
        .map_or(Decimal::ZERO, |bracket| bracket.rate)
}

/// Subtracts the standard deduction and exemption allowances from annual
/// income, floored at zero.
pub fn reduce_by_allowances(
    income: Decimal,
    standard_deduction: Decimal,
    exemptions: u32,
    allowance_per_exemption: Decimal,
) -> Decimal {
    let reduction = standard_deduction + Decimal::from(exemptions) * allowance_per_exemption;
    (income - reduction).max(Decimal::ZERO)
}
