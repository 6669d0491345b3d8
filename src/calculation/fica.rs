//! Payroll taxes: social security, medicare and state disability.
//!
//! All functions take the current wages and the wages already paid earlier
//! in the year, so caps and thresholds apply to cumulative wages rather than
//! to each paycheck on its own.

use rust_decimal::Decimal;

use super::rounding::round_money;
use crate::config::{DisabilityInsurance, FicaRates};

/// Returns the part of `wages` that falls under `cap` once `prior_wages`
/// have been counted.
pub fn wages_below_cap(wages: Decimal, prior_wages: Decimal, cap: Decimal) -> Decimal {
    let remaining = (cap - prior_wages).max(Decimal::ZERO);
    wages.min(remaining).max(Decimal::ZERO)
}

/// Social security on wages up to the annual wage base.
///
/// # Examples
///
/// ```
/// use locum_calc::calculation::wages_below_cap;
/// use rust_decimal::Decimal;
///
/// // 176,100 base, 170,000 already paid: only 6,100 of a 10,000 paycheck is covered
/// let covered = wages_below_cap(Decimal::from(10_000), Decimal::from(170_000), Decimal::from(176_100));
/// assert_eq!(covered, Decimal::from(6_100));
/// ```
pub fn social_security_tax(wages: Decimal, prior_wages: Decimal, rates: &FicaRates) -> Decimal {
    let covered = wages_below_cap(wages, prior_wages, rates.social_security_wage_base);
    round_money(covered * rates.social_security_rate)
}

/// Medicare at the base rate on all wages.
pub fn medicare_tax(wages: Decimal, rates: &FicaRates) -> Decimal {
    round_money(wages.max(Decimal::ZERO) * rates.medicare_rate)
}

/// Additional medicare surtax on the part of cumulative wages above the
/// threshold.
///
/// Only wages paid after cumulative wages cross the threshold are taxed, so
/// a paycheck that straddles the threshold is taxed on its upper part only.
pub fn additional_medicare_tax(wages: Decimal, prior_wages: Decimal, rates: &FicaRates) -> Decimal {
    let threshold = rates.additional_medicare_threshold;
    let above_after = (prior_wages + wages - threshold).max(Decimal::ZERO);
    let above_before = (prior_wages - threshold).max(Decimal::ZERO);
    round_money((above_after - above_before) * rates.additional_medicare_rate)
}

/// State disability / paid leave contribution, capped by the wage base when
/// the state has one.
pub fn state_disability_tax(
    wages: Decimal,
    prior_wages: Decimal,
    disability: Option<&DisabilityInsurance>,
) -> Decimal {
    let Some(disability) = disability else {
        return Decimal::ZERO;
    };

    let covered = match disability.wage_base {
        Some(cap) => wages_below_cap(wages, prior_wages, cap),
        None => wages.max(Decimal::ZERO),
    };
    round_money(covered * disability.rate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn rates_2025() -> FicaRates {
        FicaRates {
            social_security_rate: dec("0.062"),
            social_security_wage_base: dec("176100"),
            medicare_rate: dec("0.0145"),
            additional_medicare_rate: dec("0.009"),
            additional_medicare_threshold: dec("200000"),
        }
    }

    #[test]
    fn test_social_security_below_wage_base() {
        assert_eq!(
            social_security_tax(dec("5000"), Decimal::ZERO, &rates_2025()),
            dec("310.00")
        );
    }

    #[test]
    fn test_social_security_straddling_wage_base() {
        // Only 6100 remains under the base
        assert_eq!(
            social_security_tax(dec("10000"), dec("170000"), &rates_2025()),
            dec("378.20")
        );
    }

    #[test]
    fn test_social_security_after_wage_base() {
        assert_eq!(
            social_security_tax(dec("10000"), dec("180000"), &rates_2025()),
            Decimal::ZERO
        );
        assert_eq!(
            social_security_tax(dec("10000"), dec("176100"), &rates_2025()),
            Decimal::ZERO
        );
    }

    #[test]
    fn test_medicare_is_uncapped() {
        assert_eq!(medicare_tax(dec("10000"), &rates_2025()), dec("145.00"));
        assert_eq!(medicare_tax(dec("1000000"), &rates_2025()), dec("14500.00"));
    }

    #[test]
    fn test_additional_medicare_below_threshold() {
        assert_eq!(
            additional_medicare_tax(dec("10000"), dec("150000"), &rates_2025()),
            Decimal::ZERO
        );
    }

    #[test]
    fn test_additional_medicare_crossing_threshold() {
        // 5000 of the paycheck is above 200000
        assert_eq!(
            additional_medicare_tax(dec("10000"), dec("195000"), &rates_2025()),
            dec("45.00")
        );
    }

    #[test]
    fn test_additional_medicare_fully_above_threshold() {
        assert_eq!(
            additional_medicare_tax(dec("10000"), dec("250000"), &rates_2025()),
            dec("90.00")
        );
    }

    #[test]
    fn test_state_disability_without_program() {
        assert_eq!(
            state_disability_tax(dec("10000"), Decimal::ZERO, None),
            Decimal::ZERO
        );
    }

    #[test]
    fn test_state_disability_uncapped() {
        let sdi = DisabilityInsurance {
            rate: dec("0.012"),
            wage_base: None,
        };
        assert_eq!(
            state_disability_tax(dec("10000"), dec("500000"), Some(&sdi)),
            dec("120.00")
        );
    }

    #[test]
    fn test_state_disability_capped() {
        let pfl = DisabilityInsurance {
            rate: dec("0.00388"),
            wage_base: Some(dec("91373.26")),
        };
        assert_eq!(
            state_disability_tax(dec("10000"), dec("91373.26"), Some(&pfl)),
            Decimal::ZERO
        );
        // 1373.26 x 0.00388 = 5.3282...
        assert_eq!(
            state_disability_tax(dec("10000"), dec("90000"), Some(&pfl)),
            dec("5.33")
        );
    }
}
