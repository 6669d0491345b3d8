//! Decimal rounding helpers.
//!
//! Money is rounded to cents and rates to four decimal places, both
//! half-up (away from zero on a tie).

use rust_decimal::{Decimal, RoundingStrategy};

/// Weeks in a year, used to annualize contract figures.
pub const WEEKS_PER_YEAR: Decimal = Decimal::from_parts(52, 0, 0, false, 0);

/// Decimal places kept for money amounts.
pub const MONEY_DP: u32 = 2;

/// Decimal places kept for rates and percentages.
pub const RATE_DP: u32 = 4;

/// Rounds a money amount to cents, half-up.
///
/// # Examples
///
/// ```
/// use locum_calc::calculation::round_money;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// assert_eq!(round_money(Decimal::from_str("10.005").unwrap()).to_string(), "10.01");
/// assert_eq!(round_money(Decimal::from_str("10.004").unwrap()).to_string(), "10.00");
/// ```
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(MONEY_DP, RoundingStrategy::MidpointAwayFromZero)
}

/// Rounds a rate to four decimal places, half-up.
pub fn round_rate(rate: Decimal) -> Decimal {
    rate.round_dp_with_strategy(RATE_DP, RoundingStrategy::MidpointAwayFromZero)
}

/// Returns `numerator / denominator` as a rounded rate, or zero when the
/// denominator is zero.
pub fn ratio(numerator: Decimal, denominator: Decimal) -> Decimal {
    if denominator.is_zero() {
        return Decimal::ZERO;
    }
    round_rate(numerator / denominator)
}

/// Returns `numerator / denominator` as a rounded percentage (0-100 scale),
/// or zero when the denominator is zero.
pub fn percentage(numerator: Decimal, denominator: Decimal) -> Decimal {
    if denominator.is_zero() {
        return Decimal::ZERO;
    }
    round_rate(numerator * Decimal::ONE_HUNDRED / denominator)
}

/// Divides a money amount over `periods`, returning the amount unchanged
/// when there are no periods.
pub fn per_period(amount: Decimal, periods: Decimal) -> Decimal {
    if periods.is_zero() {
        return amount;
    }
    round_money(amount / periods)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_round_money_half_up() {
        assert_eq!(round_money(dec("2.345")), dec("2.35"));
        assert_eq!(round_money(dec("2.344")), dec("2.34"));
        assert_eq!(round_money(dec("-2.345")), dec("-2.35"));
    }

    #[test]
    fn test_round_money_is_not_bankers_rounding() {
        // Banker's rounding would give 0.12
        assert_eq!(round_money(dec("0.125")), dec("0.13"));
    }

    #[test]
    fn test_round_rate_four_places() {
        assert_eq!(round_rate(dec("0.123456")), dec("0.1235"));
        assert_eq!(round_rate(dec("0.12344")), dec("0.1234"));
    }

    #[test]
    fn test_ratio_zero_denominator() {
        assert_eq!(ratio(dec("100"), Decimal::ZERO), Decimal::ZERO);
        assert_eq!(ratio(dec("1"), dec("3")), dec("0.3333"));
    }

    #[test]
    fn test_percentage() {
        assert_eq!(percentage(dec("15"), dec("100")), dec("15"));
        assert_eq!(percentage(dec("2"), dec("3")), dec("66.6667"));
        assert_eq!(percentage(dec("2"), Decimal::ZERO), Decimal::ZERO);
    }

    #[test]
    fn test_per_period() {
        assert_eq!(per_period(dec("1000"), dec("3")), dec("333.33"));
        assert_eq!(per_period(dec("1000"), Decimal::ZERO), dec("1000"));
    }
}
