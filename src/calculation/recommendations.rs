//! Plain-language recommendations for a contract comparison.
//!
//! Each recommendation fires when a metric gap crosses a fixed threshold.
//! Contracts are named by label; when two contracts share a label, their
//! submitted position is added so the text stays unambiguous.

use rust_decimal::{Decimal, RoundingStrategy};

use super::comparison::{best_by, worst_by};
use crate::models::{
    BestContracts, BestPick, ComparedContract, ComparisonOptions, DifferenceMetrics,
};

/// Take-home gap, in percent, worth calling out.
pub const TAKE_HOME_GAP_PERCENT: Decimal = Decimal::from_parts(5, 0, 0, false, 0);

/// Benefits gap, in percent, worth calling out.
pub const BENEFITS_GAP_PERCENT: Decimal = Decimal::from_parts(20, 0, 0, false, 0);

/// Effective tax rate gap, in percentage points, worth calling out.
pub const TAX_RATE_GAP_POINTS: Decimal = Decimal::from_parts(3, 0, 0, false, 0);

/// Take-home gap, in percent, below which contracts are treated as equivalent.
pub const NEAR_PARITY_PERCENT: Decimal = Decimal::from_parts(2, 0, 0, false, 0);

/// Builds the recommendation list for a comparison.
pub fn build_recommendations(
    contracts: &[ComparedContract],
    best: &BestContracts,
    differences: &DifferenceMetrics,
    options: &ComparisonOptions,
) -> Vec<String> {
    let mut recommendations = Vec::new();
    let name = |pick: &BestPick| display_name(contracts, pick);

    let net_gap = differences.net_pay.percentage_difference;
    if let Some(gap) = net_gap.filter(|gap| *gap >= TAKE_HOME_GAP_PERCENT) {
        if let Ok(lowest) = worst_by(contracts, |c| c.result.totals.net_annual_pay) {
            recommendations.push(format!(
                "{} offers {}% higher take-home pay than {} (${} more)",
                name(&best.net_pay),
                one_place(gap),
                name(&lowest),
                differences.net_pay.difference
            ));
        }
    }

    if let Some(gap) = differences
        .benefits_value
        .percentage_difference
        .filter(|gap| *gap >= BENEFITS_GAP_PERCENT)
    {
        if let Ok(lowest) = worst_by(contracts, |c| c.result.metrics.benefits_value) {
            recommendations.push(format!(
                "{} provides {}% more in stipends and benefits than {}",
                name(&best.benefits),
                one_place(gap),
                name(&lowest)
            ));
        }
    }

    let lowest_tax = worst_by(contracts, |c| c.result.metrics.effective_tax_rate);
    let highest_tax = best_by(contracts, |c| c.result.metrics.effective_tax_rate);
    if let (Ok(lowest_tax), Ok(highest_tax)) = (lowest_tax, highest_tax) {
        let gap_points = (highest_tax.value - lowest_tax.value) * Decimal::ONE_HUNDRED;
        if gap_points >= TAX_RATE_GAP_POINTS {
            recommendations.push(format!(
                "{} has the lowest effective tax rate ({}%), {} points below {}",
                name(&lowest_tax),
                one_place(lowest_tax.value * Decimal::ONE_HUNDRED),
                one_place(gap_points),
                name(&highest_tax)
            ));
        }
    }

    if best.hourly_rate.index != best.net_pay.index {
        recommendations.push(format!(
            "{} pays the highest effective hourly rate, but {} delivers more total take-home pay",
            name(&best.hourly_rate),
            name(&best.net_pay)
        ));
    }

    if options.adjust_for_cost_of_living && best.overall.index != best.net_pay.index {
        recommendations.push(format!(
            "After adjusting for cost of living, {} comes out ahead of {}",
            name(&best.overall),
            name(&best.net_pay)
        ));
    }

    if net_gap.is_some_and(|gap| gap < NEAR_PARITY_PERCENT) {
        recommendations.push(format!(
            "Take-home pay is within {}% across all contracts; weigh schedule, location and call requirements instead",
            NEAR_PARITY_PERCENT
        ));
    }

    recommendations
}

fn display_name(contracts: &[ComparedContract], pick: &BestPick) -> String {
    let shared = contracts.iter().filter(|c| c.label == pick.label).count() > 1;
    if shared {
        format!("{} (#{})", pick.label, pick.index + 1)
    } else {
        pick.label.clone()
    }
}

fn one_place(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
}
