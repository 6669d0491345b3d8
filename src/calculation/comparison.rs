//! Multi-contract comparison engine.
//!
//! Calculates every contract independently (in parallel), picks the best
//! contract for each ranking, measures the spread of key metrics, and
//! produces plain-language recommendations.

use std::cmp::Ordering;

use rayon::prelude::*;
use rust_decimal::Decimal;
use tracing::debug;

use super::contract::calculate_contract;
use super::recommendations::build_recommendations;
use super::rounding::{percentage, round_money};
use crate::config::LocationDataProvider;
use crate::error::{EngineError, EngineResult, Violation, ensure_valid};
use crate::models::{
    BestContracts, BestPick, ComparedContract, ComparisonOptions, ComparisonResult,
    ContractInput, DifferenceMetrics, Spread,
};

/// Fewest contracts a comparison accepts.
pub const MIN_CONTRACTS: usize = 2;

/// Compares two or more contracts.
///
/// The result does not depend on the order contracts are submitted in:
/// ties in any ranking go to the contract whose label sorts first.
///
/// # Errors
///
/// - `Validation` if fewer than two contracts are given, or listing every
///   violation across all contracts (paths prefixed `contracts[i].`)
/// - `JurisdictionNotFound` if any contract's state is unknown
/// - `Computation` if any contract's calculation fails
pub fn compare_contracts<P>(
    contracts: &[ContractInput],
    options: &ComparisonOptions,
    provider: &P,
) -> EngineResult<ComparisonResult>
where
    P: LocationDataProvider + ?Sized,
{
    if contracts.len() < MIN_CONTRACTS {
        return Err(EngineError::validation(vec![Violation::new(
            "contracts",
            format!(
                "at least {} contracts are required, got {}",
                MIN_CONTRACTS,
                contracts.len()
            ),
        )]));
    }

    let violations: Vec<Violation> = contracts
        .iter()
        .enumerate()
        .flat_map(|(i, contract)| {
            let prefix = format!("contracts[{}]", i);
            contract
                .validate()
                .into_iter()
                .map(move |violation| violation.prefixed(&prefix))
        })
        .collect();
    ensure_valid(violations)?;

    let compared = contracts
        .par_iter()
        .enumerate()
        .map(|(index, contract)| compare_one(index, contract, provider))
        .collect::<EngineResult<Vec<_>>>()?;

    let adjust = options.adjust_for_cost_of_living;
    let best = BestContracts {
        overall: best_by(&compared, |c| {
            if adjust {
                c.adjusted_net_pay
            } else {
                c.result.totals.net_annual_pay
            }
        })?,
        hourly_rate: best_by(&compared, |c| c.result.totals.effective_hourly_rate)?,
        net_pay: best_by(&compared, |c| c.result.totals.net_annual_pay)?,
        benefits: best_by(&compared, |c| c.result.metrics.benefits_value)?,
    };

    let differences = DifferenceMetrics {
        net_pay: spread(&compared, |c| c.result.totals.net_annual_pay)?,
        gross_pay: spread(&compared, |c| c.result.totals.gross_annual_pay)?,
        effective_hourly_rate: spread(&compared, |c| c.result.totals.effective_hourly_rate)?,
        benefits_value: spread(&compared, |c| c.result.metrics.benefits_value)?,
    };

    let recommendations = build_recommendations(&compared, &best, &differences, options);

    debug!(
        contracts = compared.len(),
        best_overall = %best.overall.label,
        adjusted = adjust,
        "Compared contracts"
    );

    Ok(ComparisonResult {
        contracts: compared,
        best,
        differences,
        recommendations,
        adjusted_for_cost_of_living: adjust,
    })
}

fn compare_one<P>(index: usize, contract: &ContractInput, provider: &P) -> EngineResult<ComparedContract>
where
    P: LocationDataProvider + ?Sized,
{
    let result = calculate_contract(contract, provider)?;
    let cost_of_living_index =
        provider.cost_of_living_index(&contract.location.state, contract.location.city.as_deref())?;
    if cost_of_living_index <= Decimal::ZERO {
        return Err(EngineError::Computation {
            message: format!(
                "cost-of-living index for {} must be positive, got {}",
                contract.location.state, cost_of_living_index
            ),
        });
    }

    let adjusted_net_pay =
        round_money(result.totals.net_annual_pay * Decimal::ONE_HUNDRED / cost_of_living_index);

    Ok(ComparedContract {
        index,
        label: result.label.clone(),
        cost_of_living_index,
        adjusted_net_pay,
        result,
    })
}

/// Orders contracts by `value`, breaking ties so that the label sorting
/// first ranks higher.
pub(crate) fn rank<F>(a: &ComparedContract, b: &ComparedContract, value: F) -> Ordering
where
    F: Fn(&ComparedContract) -> Decimal,
{
    value(a)
        .cmp(&value(b))
        .then_with(|| b.label.cmp(&a.label))
}

/// Returns the highest-ranked contract for `value`.
pub(crate) fn best_by<F>(contracts: &[ComparedContract], value: F) -> EngineResult<BestPick>
where
    F: Fn(&ComparedContract) -> Decimal,
{
    contracts
        .iter()
        .max_by(|a, b| rank(a, b, &value))
        .map(|winner| BestPick {
            index: winner.index,
            label: winner.label.clone(),
            value: value(winner),
        })
        .ok_or_else(no_contracts)
}

/// Returns the lowest-ranked contract for `value`.
pub(crate) fn worst_by<F>(contracts: &[ComparedContract], value: F) -> EngineResult<BestPick>
where
    F: Fn(&ComparedContract) -> Decimal,
{
    contracts
        .iter()
        .min_by(|a, b| rank(a, b, &value))
        .map(|loser| BestPick {
            index: loser.index,
            label: loser.label.clone(),
            value: value(loser),
        })
        .ok_or_else(no_contracts)
}

fn spread<F>(contracts: &[ComparedContract], value: F) -> EngineResult<Spread>
where
    F: Fn(&ComparedContract) -> Decimal,
{
    let highest = contracts.iter().map(&value).max().ok_or_else(no_contracts)?;
    let lowest = contracts.iter().map(&value).min().ok_or_else(no_contracts)?;
    let difference = highest - lowest;

    Ok(Spread {
        highest,
        lowest,
        difference,
        percentage_difference: (lowest > Decimal::ZERO).then(|| percentage(difference, lowest)),
    })
}

fn no_contracts() -> EngineError {
    EngineError::Computation {
        message: "no contract results to rank".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigLoader;
    use crate::models::{ContractType, Deductions, Location, Stipends, TaxInfo};
    use chrono::NaiveDate;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn loader() -> ConfigLoader {
        ConfigLoader::builtin().unwrap()
    }

    fn create_contract(name: &str, state: &str, city: Option<&str>, rate: &str) -> ContractInput {
        ContractInput {
            name: Some(name.to_string()),
            specialty: "Anesthesiology".to_string(),
            location: Location {
                state: state.to_string(),
                city: city.map(str::to_string),
                zip_code: None,
            },
            contract_type: ContractType::LocumTenens,
            start_date: NaiveDate::from_ymd_opt(2025, 1, 6).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2025, 4, 7).unwrap(),
            duration_weeks: None,
            hourly_rate: dec(rate),
            hours_per_week: dec("40"),
            overtime_rate: None,
            overtime_threshold: None,
            bonuses: vec![],
            stipends: Stipends::default(),
            deductions: Deductions::default(),
            tax_info: TaxInfo::default(),
            pay_frequency: None,
        }
    }

    #[test]
    fn test_requires_two_contracts() {
        let one = vec![create_contract("A", "TX", None, "100")];
        let error = compare_contracts(&one, &ComparisonOptions::default(), &loader()).unwrap_err();
        assert_eq!(error.violations().len(), 1);
        assert_eq!(error.violations()[0].field, "contracts");

        let none: Vec<ContractInput> = vec![];
        assert!(compare_contracts(&none, &ComparisonOptions::default(), &loader()).is_err());
    }

    #[test]
    fn test_violations_from_all_contracts_prefixed() {
        let mut first = create_contract("A", "TX", None, "100");
        first.hourly_rate = dec("-1");
        let mut second = create_contract("B", "TX", None, "100");
        second.hours_per_week = dec("500");

        let error = compare_contracts(&[first, second], &ComparisonOptions::default(), &loader())
            .unwrap_err();
        let fields: Vec<&str> = error.violations().iter().map(|v| v.field.as_str()).collect();
        assert_eq!(
            fields,
            vec!["contracts[0].hourly_rate", "contracts[1].hours_per_week"]
        );
    }

    #[test]
    fn test_best_picks_and_spreads() {
        let contracts = vec![
            create_contract("Houston", "TX", Some("Houston"), "120"),
            create_contract("Boston", "MA", Some("Boston"), "110"),
        ];
        let result =
            compare_contracts(&contracts, &ComparisonOptions::default(), &loader()).unwrap();

        assert_eq!(result.contracts.len(), 2);
        assert_eq!(result.contracts[0].label, "Houston");
        assert_eq!(result.contracts[1].index, 1);
        assert_eq!(result.best.net_pay.label, "Houston");
        assert_eq!(result.best.overall, result.best.net_pay);
        assert_eq!(result.best.hourly_rate.label, "Houston");

        let net = &result.differences.net_pay;
        assert_eq!(net.highest, result.contracts[0].result.totals.net_annual_pay);
        assert_eq!(net.lowest, result.contracts[1].result.totals.net_annual_pay);
        assert_eq!(net.difference, net.highest - net.lowest);
        assert_eq!(
            net.percentage_difference,
            Some(percentage(net.difference, net.lowest))
        );
        assert_eq!(result.contracts[1].cost_of_living_index, dec("153"));
        assert!(!result.adjusted_for_cost_of_living);
    }

    #[test]
    fn test_cost_of_living_adjustment_changes_overall_winner() {
        // San Francisco pays more but costs far more
        let contracts = vec![
            create_contract("San Francisco", "CA", Some("San Francisco"), "130"),
            create_contract("San Antonio", "TX", Some("San Antonio"), "100"),
        ];
        let raw = compare_contracts(&contracts, &ComparisonOptions::default(), &loader()).unwrap();
        let adjusted = compare_contracts(
            &contracts,
            &ComparisonOptions {
                adjust_for_cost_of_living: true,
            },
            &loader(),
        )
        .unwrap();

        assert_eq!(raw.best.overall.label, "San Francisco");
        assert_eq!(adjusted.best.overall.label, "San Antonio");
        assert!(adjusted.adjusted_for_cost_of_living);
        assert_eq!(raw.best.net_pay, adjusted.best.net_pay);
        assert_eq!(
            adjusted.contracts[1].adjusted_net_pay,
            round_money(adjusted.contracts[1].result.totals.net_annual_pay * dec("100") / dec("91"))
        );
    }

    #[test]
    fn test_order_independent() {
        let a = create_contract("Alpha", "NY", Some("New York"), "150");
        let b = create_contract("Bravo", "FL", None, "130");
        let options = ComparisonOptions {
            adjust_for_cost_of_living: true,
        };

        let forward = compare_contracts(&[a.clone(), b.clone()], &options, &loader()).unwrap();
        let reverse = compare_contracts(&[b, a], &options, &loader()).unwrap();

        assert_eq!(forward.best.overall.label, reverse.best.overall.label);
        assert_eq!(forward.best.net_pay.label, reverse.best.net_pay.label);
        assert_eq!(forward.differences, reverse.differences);
        assert_eq!(forward.recommendations, reverse.recommendations);
    }

    #[test]
    fn test_ties_broken_by_label() {
        let contracts = vec![
            create_contract("Zulu", "TX", None, "100"),
            create_contract("Alpha", "TX", None, "100"),
        ];
        let result =
            compare_contracts(&contracts, &ComparisonOptions::default(), &loader()).unwrap();

        assert_eq!(result.best.net_pay.label, "Alpha");
        assert_eq!(result.best.net_pay.index, 1);
        assert_eq!(result.differences.net_pay.difference, Decimal::ZERO);
    }

    #[test]
    fn test_zero_lowest_has_no_percentage() {
        let free = create_contract("Volunteer", "TX", None, "0");
        let contracts = vec![free, create_contract("Paid", "TX", None, "100")];

        let result =
            compare_contracts(&contracts, &ComparisonOptions::default(), &loader()).unwrap();
        assert_eq!(result.differences.net_pay.lowest, Decimal::ZERO);
        assert_eq!(result.differences.net_pay.percentage_difference, None);
    }

    #[test]
    fn test_unknown_state_fails_whole_comparison() {
        let contracts = vec![
            create_contract("A", "TX", None, "100"),
            create_contract("B", "PR", None, "100"),
        ];
        let result = compare_contracts(&contracts, &ComparisonOptions::default(), &loader());
        assert!(matches!(result, Err(EngineError::JurisdictionNotFound { .. })));
    }

    #[test]
    fn test_worst_by_mirrors_best_by() {
        let contracts = vec![
            create_contract("High", "TX", None, "200"),
            create_contract("Low", "TX", None, "100"),
        ];
        let result =
            compare_contracts(&contracts, &ComparisonOptions::default(), &loader()).unwrap();
        let worst = worst_by(&result.contracts, |c| c.result.totals.net_annual_pay).unwrap();
        assert_eq!(worst.label, "Low");
        assert_eq!(result.best.net_pay.label, "High");
    }
}
