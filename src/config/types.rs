//! Configuration types for tax and location reference data.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from the YAML tax table files.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::models::{FilingStatus, StipendCategory};

/// Metadata about the tax year the tables describe.
#[derive(Debug, Clone, Deserialize)]
pub struct TaxYearMetadata {
    /// The calendar tax year (e.g. 2025).
    pub tax_year: i32,
    /// Human-readable name of the table set.
    pub name: String,
    /// Where the published figures came from.
    pub source_url: String,
}

/// One slice of a progressive tax schedule.
///
/// Income between `min_income` and `max_income` is taxed at `rate`.
/// The top bracket has no `max_income`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    /// Lower bound of the slice (inclusive).
    pub min_income: Decimal,
    /// Upper bound of the slice, or `None` for the top bracket.
    #[serde(default)]
    pub max_income: Option<Decimal>,
    /// Marginal rate applied to income in this slice (0.22 = 22%).
    pub rate: Decimal,
}

/// A value that varies by filing status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ByFilingStatus<T> {
    /// Value for single filers.
    pub single: T,
    /// Value for married couples filing jointly.
    pub married_filing_jointly: T,
    /// Value for married individuals filing separately.
    pub married_filing_separately: T,
    /// Value for heads of household.
    pub head_of_household: T,
}

impl<T> ByFilingStatus<T> {
    /// Returns the value for the given filing status.
    pub fn get(&self, status: FilingStatus) -> &T {
        match status {
            FilingStatus::Single => &self.single,
            FilingStatus::MarriedFilingJointly => &self.married_filing_jointly,
            FilingStatus::MarriedFilingSeparately => &self.married_filing_separately,
            FilingStatus::HeadOfHousehold => &self.head_of_household,
        }
    }

    /// Iterates over every filing status and its value.
    pub fn iter(&self) -> impl Iterator<Item = (FilingStatus, &T)> {
        FilingStatus::ALL.into_iter().map(move |status| (status, self.get(status)))
    }
}

/// Social security and medicare parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct FicaRates {
    /// Employee social security rate (0.062).
    pub social_security_rate: Decimal,
    /// Annual wage base above which social security stops accruing.
    pub social_security_wage_base: Decimal,
    /// Employee medicare rate (0.0145).
    pub medicare_rate: Decimal,
    /// Additional medicare surtax rate (0.009).
    pub additional_medicare_rate: Decimal,
    /// Cumulative wages above which the surtax is withheld.
    pub additional_medicare_threshold: Decimal,
}

impl FicaRates {
    /// Returns these rates with the annual wage base and surtax threshold
    /// multiplied by `years`, for wages earned over more than one year.
    pub fn over_years(&self, years: Decimal) -> FicaRates {
        FicaRates {
            social_security_wage_base: self.social_security_wage_base * years,
            additional_medicare_threshold: self.additional_medicare_threshold * years,
            ..self.clone()
        }
    }
}

/// Federal income tax and payroll tax tables, from federal.yaml.
#[derive(Debug, Clone, Deserialize)]
pub struct FederalTaxConfig {
    /// Standard deduction by filing status.
    pub standard_deduction: ByFilingStatus<Decimal>,
    /// Amount each claimed exemption removes from taxable income.
    pub exemption_allowance: Decimal,
    /// Progressive brackets by filing status.
    pub brackets: ByFilingStatus<Vec<TaxBracket>>,
    /// Payroll tax parameters.
    pub fica: FicaRates,
    /// Stipend categories treated as non-taxable reimbursements.
    pub non_taxable_stipends: Vec<StipendCategory>,
}

/// How a state taxes wage income.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StateIncomeTax {
    /// The state levies no tax on wages.
    None,
    /// A single rate on all taxable income.
    Flat {
        /// The flat rate.
        rate: Decimal,
    },
    /// A bracket schedule applied to all filing statuses.
    Progressive {
        /// The brackets, lowest first.
        brackets: Vec<TaxBracket>,
    },
}

impl StateIncomeTax {
    /// Returns the short name of this kind of schedule.
    pub fn kind(&self) -> &'static str {
        match self {
            StateIncomeTax::None => "none",
            StateIncomeTax::Flat { .. } => "flat",
            StateIncomeTax::Progressive { .. } => "progressive",
        }
    }

    /// Returns true when the state taxes wage income.
    pub fn levies_tax(&self) -> bool {
        !matches!(self, StateIncomeTax::None)
    }
}

/// Employee-paid state disability / paid leave contribution.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DisabilityInsurance {
    /// Contribution rate on covered wages.
    pub rate: Decimal,
    /// Annual wage cap, or `None` when all wages are covered.
    #[serde(default)]
    pub wage_base: Option<Decimal>,
}

impl DisabilityInsurance {
    /// Returns this contribution with the annual wage cap multiplied by `years`.
    pub fn over_years(&self, years: Decimal) -> DisabilityInsurance {
        DisabilityInsurance {
            rate: self.rate,
            wage_base: self.wage_base.map(|cap| cap * years),
        }
    }
}

/// Cost-of-living indices, where 100 is the national average.
#[derive(Debug, Clone, Deserialize)]
pub struct CostOfLiving {
    /// Statewide index.
    pub index: Decimal,
    /// Overrides for specific cities.
    #[serde(default)]
    pub cities: HashMap<String, Decimal>,
}

/// Tax and reference data for a single state.
#[derive(Debug, Clone, Deserialize)]
pub struct StateTaxConfig {
    /// Full state name.
    pub name: String,
    /// Income tax schedule.
    pub income_tax: StateIncomeTax,
    /// Flat deduction from taxable income.
    #[serde(default)]
    pub standard_deduction: Decimal,
    /// Amount each claimed state exemption removes from taxable income.
    #[serde(default)]
    pub exemption_allowance: Decimal,
    /// Disability / paid leave withholding, if the state has one.
    #[serde(default)]
    pub disability: Option<DisabilityInsurance>,
    /// Cost-of-living data.
    pub cost_of_living: CostOfLiving,
    /// Overrides the federal non-taxable stipend list when present.
    #[serde(default)]
    pub non_taxable_stipends: Option<Vec<StipendCategory>>,
}

/// States configuration file structure.
#[derive(Debug, Clone, Deserialize)]
pub struct StatesConfig {
    /// Map of two-letter state code to state data.
    pub states: HashMap<String, StateTaxConfig>,
}

/// The tables needed to tax income earned in one state.
///
/// This is what a [`LocationDataProvider`](super::LocationDataProvider)
/// hands to the tax calculator.
#[derive(Debug, Clone)]
pub struct TaxTables {
    /// Upper-case two-letter state code.
    pub state_code: String,
    /// Federal tables.
    pub federal: FederalTaxConfig,
    /// State tables.
    pub state: StateTaxConfig,
}

impl TaxTables {
    /// Returns the stipend categories treated as non-taxable in this jurisdiction.
    pub fn non_taxable_stipends(&self) -> &[StipendCategory] {
        self.state
            .non_taxable_stipends
            .as_deref()
            .unwrap_or(&self.federal.non_taxable_stipends)
    }
}

/// The complete set of reference tables loaded from YAML files.
#[derive(Debug, Clone)]
pub struct TaxTableConfig {
    metadata: TaxYearMetadata,
    federal: FederalTaxConfig,
    states: HashMap<String, StateTaxConfig>,
}

impl TaxTableConfig {
    /// Creates a new TaxTableConfig from its component parts.
    pub fn new(
        metadata: TaxYearMetadata,
        federal: FederalTaxConfig,
        states: HashMap<String, StateTaxConfig>,
    ) -> Self {
        Self {
            metadata,
            federal,
            states,
        }
    }

    /// Returns the tax year metadata.
    pub fn metadata(&self) -> &TaxYearMetadata {
        &self.metadata
    }

    /// Returns the federal tables.
    pub fn federal(&self) -> &FederalTaxConfig {
        &self.federal
    }

    /// Returns all state tables keyed by code.
    pub fn states(&self) -> &HashMap<String, StateTaxConfig> {
        &self.states
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_by_filing_status_get() {
        let values = ByFilingStatus {
            single: 1,
            married_filing_jointly: 2,
            married_filing_separately: 3,
            head_of_household: 4,
        };
        assert_eq!(*values.get(FilingStatus::Single), 1);
        assert_eq!(*values.get(FilingStatus::HeadOfHousehold), 4);
        assert_eq!(values.iter().count(), 4);
    }

    #[test]
    fn test_deserialize_flat_income_tax() {
        let yaml = "type: flat\nrate: \"0.0495\"\n";
        let tax: StateIncomeTax = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(tax, StateIncomeTax::Flat { rate: dec("0.0495") });
        assert_eq!(tax.kind(), "flat");
        assert!(tax.levies_tax());
    }

    #[test]
    fn test_deserialize_no_income_tax() {
        let tax: StateIncomeTax = serde_yaml::from_str("type: none\n").unwrap();
        assert_eq!(tax, StateIncomeTax::None);
        assert!(!tax.levies_tax());
    }

    #[test]
    fn test_deserialize_top_bracket_without_max() {
        let yaml = "min_income: \"626350\"\nrate: \"0.37\"\n";
        let bracket: TaxBracket = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(bracket.max_income, None);
        assert_eq!(bracket.rate, dec("0.37"));
    }

    #[test]
    fn test_caps_scale_over_years() {
        let fica = FicaRates {
            social_security_rate: dec("0.062"),
            social_security_wage_base: dec("176100"),
            medicare_rate: dec("0.0145"),
            additional_medicare_rate: dec("0.009"),
            additional_medicare_threshold: dec("200000"),
        }
        .over_years(dec("2"));
        assert_eq!(fica.social_security_wage_base, dec("352200"));
        assert_eq!(fica.additional_medicare_threshold, dec("400000"));
        assert_eq!(fica.social_security_rate, dec("0.062"));

        let uncapped = DisabilityInsurance { rate: dec("0.012"), wage_base: None };
        assert_eq!(uncapped.over_years(dec("2")).wage_base, None);
        let capped = DisabilityInsurance { rate: dec("0.0053"), wage_base: Some(dec("176100")) };
        assert_eq!(capped.over_years(dec("1.5")).wage_base, Some(dec("264150.0")));
    }
}
