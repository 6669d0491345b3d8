//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading tax and
//! location tables from YAML files.

use rust_decimal::Decimal;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::error::{EngineError, EngineResult};

use super::provider::{LocationDataProvider, US_STATE_CODES, normalize_state_code};
use super::types::{
    FederalTaxConfig, StateIncomeTax, StateTaxConfig, StatesConfig, TaxBracket, TaxTableConfig,
    TaxTables, TaxYearMetadata,
};

const BUILTIN_TAX_YEAR: &str = include_str!("../../config/us_2025/tax_year.yaml");
const BUILTIN_FEDERAL: &str = include_str!("../../config/us_2025/federal.yaml");
const BUILTIN_STATES: &str = include_str!("../../config/us_2025/states.yaml");

/// Loads and provides access to tax and location reference tables.
///
/// The `ConfigLoader` reads YAML files from a directory and serves them
/// through [`LocationDataProvider`].
///
/// # Directory Structure
///
/// ```text
/// config/us_2025/
/// ├── tax_year.yaml   # Tax year metadata
/// ├── federal.yaml    # Federal brackets, deductions and FICA parameters
/// └── states.yaml     # Per-state income tax, disability and cost of living
/// ```
///
/// # Example
///
/// ```
/// use locum_calc::config::{ConfigLoader, LocationDataProvider};
///
/// let loader = ConfigLoader::builtin().unwrap();
/// let tables = loader.tax_tables("TX").unwrap();
/// assert!(!tables.state.income_tax.levies_tax());
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: TaxTableConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - Any required file is missing
    /// - Any file contains invalid YAML
    /// - The tables are incomplete or inconsistent (missing states, gaps between brackets)
    ///
    /// # Example
    ///
    /// ```no_run
    /// use locum_calc::config::ConfigLoader;
    ///
    /// let loader = ConfigLoader::load("./config/us_2025")?;
    /// # Ok::<(), locum_calc::error::EngineError>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let metadata = Self::load_yaml::<TaxYearMetadata>(&path.join("tax_year.yaml"))?;
        let federal = Self::load_yaml::<FederalTaxConfig>(&path.join("federal.yaml"))?;
        let states_path = path.join("states.yaml");
        let states = Self::load_yaml::<StatesConfig>(&states_path)?;

        Self::from_parts(metadata, federal, states, &path.display().to_string())
    }

    /// Loads the tables compiled into the binary (tax year 2025).
    pub fn builtin() -> EngineResult<Self> {
        let metadata = Self::parse_yaml::<TaxYearMetadata>("builtin:tax_year.yaml", BUILTIN_TAX_YEAR)?;
        let federal = Self::parse_yaml::<FederalTaxConfig>("builtin:federal.yaml", BUILTIN_FEDERAL)?;
        let states = Self::parse_yaml::<StatesConfig>("builtin:states.yaml", BUILTIN_STATES)?;

        Self::from_parts(metadata, federal, states, "builtin")
    }

    fn from_parts(
        metadata: TaxYearMetadata,
        federal: FederalTaxConfig,
        states: StatesConfig,
        source: &str,
    ) -> EngineResult<Self> {
        let states: HashMap<String, StateTaxConfig> = states
            .states
            .into_iter()
            .map(|(code, state)| (code.to_ascii_uppercase(), state))
            .collect();

        Self::check_federal(&federal, source)?;
        Self::check_states(&states, source)?;

        Ok(Self {
            config: TaxTableConfig::new(metadata, federal, states),
        })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        Self::parse_yaml(&path_str, &content)
    }

    fn parse_yaml<T: serde::de::DeserializeOwned>(path: &str, content: &str) -> EngineResult<T> {
        serde_yaml::from_str(content).map_err(|e| EngineError::ConfigParseError {
            path: path.to_string(),
            message: e.to_string(),
        })
    }

    fn check_federal(federal: &FederalTaxConfig, source: &str) -> EngineResult<()> {
        for (status, brackets) in federal.brackets.iter() {
            check_brackets(brackets)
                .map_err(|message| parse_error(source, format!("federal {:?}: {}", status, message)))?;
        }
        let fica = &federal.fica;
        for (name, rate) in [
            ("social_security_rate", fica.social_security_rate),
            ("medicare_rate", fica.medicare_rate),
            ("additional_medicare_rate", fica.additional_medicare_rate),
        ] {
            check_rate(rate).map_err(|message| parse_error(source, format!("fica.{}: {}", name, message)))?;
        }
        Ok(())
    }

    fn check_states(states: &HashMap<String, StateTaxConfig>, source: &str) -> EngineResult<()> {
        let missing: Vec<&str> = US_STATE_CODES
            .iter()
            .copied()
            .filter(|code| !states.contains_key(*code))
            .collect();
        if !missing.is_empty() {
            return Err(parse_error(
                source,
                format!("missing states: {}", missing.join(", ")),
            ));
        }

        if let Some(unknown) = states.keys().find(|code| normalize_state_code(code).is_none()) {
            return Err(parse_error(source, format!("unknown state code: {}", unknown)));
        }

        for (code, state) in states {
            match &state.income_tax {
                StateIncomeTax::None => {}
                StateIncomeTax::Flat { rate } => check_rate(*rate)
                    .map_err(|message| parse_error(source, format!("{}: {}", code, message)))?,
                StateIncomeTax::Progressive { brackets } => check_brackets(brackets)
                    .map_err(|message| parse_error(source, format!("{}: {}", code, message)))?,
            }
            if let Some(disability) = &state.disability {
                check_rate(disability.rate).map_err(|message| {
                    parse_error(source, format!("{} disability: {}", code, message))
                })?;
            }
            let mut indices = std::iter::once(&state.cost_of_living.index)
                .chain(state.cost_of_living.cities.values());
            if indices.any(|index| *index <= Decimal::ZERO) {
                return Err(parse_error(
                    source,
                    format!("{}: cost of living index must be positive", code),
                ));
            }
        }
        Ok(())
    }

    /// Returns the underlying configuration.
    pub fn config(&self) -> &TaxTableConfig {
        &self.config
    }

    /// Returns the tax year metadata.
    pub fn metadata(&self) -> &TaxYearMetadata {
        self.config.metadata()
    }

    /// Gets a state's tables by code.
    ///
    /// # Example
    ///
    /// ```
    /// use locum_calc::config::ConfigLoader;
    ///
    /// let loader = ConfigLoader::builtin()?;
    /// let state = loader.get_state("ca")?;
    /// assert_eq!(state.name, "California");
    /// # Ok::<(), locum_calc::error::EngineError>(())
    /// ```
    pub fn get_state(&self, code: &str) -> EngineResult<&StateTaxConfig> {
        normalize_state_code(code)
            .and_then(|normalized| self.config.states().get(&normalized))
            .ok_or_else(|| EngineError::JurisdictionNotFound {
                code: code.to_string(),
            })
    }
}

impl LocationDataProvider for ConfigLoader {
    fn tax_tables(&self, state: &str) -> EngineResult<TaxTables> {
        let state_config = self.get_state(state)?;
        Ok(TaxTables {
            state_code: state.trim().to_ascii_uppercase(),
            federal: self.config.federal().clone(),
            state: state_config.clone(),
        })
    }

    fn cost_of_living_index(&self, state: &str, city: Option<&str>) -> EngineResult<Decimal> {
        let state_config = self.get_state(state)?;
        let city_index = city.and_then(|city| {
            let city = city.trim();
            state_config
                .cost_of_living
                .cities
                .iter()
                .find(|(name, _)| name.eq_ignore_ascii_case(city))
                .map(|(_, index)| *index)
        });
        Ok(city_index.unwrap_or(state_config.cost_of_living.index))
    }
}

fn parse_error(source: &str, message: String) -> EngineError {
    EngineError::ConfigParseError {
        path: source.to_string(),
        message,
    }
}

fn check_rate(rate: Decimal) -> Result<(), String> {
    if rate < Decimal::ZERO || rate >= Decimal::ONE {
        return Err(format!("rate {} must be in [0, 1)", rate));
    }
    Ok(())
}

/// Brackets must start at zero, be contiguous, and end with an open top bracket.
fn check_brackets(brackets: &[TaxBracket]) -> Result<(), String> {
    let first = brackets.first().ok_or("bracket schedule is empty")?;
    if !first.min_income.is_zero() {
        return Err("first bracket must start at 0".to_string());
    }
    for (i, bracket) in brackets.iter().enumerate() {
        check_rate(bracket.rate)?;
        let is_last = i + 1 == brackets.len();
        match (bracket.max_income, is_last) {
            (None, true) => {}
            (None, false) => return Err(format!("bracket {} has no upper bound", i)),
            (Some(_), true) => return Err("top bracket must have no upper bound".to_string()),
            (Some(max), false) => {
                if max <= bracket.min_income {
                    return Err(format!("bracket {} upper bound must exceed lower bound", i));
                }
                if brackets[i + 1].min_income != max {
                    return Err(format!("gap or overlap after bracket {}", i));
                }
            }
        }
    }
    Ok(())
}
