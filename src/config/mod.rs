//! Tax table and location reference data.
//!
//! This module loads federal and state tax tables, payroll tax parameters and
//! cost-of-living indices from YAML files, and serves them to the engines
//! through the [`LocationDataProvider`] trait.
//!
//! # Example
//!
//! ```
//! use locum_calc::config::{ConfigLoader, LocationDataProvider};
//!
//! let config = ConfigLoader::builtin().unwrap();
//! println!("Loaded tables: {}", config.metadata().name);
//! let index = config.cost_of_living_index("NY", Some("New York City")).unwrap();
//! assert!(index > rust_decimal::Decimal::ONE_HUNDRED);
//! ```

mod loader;
mod provider;
mod types;

pub use loader::ConfigLoader;
pub use provider::{LocationDataProvider, US_STATE_CODES, normalize_state_code};
pub use types::{
    ByFilingStatus, CostOfLiving, DisabilityInsurance, FederalTaxConfig, FicaRates,
    StateIncomeTax, StateTaxConfig, StatesConfig, TaxBracket, TaxTableConfig, TaxTables,
    TaxYearMetadata,
};
