//! Calculation logic for the locum calculation engine.
//!
//! This module contains the tax calculator (bracket computation, payroll
//! taxes and withholding), the contract and paycheck engines, and the
//! comparison engine with its recommendations. Every function here is pure:
//! results depend only on the inputs and the reference data passed in.

mod brackets;
mod comparison;
mod contract;
mod fica;
mod paycheck;
mod recommendations;
mod rounding;
mod tax;

/// Version stamped on every result.
pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");

pub use brackets::{bracket_tax, marginal_rate, reduce_by_allowances};
pub use comparison::{MIN_CONTRACTS, compare_contracts};
pub use contract::{calculate_contract, is_stipend_non_taxable};
pub use fica::{
    additional_medicare_tax, medicare_tax, social_security_tax, state_disability_tax,
    wages_below_cap,
};
pub use paycheck::calculate_paycheck;
pub use recommendations::{
    BENEFITS_GAP_PERCENT, NEAR_PARITY_PERCENT, TAKE_HOME_GAP_PERCENT, TAX_RATE_GAP_POINTS,
    build_recommendations,
};
pub use rounding::{
    MONEY_DP, RATE_DP, WEEKS_PER_YEAR, per_period, percentage, ratio, round_money, round_rate,
};
pub use tax::{TaxInput, compute_taxes, compute_taxes_with_tables};
