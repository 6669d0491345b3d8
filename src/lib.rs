//! Contract and paycheck calculation engine for locum tenens offers
//!
//! This crate calculates take-home pay for healthcare contracts and
//! individual paychecks with decimal-precise US federal, state and payroll
//! tax arithmetic, and compares contracts side by side.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
