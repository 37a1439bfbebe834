//! Equity compensation tax planning engine
//!
//! Turns a client's tax profile and equity grants (RSU, ISO, NSO, ESPP) into
//! planning figures:
//! - Vesting timelines with sell-to-cover withholding and the tax gap
//! - Vested, unvested and exercisable share counts
//! - AMT safe-harbor room and a multi-year ISO exercise plan within it
//! - Qualifying-disposition dates and tax savings for ISO and ESPP
//! - Estimated-payment shortfalls per IRS payment period
//!
//! Every function is pure and takes the evaluation date explicitly.
//!
//! # Builder DSL
//!
//! ```ignore
//! use equityplan_core::{ClientBuilder, GrantBuilder, PlanningConfig, evaluate_client};
//!
//! let client = ClientBuilder::new("c1")
//!     .state("CA")
//!     .bracket(35.0)
//!     .grant(GrantBuilder::iso("g1", "ACME")
//!         .granted(2023, 1, 15)
//!         .shares(8_000)
//!         .strike(4.0)
//!         .price(38.0))
//!     .build();
//!
//! let report = evaluate_client(&client, jiff::civil::date(2025, 6, 1), &PlanningConfig::default());
//! ```

#![warn(clippy::all)]

// ============================================================================
// Core modules
// ============================================================================

pub mod amt;
pub mod cache;
pub mod date_math;
pub mod disposition;
pub mod error;
pub mod evaluate;
pub mod ingest;
pub mod optimization;
pub mod quarterly;
pub mod rates;
pub mod status;
pub mod tax_tables;
pub mod vesting;

// ============================================================================
// Type definition modules
// ============================================================================

pub mod config;
pub mod model;

// ============================================================================
// Test modules
// ============================================================================

#[cfg(test)]
mod tests;

// ============================================================================
// Public re-exports for convenience
// ============================================================================

pub use amt::calculate_amt_room;
pub use cache::EvaluationCache;
pub use config::{ClientBuilder, GrantBuilder, PlanningConfig};
pub use disposition::compute_disposition_qualification;
pub use error::{ExtractionError, RetryError};
pub use evaluate::{ClientReport, GrantReport, PortfolioTotals, evaluate_client, evaluate_clients};
pub use optimization::{ExercisePlan, PlanOutcome, YearPlan, plan_multi_year_exercise};
pub use quarterly::aggregate_quarterly_tax;
pub use rates::{TaxRates, resolve_rates};
pub use status::{grant_status, holdings_summary};
pub use vesting::generate_vesting_schedule;
