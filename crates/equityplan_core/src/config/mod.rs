//! Planning configuration
//!
//! `PlanningConfig` carries the knobs a caller picks per evaluation. The
//! evaluation date is deliberately not part of it: every entry point takes
//! `as_of` explicitly so results never depend on the wall clock.
//!
//! # Builder DSL
//!
//! ```ignore
//! use equityplan_core::config::{ClientBuilder, GrantBuilder};
//!
//! let client = ClientBuilder::new("c1")
//!     .married_joint()
//!     .grant(GrantBuilder::rsu("g1", "ACME").granted(2024, 3, 1).shares(4_000).price(50.0))
//!     .build();
//! ```

use serde::{Deserialize, Serialize};

pub mod builder;

pub use builder::{ClientBuilder, GrantBuilder};

/// Shortest exercise-planning horizon, in years
pub const MIN_HORIZON_YEARS: u8 = 2;
/// Longest exercise-planning horizon, in years
pub const MAX_HORIZON_YEARS: u8 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlanningConfig {
    /// Years the ISO exercise optimizer spreads exercises over
    pub horizon_years: u8,
}

impl Default for PlanningConfig {
    fn default() -> Self {
        Self { horizon_years: 3 }
    }
}

impl PlanningConfig {
    #[must_use]
    pub fn with_horizon(horizon_years: u8) -> Self {
        Self { horizon_years }
    }

    /// Horizon clamped into the supported range.
    pub fn horizon(&self) -> u8 {
        clamp_horizon(self.horizon_years)
    }
}

pub fn clamp_horizon(years: u8) -> u8 {
    years.clamp(MIN_HORIZON_YEARS, MAX_HORIZON_YEARS)
}
