//! Multi-year ISO exercise planning
//!
//! Sizes ISO exercises so each year's bargain element stays within the
//! client's AMT room, then spreads the available shares across a 2–5 year
//! horizon. Per-share spread and the room are held constant over the
//! horizon; this is a planning simplification.
//!
//! # Example
//!
//! ```ignore
//! use equityplan_core::optimization::plan_multi_year_exercise;
//!
//! let plan = plan_multi_year_exercise(&grant, &status, amt_room, &rates, 3, as_of);
//! for year in &plan.years {
//!     println!("{}: exercise {} shares", year.year, year.shares);
//! }
//! if plan.needs_longer_horizon() {
//!     println!("{} shares left over", plan.remaining_shares);
//! }
//! ```

mod greedy;
mod result;

pub use greedy::{GreedyInputs, allocate_greedy};
pub use result::{ExercisePlan, PlanOutcome, YearPlan};

use jiff::civil::Date;

use crate::config::clamp_horizon;
use crate::model::{Grant, GrantStatus, GrantType};
use crate::rates::TaxRates;

/// Largest whole number of shares whose spread fits in the room.
pub fn max_safe_shares_per_year(amt_room: f64, spread_per_share: f64) -> u64 {
    if spread_per_share > 0.0 && amt_room > 0.0 {
        (amt_room / spread_per_share).floor() as u64
    } else {
        0
    }
}

/// Plan exercises of an ISO grant's available shares starting in `as_of`'s year.
///
/// `years` is clamped to the supported 2–5 year range. Non-ISO grants get an
/// empty plan.
pub fn plan_multi_year_exercise(
    grant: &Grant,
    status: &GrantStatus,
    amt_room: f64,
    rates: &TaxRates,
    years: u8,
    as_of: Date,
) -> ExercisePlan {
    let horizon_years = clamp_horizon(years);
    if grant.grant_type != GrantType::Iso {
        return ExercisePlan::not_applicable(horizon_years);
    }

    let strike = grant.strike();
    let spread_per_share = (grant.current_price - strike).max(0.0);
    let max_safe = max_safe_shares_per_year(amt_room, spread_per_share);

    let (plan_years, remaining_shares, outcome) = allocate_greedy(&GreedyInputs {
        available: status.available,
        max_safe_per_year: max_safe,
        spread_per_share,
        strike,
        rate_differential: rates.ordinary_ltcg_differential(),
        first_year: as_of.year(),
        horizon_years,
    });

    tracing::debug!(
        grant = %grant.id,
        available = status.available,
        max_safe,
        remaining_shares,
        ?outcome,
        "planned ISO exercises"
    );

    ExercisePlan {
        spread_per_share,
        max_safe_shares_per_year: max_safe,
        horizon_years,
        years: plan_years,
        remaining_shares,
        outcome,
    }
}
