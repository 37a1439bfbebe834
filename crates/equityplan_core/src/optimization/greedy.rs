//! Greedy year-by-year allocation
//!
//! Fills each year up to the AMT room before moving to the next. With a
//! constant spread and constant room this is optimal for minimizing the
//! number of years that breach the room; it is not a price forecast.

use super::result::{PlanOutcome, YearPlan};

/// Inputs held constant across the horizon
#[derive(Debug, Clone, Copy)]
pub struct GreedyInputs {
    pub available: u64,
    pub max_safe_per_year: u64,
    pub spread_per_share: f64,
    pub strike: f64,
    /// Ordinary minus LTCG rate
    pub rate_differential: f64,
    pub first_year: i16,
    pub horizon_years: u8,
}

pub fn allocate_greedy(inputs: &GreedyInputs) -> (Vec<YearPlan>, u64, PlanOutcome) {
    let mut remaining = inputs.available;
    let mut years = Vec::with_capacity(inputs.horizon_years as usize);

    if inputs.max_safe_per_year == 0 {
        return (years, remaining, PlanOutcome::NoCapacity);
    }

    for offset in 0..inputs.horizon_years as i16 {
        if remaining == 0 {
            break;
        }
        let shares = remaining.min(inputs.max_safe_per_year);
        let spread = shares as f64 * inputs.spread_per_share;
        remaining -= shares;

        years.push(YearPlan {
            year: inputs.first_year + offset,
            shares,
            spread,
            exercise_cost: shares as f64 * inputs.strike,
            tax_savings: spread * inputs.rate_differential,
            remaining_after: remaining,
        });
    }

    let outcome = if remaining == 0 {
        PlanOutcome::Complete
    } else {
        PlanOutcome::HorizonExhausted
    };
    (years, remaining, outcome)
}
