//! Exercise plan result types

use serde::{Deserialize, Serialize};

/// Exercises allocated to one calendar year
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearPlan {
    pub year: i16,
    pub shares: u64,
    /// Bargain element recognized for AMT this year
    pub spread: f64,
    /// Cash needed to pay the strike
    pub exercise_cost: f64,
    /// Tax avoided if these shares later qualify for LTCG treatment
    pub tax_savings: f64,
    /// Unallocated shares after this year
    pub remaining_after: u64,
}

/// Why the planner stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanOutcome {
    /// Every available share was placed within the horizon
    Complete,
    /// Shares remain after the last year; a longer horizon would place more
    HorizonExhausted,
    /// Zero spread (or zero room): nothing can be sized against AMT room
    NoCapacity,
    /// Grant is not an ISO
    NotApplicable,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExercisePlan {
    pub spread_per_share: f64,
    pub max_safe_shares_per_year: u64,
    pub horizon_years: u8,
    pub years: Vec<YearPlan>,
    pub remaining_shares: u64,
    pub outcome: PlanOutcome,
}

impl ExercisePlan {
    pub fn not_applicable(horizon_years: u8) -> Self {
        Self {
            spread_per_share: 0.0,
            max_safe_shares_per_year: 0,
            horizon_years,
            years: Vec::new(),
            remaining_shares: 0,
            outcome: PlanOutcome::NotApplicable,
        }
    }

    /// Unmet capacity signal: the caller should suggest a longer horizon.
    pub fn needs_longer_horizon(&self) -> bool {
        self.remaining_shares > 0
    }

    pub fn total_shares(&self) -> u64 {
        self.years.iter().map(|y| y.shares).sum()
    }

    pub fn total_tax_savings(&self) -> f64 {
        self.years.iter().map(|y| y.tax_savings).sum()
    }

    pub fn total_exercise_cost(&self) -> f64 {
        self.years.iter().map(|y| y.exercise_cost).sum()
    }
}
