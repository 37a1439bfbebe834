//! Planned ISO exercises
//!
//! The advisor schedules exercises ahead of time; the engine reads them to
//! reduce available shares, to bucket AMT exposure into payment quarters and
//! to date holding periods for disposition analysis.

use jiff::civil::Date;
use serde::{Deserialize, Serialize};

use super::ids::{ExerciseId, GrantId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannedExercise {
    #[serde(default)]
    pub id: ExerciseId,
    pub grant_id: GrantId,
    pub shares: u64,
    pub exercise_date: Date,
    /// Strike paid per share
    pub exercise_price: f64,
    pub fmv_at_exercise: f64,
    /// Bargain element recognized for AMT (spread × shares)
    pub amt_exposure: f64,
    /// Cash needed to exercise (strike × shares)
    pub estimated_cost: f64,
}

impl PlannedExercise {
    /// Build an exercise with its derived exposure and cost filled in.
    pub fn new(
        id: impl Into<ExerciseId>,
        grant_id: impl Into<GrantId>,
        shares: u64,
        exercise_date: Date,
        exercise_price: f64,
        fmv_at_exercise: f64,
    ) -> Self {
        let units = shares as f64;
        Self {
            id: id.into(),
            grant_id: grant_id.into(),
            shares,
            exercise_date,
            exercise_price,
            fmv_at_exercise,
            amt_exposure: (fmv_at_exercise - exercise_price).max(0.0) * units,
            estimated_cost: exercise_price * units,
        }
    }

    pub fn spread_per_share(&self) -> f64 {
        (self.fmv_at_exercise - self.exercise_price).max(0.0)
    }
}
