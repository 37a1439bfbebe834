//! Client tax profile
//!
//! A client is the advisor's customer. The profile carries just enough to
//! resolve marginal rates and AMT capacity; the equity itself hangs off the
//! client as grants and planned exercises.

use serde::{Deserialize, Serialize};

use super::exercise::PlannedExercise;
use super::grant::Grant;
use super::ids::{ClientId, GrantId};

/// IRS filing status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FilingStatus {
    #[default]
    #[serde(rename = "single")]
    Single,
    #[serde(rename = "married_joint")]
    MarriedJoint,
}

impl FilingStatus {
    pub fn label(&self) -> &'static str {
        match self {
            FilingStatus::Single => "Single",
            FilingStatus::MarriedJoint => "Married filing jointly",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: ClientId,
    pub name: String,
    /// Two-letter US state code
    pub state: String,
    pub filing_status: FilingStatus,
    /// Top federal ordinary marginal rate, in percent (e.g. 32.0)
    pub tax_bracket: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_income: Option<f64>,

    /// State rate override, in percent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_state_tax_rate: Option<f64>,
    /// Federal long-term capital gains rate override, in percent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_ltcg_tax_rate: Option<f64>,
    /// AMT safe-harbor override, in dollars of ISO spread
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_amt_safe_harbor: Option<f64>,

    #[serde(default)]
    pub grants: Vec<Grant>,
    #[serde(default)]
    pub planned_exercises: Vec<PlannedExercise>,
}

impl Client {
    pub fn grant(&self, id: &GrantId) -> Option<&Grant> {
        self.grants.iter().find(|g| &g.id == id)
    }

    /// Planned exercises recorded against a single grant.
    pub fn exercises_for<'a>(
        &'a self,
        grant_id: &'a GrantId,
    ) -> impl Iterator<Item = &'a PlannedExercise> + 'a {
        self.planned_exercises
            .iter()
            .filter(move |e| &e.grant_id == grant_id)
    }

    /// Ids of every grant, sorted. Used as part of the evaluation cache key.
    pub fn grant_ids(&self) -> Vec<GrantId> {
        let mut ids: Vec<GrantId> = self.grants.iter().map(|g| g.id.clone()).collect();
        ids.sort();
        ids
    }
}
