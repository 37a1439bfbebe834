//! Derived outputs of the engine
//!
//! None of these are persisted. They are recomputed on every evaluation and
//! owned by whoever asked for them.

use jiff::civil::Date;
use serde::{Deserialize, Serialize};

use super::ids::ExerciseId;

/// One concrete vest on a grant's timeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VestingEvent {
    pub date: Date,
    pub shares: u64,
    pub price_at_vest: f64,
    pub gross_value: f64,
    pub withholding_amount: f64,
    pub net_shares: u64,
    pub net_value: f64,
    pub shares_sold_to_cover: u64,
    /// Tax owed beyond what was withheld (negative when over-withheld)
    pub tax_gap: f64,
    pub is_past: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrantStatus {
    pub vested_total: u64,
    pub unvested: u64,
    /// Vested shares not already committed to a planned exercise
    pub available: u64,
}

/// Displayed position for portfolio summaries
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HoldingsSummary {
    pub shares_held: u64,
    pub cost_basis_per_share: f64,
    pub cost_basis: f64,
    pub market_value: f64,
    pub unrealized_gain: f64,
    /// True when the advisor's manual share count was used
    pub uses_override: bool,
}

/// Income split and tax for one disposition path
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DispositionTax {
    pub ordinary_income: f64,
    pub capital_gain: f64,
    pub tax: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EsppQualification {
    pub purchase_date: Date,
    pub offering_start: Date,
    pub qualifying_date: Date,
    pub is_qualified: bool,
    pub days_remaining: i32,
    pub progress_percent: f64,
    pub shares: u64,
    pub total_gain: f64,
    pub qualified: DispositionTax,
    pub disqualified: DispositionTax,
    /// Tax avoided by waiting for a qualifying disposition
    pub tax_savings: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IsoDisposition {
    pub exercise_id: ExerciseId,
    pub shares: u64,
    pub exercise_date: Date,
    pub qualifying_date: Date,
    pub is_qualified: bool,
    pub days_remaining: i32,
    /// Exercise-year AMT preference, owed on either path
    pub amt_preference: f64,
    pub qualified: DispositionTax,
    pub disqualified: DispositionTax,
    pub tax_savings: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum DispositionQualification {
    Espp(EsppQualification),
    Iso { exercises: Vec<IsoDisposition> },
}

/// One IRS estimated-payment period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuarterlyBreakdown {
    /// 1-based payment period
    pub quarter: u8,
    /// 0-based month indices covered by the period
    pub months: [usize; 3],
    pub due_label: String,
    pub due_date: Date,
    pub vesting_income: f64,
    pub withholding_credit: f64,
    pub iso_spread: f64,
    pub estimated_tax: f64,
    pub payment_due: f64,
    pub is_past: bool,
}
