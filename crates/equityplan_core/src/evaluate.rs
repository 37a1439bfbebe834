//! Per-client evaluation
//!
//! Composes every engine component into one report for a client as of a
//! date. This is the unit the cache memoizes and the CLI renders.

use jiff::civil::Date;
use serde::{Deserialize, Serialize};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::amt::calculate_amt_room;
use crate::config::PlanningConfig;
use crate::disposition::compute_disposition_qualification;
use crate::model::{
    Client, ClientId, DispositionQualification, Grant, GrantId, GrantStatus, GrantType,
    HoldingsSummary, QuarterlyBreakdown, VestingEvent,
};
use crate::optimization::{ExercisePlan, plan_multi_year_exercise};
use crate::quarterly::aggregate_quarterly_tax;
use crate::rates::{TaxRates, resolve_rates};
use crate::status::{grant_status, holdings_summary};
use crate::vesting::generate_vesting_schedule_with_rates;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrantReport {
    pub grant_id: GrantId,
    pub grant_type: GrantType,
    pub ticker: String,
    pub events: Vec<VestingEvent>,
    pub status: GrantStatus,
    pub holdings: HoldingsSummary,
    pub disposition: Option<DispositionQualification>,
    /// ISO grants only
    pub exercise_plan: Option<ExercisePlan>,
}

/// Portfolio-wide figures across all of a client's grants
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioTotals {
    /// Sum of displayed holdings at current prices
    pub market_value: f64,
    /// Vested shares at intrinsic value (spread for options)
    pub vested_value: f64,
    pub unvested_value: f64,
    /// Tax owed beyond withholding on vests in the evaluation year
    pub tax_gap: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientReport {
    pub client_id: ClientId,
    pub as_of: Date,
    pub horizon_years: u8,
    pub rates: TaxRates,
    pub amt_room: f64,
    pub grants: Vec<GrantReport>,
    /// Estimated payments for `as_of`'s calendar year
    pub quarterly: [QuarterlyBreakdown; 4],
    pub totals: PortfolioTotals,
}

impl ClientReport {
    pub fn grant(&self, id: &GrantId) -> Option<&GrantReport> {
        self.grants.iter().find(|g| &g.grant_id == id)
    }
}

/// Value of one share to the holder: the spread for options, the price otherwise.
fn intrinsic_value_per_share(grant: &Grant) -> f64 {
    if grant.grant_type.is_option() {
        (grant.current_price - grant.strike()).max(0.0)
    } else {
        grant.current_price
    }
}

fn evaluate_grant(
    grant: &Grant,
    client: &Client,
    rates: &TaxRates,
    amt_room: f64,
    horizon_years: u8,
    as_of: Date,
) -> GrantReport {
    let events = generate_vesting_schedule_with_rates(grant, rates, as_of);
    let status = grant_status(grant, &client.planned_exercises, as_of);
    let holdings = holdings_summary(grant, &events);
    let disposition =
        compute_disposition_qualification(grant, &client.planned_exercises, rates, as_of);
    let exercise_plan = (grant.grant_type == GrantType::Iso)
        .then(|| plan_multi_year_exercise(grant, &status, amt_room, rates, horizon_years, as_of));

    GrantReport {
        grant_id: grant.id.clone(),
        grant_type: grant.grant_type,
        ticker: grant.ticker.clone(),
        events,
        status,
        holdings,
        disposition,
        exercise_plan,
    }
}

/// Evaluate every grant of a client as of a date.
pub fn evaluate_client(client: &Client, as_of: Date, config: &PlanningConfig) -> ClientReport {
    let rates = resolve_rates(client);
    let amt_room = calculate_amt_room(client);
    let horizon_years = config.horizon();

    let grants: Vec<GrantReport> = client
        .grants
        .iter()
        .map(|g| evaluate_grant(g, client, &rates, amt_room, horizon_years, as_of))
        .collect();

    let mut totals = PortfolioTotals::default();
    for (grant, report) in client.grants.iter().zip(&grants) {
        let per_share = intrinsic_value_per_share(grant);
        totals.market_value += report.holdings.market_value;
        totals.vested_value += report.status.vested_total as f64 * per_share;
        totals.unvested_value += report.status.unvested as f64 * per_share;
        totals.tax_gap += report
            .events
            .iter()
            .filter(|e| e.date.year() == as_of.year())
            .map(|e| e.tax_gap)
            .sum::<f64>();
    }

    let quarterly = aggregate_quarterly_tax(
        &client.grants,
        &client.planned_exercises,
        amt_room,
        &rates,
        as_of.year(),
        as_of,
    );

    tracing::debug!(
        client = %client.id,
        grants = grants.len(),
        %as_of,
        market_value = totals.market_value,
        "evaluated client"
    );

    ClientReport {
        client_id: client.id.clone(),
        as_of,
        horizon_years,
        rates,
        amt_room,
        grants,
        quarterly,
        totals,
    }
}

/// Evaluate many clients. Output order follows input order.
pub fn evaluate_clients(
    clients: &[Client],
    as_of: Date,
    config: &PlanningConfig,
) -> Vec<ClientReport> {
    #[cfg(feature = "parallel")]
    let reports: Vec<ClientReport> = clients
        .par_iter()
        .map(|c| evaluate_client(c, as_of, config))
        .collect();

    #[cfg(not(feature = "parallel"))]
    let reports: Vec<ClientReport> = clients
        .iter()
        .map(|c| evaluate_client(c, as_of, config))
        .collect();

    reports
}
