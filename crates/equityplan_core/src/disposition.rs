//! Qualifying vs disqualifying dispositions
//!
//! ESPP shares and exercised ISO shares get preferential treatment only
//! after a two-part holding period. For each position this module dates the
//! qualifying point and prices both paths at today's share price, so the
//! advisor can see what selling early would cost.
//!
//! Formulas differ per equity type:
//!
//! - ESPP disqualifying: the purchase-date bargain element is ordinary
//!   income, further appreciation (never negative) is capital gain.
//! - ESPP qualifying: ordinary income is the plan discount measured at the
//!   lower of the two reference prices; the rest of the total gain is capital
//!   gain, with no floor.
//! - ISO disqualifying: exercise-date spread is ordinary income, movement
//!   since exercise is capital gain or loss.
//! - ISO qualifying: the whole gain over strike is capital gain. The
//!   exercise spread stays an AMT preference item either way.

use std::cmp::max;

use jiff::civil::Date;

use crate::date_math::{add_years, days_between};
use crate::model::{
    DispositionQualification, DispositionTax, EsppQualification, Grant, GrantType,
    IsoDisposition, PlannedExercise,
};
use crate::rates::TaxRates;

/// ESPP: years from offering start before a sale qualifies
const ESPP_OFFERING_HOLD_YEARS: i32 = 2;
/// ESPP: years from purchase before a sale qualifies
const ESPP_PURCHASE_HOLD_YEARS: i32 = 1;
/// ISO: years from grant before a sale qualifies
const ISO_GRANT_HOLD_YEARS: i32 = 2;
/// ISO: years from exercise before a sale qualifies
const ISO_EXERCISE_HOLD_YEARS: i32 = 1;

/// Qualification analysis for an ESPP or ISO grant; `None` for RSU/NSO.
///
/// ISO analysis is per planned exercise of this grant; entries for other
/// grants are ignored.
pub fn compute_disposition_qualification(
    grant: &Grant,
    planned_exercises: &[PlannedExercise],
    rates: &TaxRates,
    as_of: Date,
) -> Option<DispositionQualification> {
    match grant.grant_type {
        GrantType::Espp => Some(DispositionQualification::Espp(espp_qualification(
            grant, rates, as_of,
        ))),
        GrantType::Iso => {
            let exercises = planned_exercises
                .iter()
                .filter(|e| e.grant_id == grant.id)
                .map(|e| iso_disposition(grant, e, rates, as_of))
                .collect();
            Some(DispositionQualification::Iso { exercises })
        }
        GrantType::Rsu | GrantType::Nso => None,
    }
}

/// Price one disposition path at the client's rates.
pub fn disposition_tax(ordinary_income: f64, capital_gain: f64, rates: &TaxRates) -> DispositionTax {
    DispositionTax {
        ordinary_income,
        capital_gain,
        tax: ordinary_income * rates.ordinary_rate + capital_gain * rates.ltcg_rate,
    }
}

pub fn espp_qualification(grant: &Grant, rates: &TaxRates, as_of: Date) -> EsppQualification {
    let purchase_date = grant.espp_purchase_date();
    let offering_start = grant.espp_offering_start_date();
    let qualifying_date = max(
        add_years(offering_start, ESPP_OFFERING_HOLD_YEARS),
        add_years(purchase_date, ESPP_PURCHASE_HOLD_YEARS),
    );

    let shares = grant.custom_held_shares.unwrap_or(grant.total_shares);
    let units = shares as f64;
    let fmv_at_purchase = grant.espp_fmv_purchase();
    let price_paid = grant.espp_price_paid();
    let fmv_at_offering = grant.espp_fmv_offering();

    let total_gain = (grant.current_price - price_paid) * units;

    let disqualified = disposition_tax(
        (fmv_at_purchase - price_paid) * units,
        ((grant.current_price - fmv_at_purchase) * units).max(0.0),
        rates,
    );

    let discount_amount = fmv_at_purchase.min(fmv_at_offering) * grant.espp_discount() / 100.0;
    let qualified_ordinary = discount_amount * units;
    let qualified = disposition_tax(qualified_ordinary, total_gain - qualified_ordinary, rates);

    EsppQualification {
        purchase_date,
        offering_start,
        qualifying_date,
        is_qualified: as_of >= qualifying_date,
        days_remaining: days_between(as_of, qualifying_date).max(0),
        progress_percent: progress_percent(purchase_date, qualifying_date, as_of),
        shares,
        total_gain,
        qualified,
        disqualified,
        tax_savings: disqualified.tax - qualified.tax,
    }
}

pub fn iso_disposition(
    grant: &Grant,
    exercise: &PlannedExercise,
    rates: &TaxRates,
    as_of: Date,
) -> IsoDisposition {
    let qualifying_date = max(
        add_years(exercise.exercise_date, ISO_EXERCISE_HOLD_YEARS),
        add_years(grant.grant_date, ISO_GRANT_HOLD_YEARS),
    );

    let units = exercise.shares as f64;
    let strike = exercise.exercise_price;
    let fmv = exercise.fmv_at_exercise;
    let sale_price = grant.current_price;

    let disqualified = disposition_tax(
        (fmv - strike) * units,
        (sale_price - fmv) * units,
        rates,
    );
    let qualified = disposition_tax(0.0, (sale_price - strike) * units, rates);

    IsoDisposition {
        exercise_id: exercise.id.clone(),
        shares: exercise.shares,
        exercise_date: exercise.exercise_date,
        qualifying_date,
        is_qualified: as_of >= qualifying_date,
        days_remaining: days_between(as_of, qualifying_date).max(0),
        amt_preference: exercise.spread_per_share() * units,
        qualified,
        disqualified,
        tax_savings: disqualified.tax - qualified.tax,
    }
}

/// Share of the holding window already served, in percent.
fn progress_percent(start: Date, qualifying_date: Date, as_of: Date) -> f64 {
    let window = days_between(start, qualifying_date);
    if window <= 0 {
        return 100.0;
    }
    let elapsed = days_between(start, as_of);
    (elapsed as f64 / window as f64 * 100.0).clamp(0.0, 100.0)
}
