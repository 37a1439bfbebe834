//! Grant status and holdings
//!
//! `grant_status` reduces a vesting timeline and planned exercises into
//! share counts. `holdings_summary` is the displayed position for portfolio
//! views; it is the only place the advisor's manual share-count and cost
//! basis overrides are honored.

use jiff::civil::Date;

use crate::model::{Grant, GrantStatus, GrantType, HoldingsSummary, PlannedExercise, VestingEvent};
use crate::vesting::vesting_tranches;

/// Vested, unvested and exercisable share counts as of a date.
///
/// `planned_exercises` may contain entries for other grants; only those
/// matching this grant are counted.
pub fn grant_status(grant: &Grant, planned_exercises: &[PlannedExercise], as_of: Date) -> GrantStatus {
    let vested: u64 = vesting_tranches(grant)
        .iter()
        .filter(|(date, _)| *date <= as_of)
        .map(|(_, shares)| shares)
        .sum();
    // Custom schedules may over-allocate; cap so vested + unvested == total
    let vested_total = vested.min(grant.total_shares);

    let committed: u64 = planned_exercises
        .iter()
        .filter(|e| e.grant_id == grant.id)
        .map(|e| e.shares)
        .sum();

    GrantStatus {
        vested_total,
        unvested: grant.total_shares - vested_total,
        available: vested_total.saturating_sub(committed),
    }
}

/// Displayed holdings for a grant given its generated vesting events.
pub fn holdings_summary(grant: &Grant, events: &[VestingEvent]) -> HoldingsSummary {
    let past = || events.iter().filter(|e| e.is_past);

    let derived_shares = if grant.grant_type.withholds_at_vest() {
        past().map(|e| e.net_shares).sum::<u64>()
    } else {
        past().map(|e| e.shares).sum::<u64>()
    }
    .saturating_sub(grant.shares_sold());

    let shares_held = grant.custom_held_shares.unwrap_or(derived_shares);

    let cost_basis_per_share = grant
        .average_cost_basis
        .unwrap_or_else(|| default_cost_basis(grant, events));

    let units = shares_held as f64;
    let market_value = units * grant.current_price;
    let cost_basis = units * cost_basis_per_share;

    HoldingsSummary {
        shares_held,
        cost_basis_per_share,
        cost_basis,
        market_value,
        unrealized_gain: market_value - cost_basis,
        uses_override: grant.custom_held_shares.is_some(),
    }
}

fn default_cost_basis(grant: &Grant, events: &[VestingEvent]) -> f64 {
    match grant.grant_type {
        GrantType::Rsu => {
            let (value, shares) = events
                .iter()
                .filter(|e| e.is_past)
                .fold((0.0, 0u64), |(value, shares), e| {
                    (value + e.net_value, shares + e.net_shares)
                });
            if shares > 0 {
                value / shares as f64
            } else {
                grant.current_price
            }
        }
        GrantType::Espp => grant.espp_price_paid(),
        GrantType::Iso | GrantType::Nso => grant.strike(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ClientBuilder, GrantBuilder};
    use crate::vesting::generate_vesting_schedule;
    use jiff::civil::date;

    fn iso_grant() -> Grant {
        GrantBuilder::iso("g1", "ACME")
            .granted(2022, 1, 1)
            .shares(4_000)
            .strike(10.0)
            .price(60.0)
            .build()
    }

    #[test]
    fn test_status_before_cliff() {
        let status = grant_status(&iso_grant(), &[], date(2022, 12, 31));
        assert_eq!(status.vested_total, 0);
        assert_eq!(status.unvested, 4_000);
        assert_eq!(status.available, 0);
    }

    #[test]
    fn test_status_mid_schedule() {
        // Cliff (1000) + 250 at +15 and +18 months
        let status = grant_status(&iso_grant(), &[], date(2023, 7, 1));
        assert_eq!(status.vested_total, 1_500);
        assert_eq!(status.unvested, 2_500);
        assert_eq!(status.available, 1_500);
    }

    #[test]
    fn test_planned_exercises_reduce_available() {
        let exercises = vec![
            PlannedExercise::new("e1", "g1", 600, date(2024, 1, 1), 10.0, 60.0),
            PlannedExercise::new("e2", "other", 5_000, date(2024, 1, 1), 10.0, 60.0),
        ];
        let status = grant_status(&iso_grant(), &exercises, date(2023, 7, 1));
        assert_eq!(status.available, 900);
    }

    #[test]
    fn test_available_clamps_at_zero() {
        let exercises = vec![PlannedExercise::new(
            "e1",
            "g1",
            9_999,
            date(2024, 1, 1),
            10.0,
            60.0,
        )];
        let status = grant_status(&iso_grant(), &exercises, date(2023, 7, 1));
        assert_eq!(status.available, 0);
    }

    #[test]
    fn test_vested_plus_unvested_is_total_for_all_dates() {
        let grants = [
            iso_grant(),
            GrantBuilder::rsu("r", "ACME")
                .granted(2022, 1, 31)
                .shares(1_003)
                .quarterly()
                .build(),
            GrantBuilder::rsu("c", "ACME")
                .shares(100)
                .custom(&[(date(2023, 1, 1), 80), (date(2024, 1, 1), 80)])
                .build(),
        ];
        let mut day = date(2021, 6, 1);
        while day < date(2027, 1, 1) {
            for grant in &grants {
                let status = grant_status(grant, &[], day);
                assert_eq!(status.vested_total + status.unvested, grant.total_shares);
            }
            day = crate::date_math::add_months(day, 1);
        }
    }

    #[test]
    fn test_overrides_do_not_change_status() {
        let plain = iso_grant();
        let mut overridden = iso_grant();
        overridden.custom_held_shares = Some(12);
        overridden.average_cost_basis = Some(1.0);

        let as_of = date(2024, 2, 1);
        assert_eq!(grant_status(&plain, &[], as_of), grant_status(&overridden, &[], as_of));
    }

    #[test]
    fn test_holdings_for_rsu_net_of_sales() {
        let client = ClientBuilder::new("c").build();
        let grant = GrantBuilder::rsu("g", "ACME")
            .granted(2024, 1, 1)
            .shares(4_000)
            .price(50.0)
            .withholding(22.0)
            .vest_price(date(2025, 1, 1), 40.0)
            .sale(date(2025, 2, 1), 100, 45.0, "diversify")
            .build();
        let events = generate_vesting_schedule(&grant, &client, date(2025, 1, 31));
        let holdings = holdings_summary(&grant, &events);

        // 1000 vested, 220 sold to cover, 100 sold later
        assert_eq!(holdings.shares_held, 680);
        assert!((holdings.cost_basis_per_share - 40.0).abs() < 1e-9);
        assert!((holdings.market_value - 680.0 * 50.0).abs() < 1e-9);
        assert!((holdings.unrealized_gain - 680.0 * 10.0).abs() < 1e-9);
        assert!(!holdings.uses_override);
    }

    #[test]
    fn test_holdings_override() {
        let client = ClientBuilder::new("c").build();
        let grant = GrantBuilder::rsu("g", "ACME")
            .granted(2024, 1, 1)
            .shares(4_000)
            .price(50.0)
            .held_shares(300)
            .cost_basis(20.0)
            .build();
        let events = generate_vesting_schedule(&grant, &client, date(2025, 6, 1));
        let holdings = holdings_summary(&grant, &events);

        assert_eq!(holdings.shares_held, 300);
        assert_eq!(holdings.cost_basis, 6_000.0);
        assert_eq!(holdings.market_value, 15_000.0);
        assert!(holdings.uses_override);
    }

    #[test]
    fn test_option_holdings_use_strike_basis() {
        let client = ClientBuilder::new("c").build();
        let grant = iso_grant();
        let events = generate_vesting_schedule(&grant, &client, date(2023, 1, 1));
        let holdings = holdings_summary(&grant, &events);

        assert_eq!(holdings.shares_held, 1_000);
        assert_eq!(holdings.cost_basis_per_share, 10.0);
        assert_eq!(holdings.unrealized_gain, 50_000.0);
    }
}
