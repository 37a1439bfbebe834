//! Vesting schedule synthesis
//!
//! Expands a grant's schedule policy into dated tranches, then prices each
//! tranche and works out sell-to-cover withholding and the gap between what
//! was withheld and what the client will actually owe.
//!
//! Standard schedules always distribute exactly `total_shares`: tranche sizes
//! are floored and the final tranche absorbs the remainder.

use jiff::civil::Date;

use crate::date_math::add_months;
use crate::model::{Client, Grant, VestingEvent, VestingSchedule};
use crate::rates::{TaxRates, resolve_rates};

/// Months from grant date to the one-year cliff
const CLIFF_MONTHS: i32 = 12;
/// Months between vests after the cliff or on a quarterly schedule
const VEST_INTERVAL_MONTHS: i32 = 3;
/// Total vesting period for standard schedules
const VESTING_TERM_MONTHS: i32 = 48;

/// Tolerance when converting a dollar withholding into whole shares, so
/// 55.000000001 shares of float noise does not round up to 56.
const SHARE_EPSILON: f64 = 1e-9;

/// Generate the full vesting timeline for a grant, ascending by date.
///
/// Pure and restartable: identical inputs produce identical output.
pub fn generate_vesting_schedule(grant: &Grant, client: &Client, as_of: Date) -> Vec<VestingEvent> {
    generate_vesting_schedule_with_rates(grant, &resolve_rates(client), as_of)
}

/// Same as [`generate_vesting_schedule`] with rates already resolved.
pub fn generate_vesting_schedule_with_rates(
    grant: &Grant,
    rates: &TaxRates,
    as_of: Date,
) -> Vec<VestingEvent> {
    vesting_tranches(grant)
        .into_iter()
        .map(|(date, shares)| price_tranche(grant, rates, date, shares, as_of))
        .collect()
}

/// Dated share tranches for the grant's schedule policy. Zero-share tranches
/// are dropped, so tiny grants may produce fewer events than the policy's
/// nominal count.
pub fn vesting_tranches(grant: &Grant) -> Vec<(Date, u64)> {
    let total = grant.total_shares;
    let start = grant.grant_date;

    let mut tranches = match grant.vesting_schedule {
        VestingSchedule::Standard4y1yCliff => {
            let cliff = total / 4;
            let after_cliff = (CLIFF_MONTHS + VEST_INTERVAL_MONTHS..=VESTING_TERM_MONTHS)
                .step_by(VEST_INTERVAL_MONTHS as usize)
                .collect::<Vec<_>>();
            let mut tranches = vec![(add_months(start, CLIFF_MONTHS), cliff)];
            tranches.extend(spread_evenly(start, &after_cliff, total - cliff));
            tranches
        }
        VestingSchedule::Standard4yQuarterly => {
            let months = (VEST_INTERVAL_MONTHS..=VESTING_TERM_MONTHS)
                .step_by(VEST_INTERVAL_MONTHS as usize)
                .collect::<Vec<_>>();
            spread_evenly(start, &months, total)
        }
        VestingSchedule::Immediate => vec![(start, total)],
        VestingSchedule::Custom => {
            let mut dates: Vec<(Date, u64)> = grant
                .custom_vesting_dates
                .iter()
                .map(|v| (v.date, v.shares))
                .collect();
            dates.sort_by_key(|(date, _)| *date);
            dates
        }
    };

    tranches.retain(|(_, shares)| *shares > 0);
    tranches
}

/// Split `shares` across month offsets, flooring each and giving the
/// remainder to the last offset.
fn spread_evenly(start: Date, month_offsets: &[i32], shares: u64) -> Vec<(Date, u64)> {
    let count = month_offsets.len() as u64;
    if count == 0 {
        return Vec::new();
    }
    let each = shares / count;
    let remainder = shares % count;

    month_offsets
        .iter()
        .enumerate()
        .map(|(i, &months)| {
            let extra = if i as u64 == count - 1 { remainder } else { 0 };
            (add_months(start, months), each + extra)
        })
        .collect()
}

fn price_tranche(
    grant: &Grant,
    rates: &TaxRates,
    date: Date,
    shares: u64,
    as_of: Date,
) -> VestingEvent {
    let price_at_vest = grant
        .recorded_price_on(date)
        .unwrap_or(grant.current_price);
    let gross_value = shares as f64 * price_at_vest;
    let is_past = date <= as_of;

    if !grant.grant_type.withholds_at_vest() {
        // Options are taxed at exercise or sale, not at vest
        return VestingEvent {
            date,
            shares,
            price_at_vest,
            gross_value,
            withholding_amount: 0.0,
            net_shares: shares,
            net_value: gross_value,
            shares_sold_to_cover: 0,
            tax_gap: 0.0,
            is_past,
        };
    }

    let withholding_amount = gross_value * grant.withholding_percent() / 100.0;
    let shares_sold_to_cover = if price_at_vest > 0.0 {
        let needed = (withholding_amount / price_at_vest - SHARE_EPSILON)
            .ceil()
            .max(0.0) as u64;
        needed.min(shares)
    } else {
        0
    };
    let net_shares = shares - shares_sold_to_cover;

    VestingEvent {
        date,
        shares,
        price_at_vest,
        gross_value,
        withholding_amount,
        net_shares,
        net_value: net_shares as f64 * price_at_vest,
        shares_sold_to_cover,
        tax_gap: gross_value * rates.effective_vest_rate() - withholding_amount,
        is_past,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ClientBuilder, GrantBuilder};
    use jiff::civil::date;

    #[test]
    fn test_cliff_schedule_shape() {
        let grant = GrantBuilder::rsu("g", "ACME")
            .granted(2024, 1, 15)
            .shares(4_000)
            .cliff()
            .build();
        let tranches = vesting_tranches(&grant);

        assert_eq!(tranches.len(), 13);
        assert_eq!(tranches[0], (date(2025, 1, 15), 1_000));
        assert_eq!(tranches[1], (date(2025, 4, 15), 250));
        assert_eq!(tranches[12], (date(2028, 1, 15), 250));
        assert_eq!(tranches.iter().map(|t| t.1).sum::<u64>(), 4_000);
    }

    #[test]
    fn test_cliff_remainder_lands_on_last_tranche() {
        let grant = GrantBuilder::rsu("g", "ACME")
            .granted(2024, 1, 15)
            .shares(1_001)
            .build();
        let tranches = vesting_tranches(&grant);

        assert_eq!(tranches[0].1, 250);
        // 751 over 12 tranches: 62 each, last gets 62 + 7
        assert_eq!(tranches[1].1, 62);
        assert_eq!(tranches[12].1, 69);
        assert_eq!(tranches.iter().map(|t| t.1).sum::<u64>(), 1_001);
    }

    #[test]
    fn test_quarterly_schedule_shape() {
        let grant = GrantBuilder::rsu("g", "ACME")
            .granted(2024, 1, 31)
            .shares(1_600)
            .quarterly()
            .build();
        let tranches = vesting_tranches(&grant);

        assert_eq!(tranches.len(), 16);
        assert!(tranches.iter().all(|t| t.1 == 100));
        assert_eq!(tranches[0].0, date(2024, 4, 30));
        assert_eq!(tranches[15].0, date(2028, 1, 31));
    }

    #[test]
    fn test_immediate_schedule() {
        let grant = GrantBuilder::rsu("g", "ACME")
            .granted(2024, 6, 1)
            .shares(500)
            .immediate()
            .build();
        assert_eq!(vesting_tranches(&grant), vec![(date(2024, 6, 1), 500)]);
    }

    #[test]
    fn test_custom_dates_are_sorted_and_not_normalized() {
        let grant = GrantBuilder::rsu("g", "ACME")
            .shares(1_000)
            .custom(&[(date(2026, 1, 1), 300), (date(2025, 1, 1), 200)])
            .build();
        let tranches = vesting_tranches(&grant);
        assert_eq!(
            tranches,
            vec![(date(2025, 1, 1), 200), (date(2026, 1, 1), 300)]
        );
    }

    #[test]
    fn test_custom_without_dates_is_empty() {
        let grant = GrantBuilder::rsu("g", "ACME").shares(1_000).custom(&[]).build();
        let client = ClientBuilder::new("c").build();
        assert!(generate_vesting_schedule(&grant, &client, date(2030, 1, 1)).is_empty());
    }

    #[test]
    fn test_rsu_sell_to_cover_math() {
        // TX has no state tax: effective vest rate = 0.32 + 0.038
        let client = ClientBuilder::new("c").state("TX").bracket(32.0).build();
        let grant = GrantBuilder::rsu("g", "ACME")
            .granted(2024, 1, 1)
            .shares(4_000)
            .price(50.0)
            .withholding(22.0)
            .build();
        let events = generate_vesting_schedule(&grant, &client, date(2025, 6, 1));

        let cliff = &events[0];
        assert_eq!(cliff.gross_value, 50_000.0);
        assert!((cliff.withholding_amount - 11_000.0).abs() < 1e-6);
        assert_eq!(cliff.shares_sold_to_cover, 220);
        assert_eq!(cliff.net_shares, 780);
        assert!((cliff.net_value - 39_000.0).abs() < 1e-6);
        assert!((cliff.tax_gap - (50_000.0 * 0.358 - 11_000.0)).abs() < 1e-6);
        assert!(cliff.is_past);
    }

    #[test]
    fn test_sell_to_cover_rounds_up_partial_shares() {
        let client = ClientBuilder::new("c").build();
        let grant = GrantBuilder::rsu("g", "ACME")
            .shares(10)
            .price(100.0)
            .withholding(25.0)
            .immediate()
            .build();
        let events = generate_vesting_schedule(&grant, &client, date(2020, 1, 1));
        // $250 withheld at $100/share needs 2.5 shares → 3 sold
        assert_eq!(events[0].shares_sold_to_cover, 3);
        assert_eq!(events[0].net_shares, 7);
    }

    #[test]
    fn test_recorded_vest_price_is_used() {
        let client = ClientBuilder::new("c").build();
        let grant = GrantBuilder::rsu("g", "ACME")
            .granted(2024, 1, 1)
            .shares(4_000)
            .price(50.0)
            .vest_price(date(2025, 1, 1), 42.0)
            .build();
        let events = generate_vesting_schedule(&grant, &client, date(2025, 6, 1));

        assert_eq!(events[0].price_at_vest, 42.0);
        assert_eq!(events[0].gross_value, 42_000.0);
        assert_eq!(events[1].price_at_vest, 50.0);
    }

    #[test]
    fn test_iso_has_no_withholding() {
        let client = ClientBuilder::new("c").build();
        let grant = GrantBuilder::iso("g", "ACME")
            .granted(2024, 1, 1)
            .shares(1_600)
            .price(30.0)
            .strike(5.0)
            .withholding(22.0)
            .quarterly()
            .build();
        let events = generate_vesting_schedule(&grant, &client, date(2025, 1, 1));

        for event in &events {
            assert_eq!(event.withholding_amount, 0.0);
            assert_eq!(event.shares_sold_to_cover, 0);
            assert_eq!(event.net_shares, event.shares);
            assert_eq!(event.tax_gap, 0.0);
        }
    }

    #[test]
    fn test_zero_price_does_not_sell_shares() {
        let client = ClientBuilder::new("c").build();
        let grant = GrantBuilder::rsu("g", "ACME").shares(100).immediate().build();
        let events = generate_vesting_schedule(&grant, &client, date(2030, 1, 1));
        assert_eq!(events[0].shares_sold_to_cover, 0);
        assert_eq!(events[0].net_shares, 100);
    }

    #[test]
    fn test_is_past_includes_evaluation_date() {
        let client = ClientBuilder::new("c").build();
        let grant = GrantBuilder::rsu("g", "ACME")
            .granted(2024, 1, 1)
            .shares(4_000)
            .build();

        let on_cliff = generate_vesting_schedule(&grant, &client, date(2025, 1, 1));
        assert!(on_cliff[0].is_past);
        assert!(!on_cliff[1].is_past);

        let before_cliff = generate_vesting_schedule(&grant, &client, date(2024, 12, 31));
        assert!(before_cliff.iter().all(|e| !e.is_past));
    }
}
