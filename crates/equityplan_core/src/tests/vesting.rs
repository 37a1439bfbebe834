//! Vesting timeline tests across schedule policies

use jiff::civil::date;

use crate::config::{ClientBuilder, GrantBuilder};
use crate::date_math::add_months;
use crate::model::{Client, Grant};
use crate::status::grant_status;
use crate::vesting::generate_vesting_schedule;

fn advisor_client() -> Client {
    ClientBuilder::new("c1")
        .name("Pat Example")
        .state("CA")
        .bracket(35.0)
        .income(320_000.0)
        .build()
}

fn sample_grants() -> Vec<Grant> {
    vec![
        GrantBuilder::rsu("cliff", "ACME")
            .granted(2023, 8, 31)
            .shares(4_000)
            .price(120.0)
            .build(),
        GrantBuilder::rsu("quarterly", "ACME")
            .granted(2024, 2, 29)
            .shares(1_600)
            .quarterly()
            .price(120.0)
            .build(),
        GrantBuilder::iso("odd", "ACME")
            .granted(2022, 5, 15)
            .shares(1_003)
            .strike(3.0)
            .price(120.0)
            .build(),
        GrantBuilder::espp("espp", "ACME")
            .espp_purchase(date(2024, 11, 30))
            .shares(250)
            .price(120.0)
            .build(),
    ]
}

#[test]
fn test_cliff_schedule_distributes_total() {
    let client = advisor_client();
    let grant = &sample_grants()[0];
    let events = generate_vesting_schedule(grant, &client, date(2024, 1, 1));

    assert_eq!(events.len(), 13);
    assert_eq!(events[0].shares, 1_000);
    assert!(events[1..].iter().all(|e| e.shares == 250));
    assert_eq!(events.iter().map(|e| e.shares).sum::<u64>(), 4_000);

    // Month-end grant dates clamp rather than spill into the next month
    assert_eq!(events[0].date, date(2024, 8, 31));
    assert_eq!(events[1].date, date(2024, 11, 30));
    assert_eq!(events[2].date, date(2025, 2, 28));
}

#[test]
fn test_quarterly_schedule_from_leap_day() {
    let client = advisor_client();
    let grant = &sample_grants()[1];
    let events = generate_vesting_schedule(grant, &client, date(2024, 1, 1));

    assert_eq!(events.len(), 16);
    assert!(events.iter().all(|e| e.shares == 100));
    assert_eq!(events[0].date, date(2024, 5, 29));
    assert_eq!(events[3].date, date(2025, 2, 28));
    assert_eq!(events[15].date, date(2028, 2, 29));
}

#[test]
fn test_schedule_is_idempotent() {
    let client = advisor_client();
    for grant in sample_grants() {
        let as_of = date(2025, 6, 1);
        let first = generate_vesting_schedule(&grant, &client, as_of);
        let second = generate_vesting_schedule(&grant, &client, as_of);
        assert_eq!(first, second, "grant {}", grant.id);
    }
}

#[test]
fn test_events_are_ascending_by_date() {
    let client = advisor_client();
    for grant in sample_grants() {
        let events = generate_vesting_schedule(&grant, &client, date(2025, 6, 1));
        assert!(
            events.windows(2).all(|w| w[0].date <= w[1].date),
            "grant {} is out of order",
            grant.id
        );
    }
}

#[test]
fn test_status_partitions_total_every_month() {
    let grants = sample_grants();
    let mut as_of = date(2022, 1, 1);
    while as_of <= date(2029, 1, 1) {
        for grant in &grants {
            let status = grant_status(grant, &[], as_of);
            assert_eq!(
                status.vested_total + status.unvested,
                grant.total_shares,
                "grant {} on {as_of}",
                grant.id
            );
            assert!(status.available <= status.vested_total);
        }
        as_of = add_months(as_of, 1);
    }
}

#[test]
fn test_vested_count_never_decreases() {
    let grants = sample_grants();
    for grant in &grants {
        let mut previous = 0;
        let mut as_of = date(2022, 1, 1);
        while as_of <= date(2029, 1, 1) {
            let vested = grant_status(grant, &[], as_of).vested_total;
            assert!(vested >= previous);
            previous = vested;
            as_of = add_months(as_of, 1);
        }
        assert_eq!(previous, grant.total_shares);
    }
}

#[test]
fn test_past_flags_match_status() {
    let client = advisor_client();
    let as_of = date(2025, 9, 30);
    for grant in sample_grants() {
        let events = generate_vesting_schedule(&grant, &client, as_of);
        let past: u64 = events.iter().filter(|e| e.is_past).map(|e| e.shares).sum();
        assert_eq!(past, grant_status(&grant, &[], as_of).vested_total);
    }
}

#[test]
fn test_withholding_never_exceeds_vest() {
    let client = advisor_client();
    let grant = GrantBuilder::rsu("g", "ACME")
        .granted(2024, 1, 1)
        .shares(48)
        .quarterly()
        .price(9.99)
        .withholding(37.0)
        .build();
    for event in generate_vesting_schedule(&grant, &client, date(2030, 1, 1)) {
        assert!(event.shares_sold_to_cover <= event.shares);
        assert_eq!(event.net_shares + event.shares_sold_to_cover, event.shares);
        // Shares sold always cover the withholding
        assert!(event.shares_sold_to_cover as f64 * event.price_at_vest >= event.withholding_amount - 1e-6);
    }
}
