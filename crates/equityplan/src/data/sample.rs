//! Sample client written by `equityplan init`

use equityplan_core::config::{ClientBuilder, GrantBuilder};
use equityplan_core::model::{Client, PlannedExercise};
use jiff::civil::date;

pub const SAMPLE_CLIENT_ID: &str = "sample";

/// A married client in California holding one of each common award type.
pub fn sample_client() -> Client {
    ClientBuilder::new(SAMPLE_CLIENT_ID)
        .name("Sample Client")
        .state("CA")
        .married_joint()
        .bracket(35.0)
        .income(380_000.0)
        .grant(
            GrantBuilder::rsu("acme-rsu-2024", "ACME")
                .company("Acme Corp")
                .granted(2024, 3, 15)
                .shares(4_800)
                .price(62.0)
                .grant_price(48.0)
                .withholding(22.0)
                .vest_price(date(2025, 3, 15), 55.25),
        )
        .grant(
            GrantBuilder::iso("acme-iso-2022", "ACME")
                .company("Acme Corp")
                .granted(2022, 9, 1)
                .shares(12_000)
                .strike(6.5)
                .price(62.0),
        )
        .grant(
            GrantBuilder::espp("acme-espp-2025h1", "ACME")
                .company("Acme Corp")
                .espp_offering_start(date(2024, 11, 30))
                .espp_purchase(date(2025, 5, 30))
                .espp_fmv(47.0, 58.0)
                .espp_discount(15.0)
                .shares(310)
                .price(62.0),
        )
        .exercise(PlannedExercise::new(
            "x-2025-1",
            "acme-iso-2022",
            2_000,
            date(2025, 9, 15),
            6.5,
            62.0,
        ))
        .build()
}
