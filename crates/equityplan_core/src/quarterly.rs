//! Estimated-payment bucketing
//!
//! IRS estimated payments do not follow calendar quarters. Income from
//! January through March is due April 15, April through June is due June 15,
//! July through September is due September 15, and October through December
//! is due January 15 of the following year. Each period's shortfall is the
//! estimated tax on equity income there, less what was already withheld at
//! vest.
//!
//! AMT is approximated per period: ISO spread in a period beyond the full
//! annual room is charged at the flat AMT rate. The room is not drawn down
//! across periods.

use jiff::civil::Date;

use crate::date_math::month_index;
use crate::model::{Grant, PlannedExercise, QuarterlyBreakdown};
use crate::rates::TaxRates;
use crate::tax_tables::AMT_RATE;
use crate::vesting::generate_vesting_schedule_with_rates;

/// A payment period: covered months (0-based), the month index after which
/// the period counts as past, due label, due month/day, and whether the due
/// date falls in the following year.
struct PaymentPeriod {
    months: [usize; 3],
    past_after_month: usize,
    label: &'static str,
    due_month: i8,
    due_day: i8,
    due_next_year: bool,
}

const PAYMENT_PERIODS: [PaymentPeriod; 4] = [
    PaymentPeriod {
        months: [0, 1, 2],
        past_after_month: 2,
        label: "Apr 15",
        due_month: 4,
        due_day: 15,
        due_next_year: false,
    },
    PaymentPeriod {
        months: [3, 4, 5],
        past_after_month: 5,
        label: "Jun 15",
        due_month: 6,
        due_day: 15,
        due_next_year: false,
    },
    PaymentPeriod {
        months: [6, 7, 8],
        past_after_month: 8,
        label: "Sep 15",
        due_month: 9,
        due_day: 15,
        due_next_year: false,
    },
    PaymentPeriod {
        months: [9, 10, 11],
        past_after_month: 10,
        label: "Jan 15 (next year)",
        due_month: 1,
        due_day: 15,
        due_next_year: true,
    },
];

/// Index (0..4) of the payment period a month index falls in.
pub fn period_for_month(month_index: usize) -> usize {
    (month_index / 3).min(3)
}

/// Bucket one year's vesting income and ISO spread into payment periods.
pub fn aggregate_quarterly_tax(
    grants: &[Grant],
    planned_exercises: &[PlannedExercise],
    amt_room: f64,
    rates: &TaxRates,
    year: i16,
    as_of: Date,
) -> [QuarterlyBreakdown; 4] {
    let mut vesting_income = [0.0; 4];
    let mut withholding_credit = [0.0; 4];
    let mut iso_spread = [0.0; 4];

    for grant in grants.iter().filter(|g| g.grant_type.withholds_at_vest()) {
        for event in generate_vesting_schedule_with_rates(grant, rates, as_of)
            .iter()
            .filter(|e| e.date.year() == year)
        {
            let period = period_for_month(month_index(event.date));
            vesting_income[period] += event.gross_value;
            withholding_credit[period] += event.withholding_amount;
        }
    }

    for exercise in planned_exercises
        .iter()
        .filter(|e| e.exercise_date.year() == year)
    {
        iso_spread[period_for_month(month_index(exercise.exercise_date))] += exercise.amt_exposure;
    }

    std::array::from_fn(|i| {
        let period = &PAYMENT_PERIODS[i];
        let estimated_tax = vesting_income[i] * rates.effective_vest_rate()
            + (iso_spread[i] - amt_room).max(0.0) * AMT_RATE;
        let due_year = if period.due_next_year {
            year.saturating_add(1)
        } else {
            year
        }
        .clamp(Date::MIN.year(), Date::MAX.year());

        QuarterlyBreakdown {
            quarter: i as u8 + 1,
            months: period.months,
            due_label: period.label.to_string(),
            due_date: jiff::civil::date(due_year, period.due_month, period.due_day),
            vesting_income: vesting_income[i],
            withholding_credit: withholding_credit[i],
            iso_spread: iso_spread[i],
            estimated_tax,
            payment_due: (estimated_tax - withholding_credit[i]).max(0.0),
            is_past: as_of.year() > year
                || (as_of.year() == year && period.past_after_month < month_index(as_of)),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GrantBuilder;
    use jiff::civil::date;

    fn rates() -> TaxRates {
        TaxRates {
            state_rate: 0.0,
            fed_ltcg_rate: 0.15,
            ordinary_rate: 0.30,
            ltcg_rate: 0.188,
        }
    }

    #[test]
    fn test_period_for_month() {
        assert_eq!(period_for_month(0), 0);
        assert_eq!(period_for_month(2), 0);
        assert_eq!(period_for_month(3), 1);
        assert_eq!(period_for_month(8), 2);
        assert_eq!(period_for_month(10), 3);
        assert_eq!(period_for_month(11), 3);
    }

    #[test]
    fn test_november_event_lands_in_fourth_period() {
        let grant = GrantBuilder::rsu("g", "ACME")
            .custom(&[(date(2025, 11, 10), 100)])
            .shares(100)
            .price(100.0)
            .withholding(22.0)
            .build();
        let q = aggregate_quarterly_tax(&[grant], &[], 85_700.0, &rates(), 2025, date(2025, 6, 1));

        assert_eq!(q[3].months, [9, 10, 11]);
        assert_eq!(q[3].due_label, "Jan 15 (next year)");
        assert_eq!(q[3].due_date, date(2026, 1, 15));
        assert_eq!(q[3].vesting_income, 10_000.0);
        assert!((q[3].withholding_credit - 2_200.0).abs() < 1e-9);
        // 10_000 * (0.30 + 0.038), less 2_200 withheld
        assert!((q[3].estimated_tax - 3_380.0).abs() < 1e-9);
        assert!((q[3].payment_due - 1_180.0).abs() < 1e-9);
        assert_eq!(q[0].vesting_income, 0.0);
    }

    #[test]
    fn test_is_past_by_evaluation_month() {
        let q = aggregate_quarterly_tax(&[], &[], 85_700.0, &rates(), 2025, date(2025, 4, 1));
        assert!(q[0].is_past);
        assert!(!q[1].is_past);

        let q = aggregate_quarterly_tax(&[], &[], 85_700.0, &rates(), 2025, date(2025, 11, 30));
        assert!(q[2].is_past);
        assert!(!q[3].is_past);

        let q = aggregate_quarterly_tax(&[], &[], 85_700.0, &rates(), 2025, date(2025, 12, 1));
        assert!(q.iter().all(|p| p.is_past));

        let q = aggregate_quarterly_tax(&[], &[], 85_700.0, &rates(), 2025, date(2026, 1, 2));
        assert!(q.iter().all(|p| p.is_past));

        let q = aggregate_quarterly_tax(&[], &[], 85_700.0, &rates(), 2025, date(2024, 12, 1));
        assert!(q.iter().all(|p| !p.is_past));
    }

    #[test]
    fn test_november_vest_is_past_in_december() {
        let grant = GrantBuilder::rsu("g", "ACME")
            .custom(&[(date(2025, 11, 10), 100)])
            .shares(100)
            .price(100.0)
            .build();
        let q = aggregate_quarterly_tax(&[grant], &[], 85_700.0, &rates(), 2025, date(2025, 12, 15));
        assert_eq!(q[3].vesting_income, 10_000.0);
        assert_eq!(q[3].due_label, "Jan 15 (next year)");
        assert!(q[3].is_past);
    }

    #[test]
    fn test_last_supported_year_does_not_overflow() {
        let q = aggregate_quarterly_tax(&[], &[], 85_700.0, &rates(), 9999, date(2025, 1, 1));
        assert_eq!(q[0].due_date, date(9999, 4, 15));
        assert_eq!(q[3].due_date.year(), 9999);
    }

    #[test]
    fn test_other_years_are_ignored() {
        let grant = GrantBuilder::rsu("g", "ACME")
            .granted(2024, 1, 1)
            .shares(1_600)
            .quarterly()
            .price(10.0)
            .build();
        let q = aggregate_quarterly_tax(&[grant], &[], 85_700.0, &rates(), 2025, date(2025, 1, 1));
        // Quarterly vests on the 1st of Jan/Apr/Jul/Oct: one per period in 2025
        for period in &q {
            assert_eq!(period.vesting_income, 1_000.0);
        }
    }

    #[test]
    fn test_options_contribute_no_vesting_income() {
        let grant = GrantBuilder::iso("g", "ACME")
            .custom(&[(date(2025, 2, 1), 100)])
            .shares(100)
            .price(100.0)
            .build();
        let q = aggregate_quarterly_tax(&[grant], &[], 85_700.0, &rates(), 2025, date(2025, 1, 1));
        assert_eq!(q[0].vesting_income, 0.0);
    }

    #[test]
    fn test_iso_spread_beyond_room_is_charged_amt() {
        let exercises = vec![
            PlannedExercise::new("x1", "g", 2_000, date(2025, 5, 1), 10.0, 60.0),
            PlannedExercise::new("x2", "g", 1_000, date(2025, 8, 1), 10.0, 60.0),
        ];
        let q = aggregate_quarterly_tax(&[], &exercises, 85_700.0, &rates(), 2025, date(2025, 1, 1));

        assert_eq!(q[1].iso_spread, 100_000.0);
        assert!((q[1].estimated_tax - 14_300.0 * 0.28).abs() < 1e-9);
        assert_eq!(q[1].payment_due, q[1].estimated_tax);

        // 50_000 of spread sits within the room on its own
        assert_eq!(q[2].iso_spread, 50_000.0);
        assert_eq!(q[2].estimated_tax, 0.0);
    }
}
