//! Calendar arithmetic helpers for vesting and holding-period math.
//!
//! Vesting schedules step in whole months from the grant date and holding
//! periods are measured in whole years, both clamping to the last day of the
//! target month (a Jan 31 grant vests on Feb 28/29). Day differences use
//! Rata Die day-numbering so they are O(1) with no `Span` normalisation.

use jiff::civil::Date;

/// Fast leap year check.
#[inline]
pub fn is_leap_year(year: i16) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}

/// Days in the given month (1-based) without building a `Date`.
#[inline]
pub fn days_in_month(year: i16, month: i8) -> i8 {
    const DAYS: [i8; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];
    if month == 2 && is_leap_year(year) {
        29
    } else {
        DAYS[(month - 1) as usize]
    }
}

/// Convert a civil date to a Rata Die day number (days since 0001-01-01).
#[inline]
fn rata_die(d: Date) -> i32 {
    let y = d.year() as i32;
    let m = d.month() as i32;
    let day = d.day() as i32;

    // Shift March = month 1 so Feb (end of "year") is month 12
    let a = (14 - m) / 12;
    let y2 = y - a;
    let m2 = m + 12 * a - 3;

    day + (153 * m2 + 2) / 5 + 365 * y2 + y2 / 4 - y2 / 100 + y2 / 400 - 306
}

/// Number of days from `d1` to `d2`. Positive when `d2 > d1`.
#[inline]
pub fn days_between(d1: Date, d2: Date) -> i32 {
    rata_die(d2) - rata_die(d1)
}

/// Add (or subtract) whole months, clamping the day to the target month's length.
/// Saturates at `Date::MIN` / `Date::MAX`.
pub fn add_months(d: Date, months: i32) -> Date {
    let zero_based = (d.year() as i32 * 12 + (d.month() as i32 - 1)).saturating_add(months);
    if zero_based > Date::MAX.year() as i32 * 12 + 11 {
        return Date::MAX;
    }
    if zero_based < Date::MIN.year() as i32 * 12 {
        return Date::MIN;
    }
    let year = zero_based.div_euclid(12) as i16;
    let month = (zero_based.rem_euclid(12) + 1) as i8;
    let day = d.day().min(days_in_month(year, month));
    jiff::civil::date(year, month, day)
}

/// Add whole years; Feb 29 lands on Feb 28 in non-leap target years.
#[inline]
pub fn add_years(d: Date, years: i32) -> Date {
    add_months(d, years * 12)
}

/// 0-based month index (January = 0), the convention used for payment buckets.
#[inline]
pub fn month_index(d: Date) -> usize {
    (d.month() - 1) as usize
}
