use chrono::{DateTime, Datelike, NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};

use crate::error::InvalidDateError;

/// The year-progress figure divides by 365 even in leap years, so Dec 31 of a
/// leap year reports 100.27%.
pub const YEAR_LENGTH_DAYS: f64 = 365.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateMetrics {
    pub today_label: String,
    pub days_to_target: i64,
    pub day_of_year: u32,
    pub year_complete_percent: f64,
}

/// Derive the dashboard date figures from a reference date.
pub fn compute(reference: NaiveDate, target: NaiveDate) -> DateMetrics {
    let day_of_year = reference.ordinal();

    DateMetrics {
        today_label: long_label(reference),
        days_to_target: (target - reference).num_days(),
        day_of_year,
        year_complete_percent: round2(f64::from(day_of_year) / YEAR_LENGTH_DAYS * 100.0),
    }
}

/// Like [`compute`], using the local calendar date of `now`.
pub fn compute_now<Tz: TimeZone>(now: &DateTime<Tz>, target: NaiveDate) -> DateMetrics {
    compute(now.date_naive(), target)
}

/// `Wednesday, December 31, 2025`
pub fn long_label(date: NaiveDate) -> String {
    date.format("%A, %B %-d, %Y").to_string()
}

/// Parse a `YYYY-MM-DD` date.
pub fn parse_date(input: &str) -> Result<NaiveDate, InvalidDateError> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .map_err(|_| InvalidDateError { input: input.to_string() })
}

/// December 31 of the given date's year.
pub fn end_of_year(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), 12, 31).unwrap_or(date)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn first_and_last_day_of_common_year() {
        let target = d(2026, 1, 1);
        assert_eq!(compute(d(2025, 1, 1), target).day_of_year, 1);

        let dec31 = compute(d(2025, 12, 31), target);
        assert_eq!(dec31.day_of_year, 365);
        assert_eq!(dec31.year_complete_percent, 100.0);
    }

    #[test]
    fn same_day_target_is_zero() {
        let day = d(2026, 7, 20);
        assert_eq!(compute(day, day).days_to_target, 0);
    }

    #[test]
    fn countdown_goes_negative_after_target() {
        assert_eq!(compute(d(2026, 7, 20), d(2026, 7, 25)).days_to_target, 5);
        assert_eq!(compute(d(2026, 7, 20), d(2026, 7, 18)).days_to_target, -2);
        assert_eq!(compute(d(2025, 12, 31), d(2026, 1, 1)).days_to_target, 1);
    }

    #[test]
    fn leap_year_keeps_365_denominator() {
        // Known simplification: 366 / 365 overshoots 100%.
        let m = compute(d(2024, 12, 31), d(2025, 1, 1));
        assert_eq!(m.day_of_year, 366);
        assert_eq!(m.year_complete_percent, 100.27);
    }

    #[test]
    fn percent_rounds_to_two_decimals() {
        // Feb 1 is day 32: 32 / 365 * 100 = 8.767...
        assert_eq!(compute(d(2025, 2, 1), d(2025, 2, 1)).year_complete_percent, 8.77);
    }

    #[test]
    fn label_uses_long_form() {
        assert_eq!(long_label(d(2025, 12, 31)), "Wednesday, December 31, 2025");
        assert_eq!(long_label(d(2026, 3, 5)), "Thursday, March 5, 2026");
    }

    #[test]
    fn compute_is_idempotent() {
        let a = compute(d(2026, 10, 15), d(2026, 12, 31));
        let b = compute(d(2026, 10, 15), d(2026, 12, 31));
        assert_eq!(a, b);
    }

    #[test]
    fn compute_now_uses_local_date_of_instant() {
        let late_utc = Utc.with_ymd_and_hms(2026, 1, 1, 3, 0, 0).unwrap();
        let pacific = FixedOffset::west_opt(8 * 3600).unwrap();
        let local = late_utc.with_timezone(&pacific);

        assert_eq!(compute_now(&late_utc, d(2026, 1, 1)).day_of_year, 1);
        assert_eq!(compute_now(&local, d(2026, 1, 1)).day_of_year, 365);
    }

    #[test]
    fn parse_date_rejects_garbage() {
        assert_eq!(parse_date("2026-07-20").unwrap(), d(2026, 7, 20));
        assert!(parse_date("2026-02-30").is_err());
        assert!(parse_date("tomorrow").is_err());
        let err = parse_date("").unwrap_err();
        assert!(err.to_string().contains("YYYY-MM-DD"));
    }

    #[test]
    fn end_of_year_is_dec_31() {
        assert_eq!(end_of_year(d(2026, 10, 15)), d(2026, 12, 31));
    }
}
