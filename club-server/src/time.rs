//! Club civil-time helpers
//!
//! Every "today", month boundary and week id is computed in the club
//! timezone. Handlers convert request strings here; the database layer only
//! sees `NaiveDate`.

use chrono::{Datelike, Duration, NaiveDate};
use chrono_tz::Tz;
use shared::error::{AppError, AppResult};

/// Parse a `YYYY-MM-DD` date string
pub fn parse_date(date: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
        .map_err(|_| AppError::validation(format!("Invalid date format: {date}, expected YYYY-MM-DD")))
}

/// Today in the club timezone
pub fn today(tz: Tz) -> NaiveDate {
    chrono::Utc::now().with_timezone(&tz).date_naive()
}

/// First and last day of a month
pub fn month_bounds(year: i32, month: u32) -> Option<(NaiveDate, NaiveDate)> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let (ny, nm) = next_month(year, month);
    let last = NaiveDate::from_ymd_opt(ny, nm, 1)?.pred_opt()?;
    Some((first, last))
}

pub fn next_month(year: i32, month: u32) -> (i32, u32) {
    if month >= 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    }
}

pub fn previous_month(year: i32, month: u32) -> (i32, u32) {
    if month <= 1 {
        (year - 1, 12)
    } else {
        (year, month - 1)
    }
}

/// The `count` months ending with (and including) `year`/`month`, oldest first
pub fn trailing_months(year: i32, month: u32, count: usize) -> Vec<(i32, u32)> {
    let mut out = Vec::with_capacity(count);
    let mut cursor = (year, month);
    for _ in 0..count {
        out.push(cursor);
        cursor = previous_month(cursor.0, cursor.1);
    }
    out.reverse();
    out
}

/// ISO-8601 week label, e.g. `2025-W01`
pub fn iso_week_id(date: NaiveDate) -> String {
    let week = date.iso_week();
    format!("{}-W{:02}", week.year(), week.week())
}

/// Monday of the ISO week containing `date`
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date("2025-03-09").unwrap(), d(2025, 3, 9));
        assert!(parse_date("09/03/2025").is_err());
        assert!(parse_date("2025-02-30").is_err());
        assert!(parse_date("").is_err());
    }

    #[test]
    fn test_month_bounds_leap_years() {
        assert_eq!(month_bounds(2024, 2), Some((d(2024, 2, 1), d(2024, 2, 29))));
        assert_eq!(month_bounds(2025, 2), Some((d(2025, 2, 1), d(2025, 2, 28))));
        assert_eq!(month_bounds(2000, 2).unwrap().1, d(2000, 2, 29));
        assert_eq!(month_bounds(1900, 2).unwrap().1, d(1900, 2, 28));
    }

    #[test]
    fn test_month_bounds_year_end() {
        assert_eq!(
            month_bounds(2024, 12),
            Some((d(2024, 12, 1), d(2024, 12, 31)))
        );
        assert_eq!(month_bounds(2024, 4).unwrap().1, d(2024, 4, 30));
        assert_eq!(month_bounds(2024, 13), None);
    }

    #[test]
    fn test_previous_and_next_month_wrap() {
        assert_eq!(previous_month(2025, 1), (2024, 12));
        assert_eq!(previous_month(2025, 7), (2025, 6));
        assert_eq!(next_month(2024, 12), (2025, 1));
    }

    #[test]
    fn test_trailing_months_crosses_year() {
        let months = trailing_months(2025, 2, 4);
        assert_eq!(months, vec![(2024, 11), (2024, 12), (2025, 1), (2025, 2)]);
        assert_eq!(trailing_months(2025, 6, 12).len(), 12);
    }

    #[test]
    fn test_iso_week_id_at_year_boundary() {
        // 2024-12-30 is Monday of ISO week 1 of 2025
        assert_eq!(iso_week_id(d(2024, 12, 30)), "2025-W01");
        assert_eq!(iso_week_id(d(2021, 1, 3)), "2020-W53");
        assert_eq!(iso_week_id(d(2025, 3, 12)), "2025-W11");
    }

    #[test]
    fn test_week_start_is_monday() {
        assert_eq!(week_start(d(2025, 3, 16)), d(2025, 3, 10));
        assert_eq!(week_start(d(2025, 3, 10)), d(2025, 3, 10));
    }
}
