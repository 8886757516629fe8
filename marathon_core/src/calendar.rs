//! Date arithmetic and rounding helpers.
//!
//! All plan dates are local calendar days; nothing here converts between
//! timezones. Arithmetic saturates at the ends of the supported date range
//! instead of panicking.

use crate::progression::PLAN_WEEKS;
use crate::IsoDate;
use chrono::{Datelike, Days, Local, NaiveDate};

/// Convert a calendar date to its `yyyy-MM-dd` form
pub fn to_iso_date(date: NaiveDate) -> IsoDate {
    IsoDate::from(date)
}

/// Convert an `IsoDate` back to a calendar date (midnight, local calendar)
pub fn from_iso_date(date: IsoDate) -> NaiveDate {
    date.naive()
}

/// Shift a date by `days` (may be negative)
pub fn add_iso_days(date: IsoDate, days: i64) -> IsoDate {
    let base = from_iso_date(date);
    let shifted = if days >= 0 {
        base.checked_add_days(Days::new(days.unsigned_abs()))
            .unwrap_or(NaiveDate::MAX)
    } else {
        base.checked_sub_days(Days::new(days.unsigned_abs()))
            .unwrap_or(NaiveDate::MIN)
    };
    to_iso_date(shifted)
}

/// Monday of the week containing `date`
pub fn week_start(date: IsoDate) -> IsoDate {
    let offset = from_iso_date(date).weekday().num_days_from_monday();
    add_iso_days(date, -i64::from(offset))
}

/// Whole days from `from` to `to` (negative if `to` is earlier)
pub fn days_between(from: IsoDate, to: IsoDate) -> i64 {
    (from_iso_date(to) - from_iso_date(from)).num_days()
}

/// Today's date in the local timezone
pub fn today_local() -> IsoDate {
    to_iso_date(Local::now().date_naive())
}

/// Short display form, e.g. `1/15 (Mon)`
pub fn format_short_date(date: IsoDate) -> String {
    from_iso_date(date).format("%-m/%-d (%a)").to_string()
}

/// 1-based plan week that `today` falls in, if it is inside the plan
pub fn current_week_number(plan_start: IsoDate, today: IsoDate) -> Option<u32> {
    let elapsed = days_between(plan_start, today);
    if elapsed < 0 {
        return None;
    }
    let week = elapsed / 7 + 1;
    u32::try_from(week).ok().filter(|w| *w <= PLAN_WEEKS)
}

/// Round to one decimal place, halves away from zero
pub fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

/// Clamp `x` into `[lo, hi]`
///
/// When `hi < lo` the lower bound wins, so a cap below the base yields the
/// base. Unlike `f64::clamp` this never panics.
pub fn clamp(x: f64, lo: f64, hi: f64) -> f64 {
    lo.max(hi.min(x))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> IsoDate {
        IsoDate::parse(s).unwrap()
    }

    #[test]
    fn test_round1() {
        assert_eq!(round1(3.14), 3.1);
        assert_eq!(round1(3.15), 3.2);
        assert_eq!(round1(2.52), 2.5);
        assert_eq!(round1(42.195), 42.2);
        assert_eq!(round1(-1.25), -1.3);
        assert_eq!(round1(0.0), 0.0);
    }

    #[test]
    fn test_clamp_prefers_lower_bound_when_inverted() {
        assert_eq!(clamp(5.0, 1.0, 10.0), 5.0);
        assert_eq!(clamp(-1.0, 1.0, 10.0), 1.0);
        assert_eq!(clamp(11.0, 1.0, 10.0), 10.0);
        assert_eq!(clamp(11.0, 20.0, 10.0), 20.0);
    }

    #[test]
    fn test_add_iso_days_across_boundaries() {
        assert_eq!(add_iso_days(date("2024-01-31"), 1), date("2024-02-01"));
        assert_eq!(add_iso_days(date("2024-02-28"), 1), date("2024-02-29"));
        assert_eq!(add_iso_days(date("2024-12-31"), 1), date("2025-01-01"));
        assert_eq!(add_iso_days(date("2024-01-01"), -1), date("2023-12-31"));
        assert_eq!(add_iso_days(date("2024-01-01"), 0), date("2024-01-01"));
    }

    #[test]
    fn test_add_iso_days_saturates() {
        let far = add_iso_days(date("2024-01-01"), i64::MAX);
        assert_eq!(from_iso_date(far), NaiveDate::MAX);
    }

    #[test]
    fn test_week_start_is_monday() {
        // 2024-01-01 is a Monday
        assert_eq!(week_start(date("2024-01-01")), date("2024-01-01"));
        assert_eq!(week_start(date("2024-01-03")), date("2024-01-01"));
        assert_eq!(week_start(date("2024-01-07")), date("2024-01-01"));
        assert_eq!(week_start(date("2024-01-08")), date("2024-01-08"));
    }

    #[test]
    fn test_iso_round_trip() {
        let d = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(to_iso_date(d).to_string(), "2024-03-09");
        assert_eq!(from_iso_date(to_iso_date(d)), d);
    }

    #[test]
    fn test_format_short_date() {
        assert_eq!(format_short_date(date("2024-01-15")), "1/15 (Mon)");
        assert_eq!(format_short_date(date("2024-12-01")), "12/1 (Sun)");
    }

    #[test]
    fn test_current_week_number() {
        let start = date("2024-01-01");
        assert_eq!(current_week_number(start, date("2023-12-31")), None);
        assert_eq!(current_week_number(start, start), Some(1));
        assert_eq!(current_week_number(start, date("2024-01-07")), Some(1));
        assert_eq!(current_week_number(start, date("2024-01-08")), Some(2));
        // last day of week 24
        assert_eq!(current_week_number(start, add_iso_days(start, 167)), Some(24));
        assert_eq!(current_week_number(start, add_iso_days(start, 168)), None);
    }
}
