//! Week boundaries for weekly check-ins.

use chrono::{Datelike, Duration, NaiveDate, Weekday};

pub const DEFAULT_WEEK_START: Weekday = Weekday::Sun;

/// First day of the week containing `date`.
pub fn week_start(date: NaiveDate, first_day: Weekday) -> NaiveDate {
    let offset = (7 + date.weekday().num_days_from_monday() - first_day.num_days_from_monday()) % 7;
    date - Duration::days(i64::from(offset))
}

/// Last day of the week containing `date` (start + 6 days).
pub fn week_end(date: NaiveDate, first_day: Weekday) -> NaiveDate {
    week_start(date, first_day) + Duration::days(6)
}

pub fn previous_week_start(week_start: NaiveDate) -> NaiveDate {
    week_start - Duration::days(7)
}

pub fn next_week_start(week_start: NaiveDate) -> NaiveDate {
    week_start + Duration::days(7)
}

pub fn is_current_week(week_start_date: NaiveDate, today: NaiveDate, first_day: Weekday) -> bool {
    week_start(today, first_day) == week_start_date
}

/// "Jan 5 - Jan 11, 2025"
pub fn format_week_range(week_start: NaiveDate) -> String {
    let week_end = week_start + Duration::days(6);
    format!(
        "{} - {}",
        week_start.format("%b %-d"),
        week_end.format("%b %-d, %Y")
    )
}
