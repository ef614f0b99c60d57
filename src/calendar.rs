use crate::error::ProgressError;
use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Calendar quarter of a year. Milestones are grouped by quarter, and the
/// quarter boundaries give the default due dates for quarterly milestones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Quarter {
    Q1,
    Q2,
    Q3,
    Q4,
}

impl Quarter {
    pub const ALL: [Quarter; 4] = [Quarter::Q1, Quarter::Q2, Quarter::Q3, Quarter::Q4];

    /// Months 1-3 map to Q1, 4-6 to Q2, 7-9 to Q3 and 10-12 to Q4.
    pub fn from_month(month: u32) -> Option<Self> {
        match month {
            1..=3 => Some(Quarter::Q1),
            4..=6 => Some(Quarter::Q2),
            7..=9 => Some(Quarter::Q3),
            10..=12 => Some(Quarter::Q4),
            _ => None,
        }
    }

    pub fn from_date(date: NaiveDate) -> Self {
        match date.month() {
            1..=3 => Quarter::Q1,
            4..=6 => Quarter::Q2,
            7..=9 => Quarter::Q3,
            _ => Quarter::Q4,
        }
    }

    pub fn number(self) -> u8 {
        match self {
            Quarter::Q1 => 1,
            Quarter::Q2 => 2,
            Quarter::Q3 => 3,
            Quarter::Q4 => 4,
        }
    }

    pub fn months(self) -> [u32; 3] {
        let first = u32::from(self.number() - 1) * 3 + 1;
        [first, first + 1, first + 2]
    }

    pub fn label(self) -> &'static str {
        match self {
            Quarter::Q1 => "Q1",
            Quarter::Q2 => "Q2",
            Quarter::Q3 => "Q3",
            Quarter::Q4 => "Q4",
        }
    }

    /// First day of the quarter's first month.
    pub fn start_date(self, year: i32) -> Result<NaiveDate, ProgressError> {
        let month = self.months()[0];
        NaiveDate::from_ymd_opt(year, month, 1)
            .ok_or_else(|| ProgressError::invalid(format!("year {year} is out of range")))
    }

    /// Last day of the quarter's last month, using the real month length.
    pub fn end_date(self, year: i32) -> Result<NaiveDate, ProgressError> {
        end_of_month(year, self.months()[2])
    }
}

impl TryFrom<u8> for Quarter {
    type Error = ProgressError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Quarter::Q1),
            2 => Ok(Quarter::Q2),
            3 => Ok(Quarter::Q3),
            4 => Ok(Quarter::Q4),
            other => Err(ProgressError::invalid(format!(
                "quarter {other} is outside 1-4"
            ))),
        }
    }
}

impl From<Quarter> for u8 {
    fn from(quarter: Quarter) -> Self {
        quarter.number()
    }
}

impl fmt::Display for Quarter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

pub fn quarter_of_month(month: u32) -> Option<u8> {
    Quarter::from_month(month).map(Quarter::number)
}

pub fn quarter_of_date(date: NaiveDate) -> u8 {
    Quarter::from_date(date).number()
}

/// Months belonging to `quarter`, or an empty list when the quarter is not 1-4.
pub fn months_in_quarter(quarter: u8) -> Vec<u32> {
    Quarter::try_from(quarter)
        .map(|q| q.months().to_vec())
        .unwrap_or_default()
}

pub fn quarter_start_date(year: i32, quarter: u8) -> Result<NaiveDate, ProgressError> {
    Quarter::try_from(quarter)?.start_date(year)
}

pub fn quarter_end_date(year: i32, quarter: u8) -> Result<NaiveDate, ProgressError> {
    Quarter::try_from(quarter)?.end_date(year)
}

pub fn is_date_in_quarter(date: NaiveDate, quarter: u8) -> bool {
    quarter_of_date(date) == quarter
}

pub fn current_quarter(today: NaiveDate) -> u8 {
    quarter_of_date(today)
}

pub fn current_year(today: NaiveDate) -> i32 {
    today.year()
}

pub fn quarter_label(quarter: u8) -> String {
    format!("Q{quarter}")
}

pub fn month_name(month: u32) -> Option<&'static str> {
    let idx = usize::try_from(month).ok()?.checked_sub(1)?;
    MONTH_NAMES.get(idx).copied()
}

/// Last calendar day of `month` in `year`.
pub fn end_of_month(year: i32, month: u32) -> Result<NaiveDate, ProgressError> {
    let first_of_next = match month {
        12 => year
            .checked_add(1)
            .and_then(|next| NaiveDate::from_ymd_opt(next, 1, 1)),
        1..=11 => NaiveDate::from_ymd_opt(year, month + 1, 1),
        _ => None,
    };
    first_of_next
        .and_then(|date| date.pred_opt())
        .ok_or_else(|| ProgressError::invalid(format!("no month {month} in year {year}")))
}

/// "Jan 5, 2025"
pub fn format_date(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}

/// "January 2025"
pub fn format_month_year(date: NaiveDate) -> String {
    date.format("%B %Y").to_string()
}

/// Whole calendar days from `today` to `target`: positive in the future,
/// negative in the past, zero on the same day.
pub fn days_until(target: NaiveDate, today: NaiveDate) -> i64 {
    (target - today).num_days()
}

/// Same as [`days_until`] after dropping the time of day from both instants.
pub fn days_until_at(target: NaiveDateTime, now: NaiveDateTime) -> i64 {
    days_until(target.date(), now.date())
}

pub fn is_overdue(target: NaiveDate, today: NaiveDate) -> bool {
    days_until(target, today) < 0
}

pub fn add_days(date: NaiveDate, days: i64) -> NaiveDate {
    date + Duration::days(days)
}

/// Parses `YYYY-MM-DD`, falling back to an RFC 3339 timestamp whose date part
/// is kept.
pub fn parse_date(input: &str) -> Result<NaiveDate, ProgressError> {
    let trimmed = input.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(date);
    }
    DateTime::parse_from_rfc3339(trimmed)
        .map(|dt| dt.date_naive())
        .map_err(|_| ProgressError::invalid(format!("'{input}' is not a valid date (YYYY-MM-DD)")))
}
