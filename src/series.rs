//! Calendar-month arithmetic for gap-filled time series.
//!
//! Monthly endpoints must return one bucket for every calendar month in the
//! requested window, whether or not the warehouse produced a row for it.
//! `MonthKey` is the join key: queries format their group column as
//! `YYYY-MM` and the shaper left-joins those rows onto the enumerated range.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use std::fmt;
use std::str::FromStr;

use crate::error::StatsError;

/// A calendar month, ordered, formatted as `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    year: i32,
    month: u32,
}

impl MonthKey {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        if (1..=12).contains(&month) {
            Some(MonthKey { year, month })
        } else {
            None
        }
    }

    /// The month containing the given instant.
    pub fn containing(at: DateTime<Utc>) -> Self {
        MonthKey {
            year: at.year(),
            month: at.month(),
        }
    }

    /// First day of this month.
    pub fn first_day(self) -> NaiveDate {
        // month is validated at construction
        NaiveDate::from_ymd_opt(self.year, self.month, 1).expect("valid month")
    }

    pub fn next(self) -> Self {
        if self.month == 12 {
            MonthKey {
                year: self.year + 1,
                month: 1,
            }
        } else {
            MonthKey {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    /// The month `n` months before this one.
    pub fn months_back(self, n: u32) -> Self {
        let total = self.year as i64 * 12 + (self.month as i64 - 1) - n as i64;
        MonthKey {
            year: total.div_euclid(12) as i32,
            month: (total.rem_euclid(12) + 1) as u32,
        }
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for MonthKey {
    type Err = StatsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || {
            StatsError::InvalidParameter(format!(
                "Invalid month '{}': expected format YYYY-MM",
                s
            ))
        };

        let (year, month) = s.split_once('-').ok_or_else(invalid)?;
        if year.len() != 4 || month.len() != 2 {
            return Err(invalid());
        }
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        MonthKey::new(year, month).ok_or_else(invalid)
    }
}

/// Every month from `start` to `end` inclusive, ascending. Empty when
/// `start > end`.
pub fn month_range(start: MonthKey, end: MonthKey) -> Vec<MonthKey> {
    let mut months = Vec::new();
    let mut current = start;
    while current <= end {
        months.push(current);
        current = current.next();
    }
    months
}

/// The `len`-month window ending at the month containing `now`.
pub fn trailing_window(now: DateTime<Utc>, len: u32) -> (MonthKey, MonthKey) {
    let end = MonthKey::containing(now);
    (end.months_back(len.saturating_sub(1)), end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn month(s: &str) -> MonthKey {
        s.parse().unwrap()
    }

    #[test]
    fn test_parse_and_display_round_trip() {
        let key = month("2024-07");
        assert_eq!(key.to_string(), "2024-07");
        assert_eq!(key.first_day(), NaiveDate::from_ymd_opt(2024, 7, 1).unwrap());
    }

    #[test]
    fn test_parse_rejects_malformed_input() {
        assert!("2024".parse::<MonthKey>().is_err());
        assert!("2024-13".parse::<MonthKey>().is_err());
        assert!("2024-00".parse::<MonthKey>().is_err());
        assert!("24-01".parse::<MonthKey>().is_err());
        assert!("2024-1".parse::<MonthKey>().is_err());
        assert!("garbage".parse::<MonthKey>().is_err());
    }

    #[test]
    fn test_range_is_inclusive_and_ascending() {
        let months = month_range(month("2023-11"), month("2024-02"));
        let rendered: Vec<String> = months.iter().map(|m| m.to_string()).collect();
        assert_eq!(rendered, ["2023-11", "2023-12", "2024-01", "2024-02"]);
    }

    #[test]
    fn test_range_single_month() {
        assert_eq!(month_range(month("2024-05"), month("2024-05")).len(), 1);
    }

    #[test]
    fn test_range_empty_when_inverted() {
        assert!(month_range(month("2024-06"), month("2024-05")).is_empty());
    }

    #[test]
    fn test_months_back_crosses_year_boundary() {
        assert_eq!(month("2024-02").months_back(3), month("2023-11"));
        assert_eq!(month("2024-02").months_back(0), month("2024-02"));
        assert_eq!(month("2024-02").months_back(26), month("2021-12"));
    }

    #[test]
    fn test_trailing_window_length() {
        let now = Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap();
        let (start, end) = trailing_window(now, 12);
        assert_eq!(month_range(start, end).len(), 12);
        assert_eq!(end, month("2024-06"));
        assert_eq!(start, month("2023-07"));
    }

    #[test]
    fn test_trailing_window_of_one() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let (start, end) = trailing_window(now, 1);
        assert_eq!(start, end);
    }
}
