//! GrantDate value object - the calendar-day dedup key.

use chrono::{Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

/// A UTC calendar date. Daily-login and contribution-day grants use this as
/// their dedup key: one grant per user per date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GrantDate(NaiveDate);

impl GrantDate {
    /// Today's date in UTC.
    pub fn today() -> Self {
        Self(Utc::now().date_naive())
    }

    /// Creates a GrantDate from a NaiveDate.
    pub fn from_naive(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Creates a GrantDate from year/month/day, validating the combination.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Result<Self, ValidationError> {
        NaiveDate::from_ymd_opt(year, month, day)
            .map(Self)
            .ok_or_else(|| {
                ValidationError::invalid_format(
                    "grant_date",
                    format!("{:04}-{:02}-{:02} is not a valid date", year, month, day),
                )
            })
    }

    /// Returns the inner NaiveDate.
    pub fn as_naive(&self) -> NaiveDate {
        self.0
    }

    /// The date `days` before this one.
    pub fn minus_days(&self, days: u64) -> Self {
        Self(self.0 - chrono::Duration::days(days as i64))
    }

    /// The date `days` after this one.
    pub fn plus_days(&self, days: u64) -> Self {
        Self(self.0 + chrono::Duration::days(days as i64))
    }

    /// ISO year of this date.
    pub fn year(&self) -> i32 {
        self.0.year()
    }
}

impl fmt::Display for GrantDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl FromStr for GrantDate {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Self)
            .map_err(|e| ValidationError::invalid_format("grant_date", e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_ymd_accepts_valid_dates() {
        let date = GrantDate::from_ymd(2024, 2, 29).unwrap();
        assert_eq!(format!("{}", date), "2024-02-29");
    }

    #[test]
    fn from_ymd_rejects_invalid_dates() {
        assert!(GrantDate::from_ymd(2023, 2, 29).is_err());
        assert!(GrantDate::from_ymd(2024, 13, 1).is_err());
    }

    #[test]
    fn parses_iso_format() {
        let date: GrantDate = "2024-06-01".parse().unwrap();
        assert_eq!(date, GrantDate::from_ymd(2024, 6, 1).unwrap());
    }

    #[test]
    fn minus_and_plus_days_are_inverse() {
        let date = GrantDate::from_ymd(2024, 3, 1).unwrap();
        assert_eq!(date.minus_days(10).plus_days(10), date);
    }

    #[test]
    fn minus_days_crosses_month_boundary() {
        let date = GrantDate::from_ymd(2024, 3, 1).unwrap();
        assert_eq!(date.minus_days(1), GrantDate::from_ymd(2024, 2, 29).unwrap());
    }

    #[test]
    fn ordering_follows_calendar() {
        let earlier = GrantDate::from_ymd(2024, 1, 1).unwrap();
        let later = GrantDate::from_ymd(2024, 1, 2).unwrap();
        assert!(earlier < later);
    }
}
