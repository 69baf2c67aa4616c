//! Calendar month keys
//!
//! Every per-month dictionary in a trace is keyed by a [`MonthKey`]. Keys
//! render as `YYYY-MM` and order chronologically, so an ordered map keyed by
//! them iterates in simulation order.

use std::fmt;
use std::str::FromStr;

use jiff::civil::Date;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A calendar month, rendered as `YYYY-MM`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    pub year: i16,
    pub month: i8,
}

impl MonthKey {
    pub const fn new(year: i16, month: i8) -> Self {
        Self { year, month }
    }

    /// Month containing the given date
    pub fn from_date(date: Date) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// First day of the month, if the key names a real calendar month
    pub fn first_day(self) -> Option<Date> {
        Date::new(self.year, self.month, 1).ok()
    }

    /// The following calendar month
    #[must_use]
    pub fn next(self) -> Self {
        if self.month >= 12 {
            Self::new(self.year + 1, 1)
        } else {
            Self::new(self.year, self.month + 1)
        }
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Failure to parse a `YYYY-MM` string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseMonthKeyError(pub String);

impl fmt::Display for ParseMonthKeyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid month key {:?}, expected YYYY-MM", self.0)
    }
}

impl std::error::Error for ParseMonthKeyError {}

impl FromStr for MonthKey {
    type Err = ParseMonthKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseMonthKeyError(s.to_string());
        let (year, month) = s.split_once('-').ok_or_else(err)?;
        if year.len() != 4 || month.len() != 2 {
            return Err(err());
        }
        let year: i16 = year.parse().map_err(|_| err())?;
        let month: i8 = month.parse().map_err(|_| err())?;
        Date::new(year, month, 1).map_err(|_| err())?;
        Ok(Self::new(year, month))
    }
}

impl Serialize for MonthKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MonthKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_pads_year_and_month() {
        assert_eq!(MonthKey::new(2025, 3).to_string(), "2025-03");
        assert_eq!(MonthKey::new(987, 11).to_string(), "0987-11");
    }

    #[test]
    fn test_parse_round_trips_and_rejects_bad_months() {
        assert_eq!("2031-12".parse::<MonthKey>(), Ok(MonthKey::new(2031, 12)));
        assert!("2031-13".parse::<MonthKey>().is_err());
        assert!("2031/01".parse::<MonthKey>().is_err());
        assert!("31-01".parse::<MonthKey>().is_err());
    }

    #[test]
    fn test_ordering_is_chronological() {
        let mut keys = vec![
            MonthKey::new(2026, 1),
            MonthKey::new(2025, 12),
            MonthKey::new(2025, 2),
        ];
        keys.sort();
        assert_eq!(
            keys,
            vec![
                MonthKey::new(2025, 2),
                MonthKey::new(2025, 12),
                MonthKey::new(2026, 1)
            ]
        );
    }

    #[test]
    fn test_next_rolls_over_year() {
        assert_eq!(MonthKey::new(2025, 12).next(), MonthKey::new(2026, 1));
        assert_eq!(MonthKey::new(2025, 6).next(), MonthKey::new(2025, 7));
    }

    #[test]
    fn test_from_date() {
        let key = MonthKey::from_date(jiff::civil::date(2030, 7, 19));
        assert_eq!(key, MonthKey::new(2030, 7));
        assert_eq!(key.first_day(), Some(jiff::civil::date(2030, 7, 1)));
    }
}
