//! Calendar dates as written in a timesheet.

use std::fmt;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Serialize, Serializer};

/// A `YYYY-MM-DD` date exactly as scanned.
///
/// No calendar validation happens here; `2023-02-31` is a legal value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct DateValue {
    pub year: i32,
    pub month: i32,
    pub day: i32,
}

impl DateValue {
    pub const fn new(year: i32, month: i32, day: i32) -> Self {
        Self { year, month, day }
    }

    /// The calendar date, if the fields name one.
    pub fn to_naive_date(&self) -> Option<NaiveDate> {
        let month = u32::try_from(self.month).ok()?;
        let day = u32::try_from(self.day).ok()?;
        NaiveDate::from_ymd_opt(self.year, month, day)
    }

    /// Monday to Friday on the calendar. `None` for impossible dates.
    pub fn is_calendar_weekday(&self) -> Option<bool> {
        self.to_naive_date()
            .map(|d| !matches!(d.weekday(), Weekday::Sat | Weekday::Sun))
    }
}

impl fmt::Display for DateValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

impl Serialize for DateValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_is_by_value() {
        assert_eq!(DateValue::new(2023, 1, 2), DateValue::new(2023, 1, 2));
        assert_ne!(DateValue::new(2023, 1, 2), DateValue::new(2023, 1, 3));
    }

    #[test]
    fn display_is_iso_like() {
        assert_eq!(DateValue::new(2023, 1, 2).to_string(), "2023-01-02");
    }

    #[test]
    fn calendar_weekday() {
        // 2023-01-02 is a Monday, 2023-01-07 a Saturday
        assert_eq!(DateValue::new(2023, 1, 2).is_calendar_weekday(), Some(true));
        assert_eq!(DateValue::new(2023, 1, 7).is_calendar_weekday(), Some(false));
        assert_eq!(DateValue::new(2023, 2, 31).is_calendar_weekday(), None);
    }
}
