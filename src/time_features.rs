//! Weekday and hour-of-day features derived from a pickup timestamp

use chrono::{Datelike, NaiveDateTime, Timelike, Weekday};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeFeatures {
    pub weekday: Weekday,
    /// Always in 0..=23
    pub hour: u32,
}

impl TimeFeatures {
    pub fn weekday_name(&self) -> &'static str {
        weekday_name(self.weekday)
    }
}

pub fn extract(timestamp: &NaiveDateTime) -> TimeFeatures {
    TimeFeatures {
        weekday: timestamp.weekday(),
        hour: timestamp.hour(),
    }
}

/// Full English day name
pub fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DATETIME_FORMAT;

    fn ts(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, DATETIME_FORMAT).unwrap()
    }

    #[test]
    fn test_extract_monday_morning() {
        let features = extract(&ts("2024-03-04 08:59:59"));
        assert_eq!(features.weekday, Weekday::Mon);
        assert_eq!(features.weekday_name(), "Monday");
        assert_eq!(features.hour, 8);
    }

    #[test]
    fn test_extract_midnight_and_late_evening() {
        assert_eq!(extract(&ts("2024-03-10 00:00:00")).hour, 0);
        let late = extract(&ts("2024-03-10 23:30:00"));
        assert_eq!(late.hour, 23);
        assert_eq!(late.weekday_name(), "Sunday");
    }
}
