//! On-time breakdowns over a produced output file

use std::collections::HashMap;

use crate::models::Status;
use crate::output::OutputRow;
use crate::pipeline::StatusSummary;

pub const WEEKDAY_ORDER: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Label used for rows without a recorded weather condition
pub const UNKNOWN_WEATHER: &str = "Unknown";

#[derive(Debug, Clone, PartialEq)]
pub struct GroupStats {
    pub label: String,
    pub summary: StatusSummary,
    pub avg_delivery_time: f64,
}

impl GroupStats {
    pub fn on_time_pct(&self) -> f64 {
        self.summary.on_time_pct().unwrap_or(0.0)
    }

    pub fn delayed_pct(&self) -> f64 {
        self.summary.delayed_pct().unwrap_or(0.0)
    }
}

/// Group rows by `key`, sorted by descending volume then label
pub fn breakdown<F>(rows: &[OutputRow], key: F) -> Vec<GroupStats>
where
    F: Fn(&OutputRow) -> String,
{
    let mut groups: HashMap<String, (Vec<Status>, u64)> = HashMap::new();
    for row in rows {
        let entry = groups.entry(key(row)).or_default();
        entry.0.push(row.status);
        entry.1 += u64::from(row.actual_delivery_time);
    }

    let mut stats: Vec<GroupStats> = groups
        .into_iter()
        .map(|(label, (statuses, minutes))| {
            let summary = StatusSummary::from_statuses(statuses);
            GroupStats {
                label,
                avg_delivery_time: minutes as f64 / summary.total as f64,
                summary,
            }
        })
        .collect();

    stats.sort_by(|a, b| {
        b.summary
            .total
            .cmp(&a.summary.total)
            .then_with(|| a.label.cmp(&b.label))
    });
    stats
}

/// Per-weekday stats in calendar order, Monday first
pub fn by_weekday(rows: &[OutputRow]) -> Vec<GroupStats> {
    let mut stats = breakdown(rows, |r| r.weekday.clone());
    stats.sort_by_key(|s| {
        WEEKDAY_ORDER
            .iter()
            .position(|d| *d == s.label)
            .unwrap_or(WEEKDAY_ORDER.len())
    });
    stats
}

pub fn by_zone(rows: &[OutputRow]) -> Vec<GroupStats> {
    breakdown(rows, |r| r.delivery_zone.clone())
}

pub fn by_package(rows: &[OutputRow]) -> Vec<GroupStats> {
    breakdown(rows, |r| r.package_type.clone())
}

pub fn by_weather(rows: &[OutputRow]) -> Vec<GroupStats> {
    breakdown(rows, |r| {
        r.weather_condition
            .clone()
            .unwrap_or_else(|| UNKNOWN_WEATHER.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(
        weekday: &str,
        zone: &str,
        weather: Option<&str>,
        minutes: u32,
        status: Status,
    ) -> OutputRow {
        OutputRow {
            delivery_id: 1,
            pickup_datetime: "2024-03-04 08:30:00".into(),
            weekday: weekday.into(),
            hour: 8,
            package_type: "Small".into(),
            distance: 10,
            delivery_zone: zone.into(),
            weather_condition: weather.map(String::from),
            actual_delivery_time: minutes,
            status,
        }
    }

    fn sample() -> Vec<OutputRow> {
        vec![
            row("Friday", "Urban", Some("Rainy"), 60, Status::Delayed),
            row("Monday", "Urban", Some("Sunny"), 40, Status::OnTime),
            row("Monday", "Rural", None, 50, Status::OnTime),
            row("Sunday", "Urban", Some("Sunny"), 30, Status::Delayed),
        ]
    }

    #[test]
    fn test_breakdown_by_zone() {
        let stats = by_zone(&sample());
        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].label, "Urban");
        assert_eq!(stats[0].summary.total, 3);
        assert_eq!(stats[0].summary.on_time, 1);
        assert!((stats[0].avg_delivery_time - 130.0 / 3.0).abs() < 1e-9);
        assert_eq!(stats[1].label, "Rural");
        assert_eq!(stats[1].on_time_pct(), 100.0);
    }

    #[test]
    fn test_weekdays_in_calendar_order() {
        let labels: Vec<String> = by_weekday(&sample()).into_iter().map(|s| s.label).collect();
        assert_eq!(labels, vec!["Monday", "Friday", "Sunday"]);
    }

    #[test]
    fn test_missing_weather_grouped_as_unknown() {
        let stats = by_weather(&sample());
        let unknown = stats.iter().find(|s| s.label == UNKNOWN_WEATHER).unwrap();
        assert_eq!(unknown.summary.total, 1);
        assert_eq!(stats[0].label, "Sunny");
        assert_eq!(stats[0].delayed_pct(), 50.0);
    }

    #[test]
    fn test_empty_input() {
        assert!(by_package(&[]).is_empty());
    }
}
