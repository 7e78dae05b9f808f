//! Heuristic expected-duration model and on-time classification
//!
//! The expected time is the base time for the distance scaled by five independent
//! multipliers. A delivery is on time when its actual duration stays strictly below the
//! expected time plus a 20% margin; landing exactly on the threshold counts as delayed.
//!
//! Unknown weather scores as neutral weather (1.0). This treats "no data" the same as
//! clear skies, which is a modeling simplification rather than an observed fact.

use chrono::Weekday;

use crate::models::{DeliveryZone, PackageType, Status, WeatherCondition};

/// Hour window with inclusive bounds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeakWindow {
    pub start: u32,
    pub end: u32,
    pub multiplier: f64,
}

impl PeakWindow {
    pub fn contains(&self, hour: u32) -> bool {
        (self.start..=self.end).contains(&hour)
    }
}

/// Numeric parameters of the delay model
#[derive(Debug, Clone, PartialEq)]
pub struct DelayModel {
    /// Fixed handling time in minutes
    pub base_minutes: f64,
    pub minutes_per_km: f64,
    /// Tolerance applied on top of the expected time
    pub delay_margin: f64,
    pub morning_peak: PeakWindow,
    pub evening_peak: PeakWindow,
}

impl DelayModel {
    pub const STANDARD: DelayModel = DelayModel {
        base_minutes: 30.0,
        minutes_per_km: 0.8,
        delay_margin: 1.2,
        morning_peak: PeakWindow {
            start: 7,
            end: 9,
            multiplier: 1.3,
        },
        evening_peak: PeakWindow {
            start: 17,
            end: 19,
            multiplier: 1.4,
        },
    };

    pub fn base_time(&self, distance: u32) -> f64 {
        self.base_minutes + self.minutes_per_km * f64::from(distance)
    }

    pub fn peak_multiplier(&self, hour: u32) -> f64 {
        if self.morning_peak.contains(hour) {
            self.morning_peak.multiplier
        } else if self.evening_peak.contains(hour) {
            self.evening_peak.multiplier
        } else {
            1.0
        }
    }
}

impl Default for DelayModel {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// Multiplier for a package class; unrecognized classes are neutral
pub fn package_multiplier(package_type: &PackageType) -> f64 {
    match package_type {
        PackageType::Small => 1.0,
        PackageType::Medium => 1.2,
        PackageType::Large => 1.5,
        PackageType::XLarge => 2.0,
        PackageType::Special => 2.5,
        PackageType::Other(_) => 1.0,
    }
}

/// Multiplier for a delivery zone; unrecognized zones are neutral
pub fn zone_multiplier(zone: &DeliveryZone) -> f64 {
    match zone {
        DeliveryZone::Urban => 1.2,
        DeliveryZone::Suburban => 1.0,
        DeliveryZone::Rural => 1.3,
        DeliveryZone::Industrial => 0.9,
        DeliveryZone::ShoppingCenter => 1.4,
        DeliveryZone::Other(_) => 1.0,
    }
}

/// Multiplier for the weather at pickup; missing or unrecognized weather is neutral
pub fn weather_multiplier(weather: Option<&WeatherCondition>) -> f64 {
    match weather {
        Some(WeatherCondition::Sunny) => 1.0,
        Some(WeatherCondition::Cloudy) => 1.05,
        Some(WeatherCondition::Rainy) => 1.2,
        Some(WeatherCondition::Snowy) => 1.8,
        Some(WeatherCondition::Windy) => 1.1,
        Some(WeatherCondition::Foggy) => 1.3,
        Some(WeatherCondition::Other(_)) | None => 1.0,
    }
}

pub fn weekday_multiplier(weekday: Weekday) -> f64 {
    match weekday {
        Weekday::Mon | Weekday::Fri => 1.2,
        Weekday::Sat | Weekday::Sun => 0.9,
        Weekday::Tue | Weekday::Wed | Weekday::Thu => 1.0,
    }
}

/// Everything the scorer reads from a fully enriched delivery
#[derive(Debug, Clone, Copy)]
pub struct ScoringInput<'a> {
    pub distance: u32,
    pub package_type: &'a PackageType,
    pub delivery_zone: &'a DeliveryZone,
    pub weather: Option<&'a WeatherCondition>,
    pub hour: u32,
    pub weekday: Weekday,
    pub actual_delivery_time: u32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Score {
    pub expected_time: f64,
    pub delay_threshold: f64,
    pub status: Status,
}

/// Expected minutes for the delivery, before the delay margin
pub fn expected_time(input: &ScoringInput<'_>, model: &DelayModel) -> f64 {
    model.base_time(input.distance)
        * package_multiplier(input.package_type)
        * zone_multiplier(input.delivery_zone)
        * weather_multiplier(input.weather)
        * model.peak_multiplier(input.hour)
        * weekday_multiplier(input.weekday)
}

/// Strict comparison: an actual time equal to the threshold is delayed
pub fn classify(delay_threshold: f64, actual_delivery_time: u32) -> Status {
    if delay_threshold > f64::from(actual_delivery_time) {
        Status::OnTime
    } else {
        Status::Delayed
    }
}

pub fn score(input: &ScoringInput<'_>, model: &DelayModel) -> Score {
    let expected_time = expected_time(input, model);
    let delay_threshold = expected_time * model.delay_margin;
    Score {
        expected_time,
        delay_threshold,
        status: classify(delay_threshold, input.actual_delivery_time),
    }
}
