//! Synthetic source data: delivery rows and the matching weather window

use anyhow::{anyhow, ensure, Result};
use chrono::{Duration, NaiveDateTime, Timelike};
use rand::distributions::WeightedIndex;
use rand::prelude::*;

use crate::config::MAX_WINDOW_DAYS;
use crate::models::{DeliveryRow, DeliveryZone, PackageType, DATETIME_FORMAT};
use crate::weather::WeatherTable;

/// Relative draw weights, in `PackageType::KNOWN` order
const PACKAGE_WEIGHTS: [u32; 5] = [25, 30, 20, 15, 10];

const MAX_RECIPIENT_ID: i64 = 100;

/// Time span covered by one generated dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl Window {
    /// `days` days ending at `end`, truncated to whole seconds
    ///
    /// `days` must lie in `1..=MAX_WINDOW_DAYS`.
    pub fn ending_at(end: NaiveDateTime, days: i64) -> Result<Self> {
        ensure!(
            (1..=MAX_WINDOW_DAYS).contains(&days),
            "Window length must be between 1 and {} days, got {}",
            MAX_WINDOW_DAYS,
            days
        );
        let end = end.with_nanosecond(0).unwrap_or(end);
        let start = end
            .checked_sub_signed(Duration::days(days))
            .ok_or_else(|| anyhow!("Window start before {} is out of range", end))?;
        Ok(Self { start, end })
    }

    pub fn seconds(&self) -> i64 {
        (self.end - self.start).num_seconds()
    }
}

/// Random delivery rows with ids `1..=count` and pickups inside the window
pub fn deliveries(count: usize, window: &Window, rng: &mut impl Rng) -> Result<Vec<DeliveryRow>> {
    let package_dist = WeightedIndex::new(PACKAGE_WEIGHTS)?;
    let span = window.seconds().max(0);

    let rows = (1..=count)
        .map(|i| {
            let pickup = window.start + Duration::seconds(rng.gen_range(0..=span));
            let package_type = PackageType::KNOWN[package_dist.sample(rng)].to_string();
            let zone_index = rng.gen_range(0..DeliveryZone::KNOWN.len());
            let delivery_zone = DeliveryZone::KNOWN[zone_index].to_string();

            DeliveryRow {
                delivery_id: i as i64,
                pickup_datetime: pickup.format(DATETIME_FORMAT).to_string(),
                package_type,
                delivery_zone,
                recipient_id: rng.gen_range(1..=MAX_RECIPIENT_ID),
            }
        })
        .collect();

    Ok(rows)
}

/// Hourly weather for every calendar date the window touches
pub fn weather(window: &Window, rng: &mut impl Rng) -> Result<WeatherTable> {
    WeatherTable::generate(window.start.date(), window.end.date(), rng)
}
