//! Hourly weather table keyed by calendar date and hour
//!
//! The table is stored flat on a composite `(date, hour)` key, so a missing date and a
//! missing hour are the same single lookup miss. Both halves of the key are strings in
//! the exact form the weather file uses: `YYYY-MM-DD` and the hour without zero padding.

use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate, NaiveDateTime, Timelike};
use rand::distributions::WeightedIndex;
use rand::prelude::*;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

use crate::models::WeatherCondition;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Probability that an hour repeats the previous hour's condition
const PERSISTENCE: f64 = 0.7;

/// Relative draw weights, in `WeatherCondition::KNOWN` order
const CONDITION_WEIGHTS: [u32; 6] = [30, 25, 20, 15, 5, 5];

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WeatherKey {
    pub date: String,
    pub hour: String,
}

impl WeatherKey {
    pub fn new(date: NaiveDate, hour: u32) -> Self {
        Self {
            date: date.format(DATE_FORMAT).to_string(),
            hour: hour.to_string(),
        }
    }

    pub fn for_timestamp(timestamp: &NaiveDateTime) -> Self {
        Self::new(timestamp.date(), timestamp.hour())
    }
}

/// Nested on-disk layout: date -> hour -> condition
type WeatherFile = BTreeMap<String, BTreeMap<String, WeatherCondition>>;

#[derive(Debug, Clone, Default)]
pub struct WeatherTable {
    entries: HashMap<WeatherKey, WeatherCondition>,
}

impl WeatherTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: WeatherKey, condition: WeatherCondition) {
        self.entries.insert(key, condition);
    }

    /// Condition recorded for the timestamp's date and hour, `None` when not covered
    pub fn lookup(&self, timestamp: &NaiveDateTime) -> Option<&WeatherCondition> {
        self.entries.get(&WeatherKey::for_timestamp(timestamp))
    }

    /// Lookup on already formatted key strings
    pub fn get(&self, date: &str, hour: &str) -> Option<&WeatherCondition> {
        self.entries.get(&WeatherKey {
            date: date.to_string(),
            hour: hour.to_string(),
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of distinct dates covered
    pub fn day_count(&self) -> usize {
        let mut dates: Vec<&str> = self.entries.keys().map(|k| k.date.as_str()).collect();
        dates.sort_unstable();
        dates.dedup();
        dates.len()
    }

    /// Random hourly weather for every date in `start..=end`.
    ///
    /// Hour 0 always draws fresh; later hours keep the previous condition 70% of the time.
    pub fn generate(start: NaiveDate, end: NaiveDate, rng: &mut impl Rng) -> Result<Self> {
        let dist = WeightedIndex::new(CONDITION_WEIGHTS)?;
        let mut table = Self::new();

        let mut date = start;
        while date <= end {
            let mut previous: Option<WeatherCondition> = None;
            for hour in 0..24 {
                let condition = match previous.take() {
                    Some(prev) if rng.gen_bool(PERSISTENCE) => prev,
                    _ => WeatherCondition::KNOWN[dist.sample(rng)].clone(),
                };
                table.insert(WeatherKey::new(date, hour), condition.clone());
                previous = Some(condition);
            }
            date += Duration::days(1);
        }

        Ok(table)
    }

    fn to_file(&self) -> WeatherFile {
        let mut file = WeatherFile::new();
        for (key, condition) in &self.entries {
            file.entry(key.date.clone())
                .or_default()
                .insert(key.hour.clone(), condition.clone());
        }
        file
    }

    fn from_file(file: WeatherFile) -> Self {
        let mut table = Self::new();
        for (date, hours) in file {
            for (hour, condition) in hours {
                table.insert(
                    WeatherKey {
                        date: date.clone(),
                        hour,
                    },
                    condition,
                );
            }
        }
        table
    }

    pub fn save_json(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&self.to_file())?;
        fs::write(path, json)
            .with_context(|| format!("Failed to write weather data to {}", path.display()))?;
        Ok(())
    }

    pub fn load_json(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read weather data from {}", path.display()))?;
        let file: WeatherFile = serde_json::from_str(&raw)
            .with_context(|| format!("Invalid weather JSON in {}", path.display()))?;
        Ok(Self::from_file(file))
    }
}
