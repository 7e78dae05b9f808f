//! Enrichment and classification stages
//!
//! Each stage consumes the previous stage's record type and wraps it with the columns it
//! owns, so a later column can never be read before the stage producing it has run:
//!
//! `DeliveryRow` → [`Delivery`] → [`TimedDelivery`] → [`WeatheredDelivery`] →
//! [`MeasuredDelivery`] → [`ClassifiedDelivery`]
//!
//! Record order is preserved through every stage.

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::models::{Delivery, DeliveryRow, Status, WeatherCondition};
use crate::scoring::{self, DelayModel, Score, ScoringInput};
use crate::telemetry::{Telemetry, TelemetrySource};
use crate::time_features::{self, TimeFeatures};
use crate::weather::{WeatherKey, WeatherTable};

#[derive(Debug, Clone, PartialEq)]
pub struct TimedDelivery {
    pub delivery: Delivery,
    pub time: TimeFeatures,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeatheredDelivery {
    pub timed: TimedDelivery,
    /// `None` when the weather table has no entry for the pickup date and hour
    pub weather: Option<WeatherCondition>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MeasuredDelivery {
    pub weathered: WeatheredDelivery,
    pub telemetry: Telemetry,
}

impl MeasuredDelivery {
    pub fn scoring_input(&self) -> ScoringInput<'_> {
        let timed = &self.weathered.timed;
        ScoringInput {
            distance: self.telemetry.distance,
            package_type: &timed.delivery.package_type,
            delivery_zone: &timed.delivery.delivery_zone,
            weather: self.weathered.weather.as_ref(),
            hour: timed.time.hour,
            weekday: timed.time.weekday,
            actual_delivery_time: self.telemetry.actual_delivery_time,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedDelivery {
    pub measured: MeasuredDelivery,
    pub score: Score,
}

impl ClassifiedDelivery {
    pub fn delivery(&self) -> &Delivery {
        &self.measured.weathered.timed.delivery
    }

    pub fn time(&self) -> &TimeFeatures {
        &self.measured.weathered.timed.time
    }

    pub fn weather(&self) -> Option<&WeatherCondition> {
        self.measured.weathered.weather.as_ref()
    }

    pub fn telemetry(&self) -> &Telemetry {
        &self.measured.telemetry
    }

    pub fn status(&self) -> Status {
        self.score.status
    }
}

/// Parse raw rows; the first malformed row fails the whole batch
pub fn parse_rows(rows: &[DeliveryRow]) -> Result<Vec<Delivery>> {
    rows.iter()
        .map(|row| {
            row.to_delivery()
                .with_context(|| format!("Malformed delivery row {}", row.delivery_id))
        })
        .collect()
}

pub fn enrich_with_time_features(deliveries: Vec<Delivery>) -> Vec<TimedDelivery> {
    info!("Enriching with weekday and hour of the day...");
    deliveries
        .into_iter()
        .map(|delivery| {
            let time = time_features::extract(&delivery.pickup_datetime);
            TimedDelivery { delivery, time }
        })
        .collect()
}

pub fn enrich_with_weather(
    records: Vec<TimedDelivery>,
    table: &WeatherTable,
) -> Vec<WeatheredDelivery> {
    info!("Enriching with weather data...");
    let mut misses = 0usize;

    let enriched: Vec<WeatheredDelivery> = records
        .into_iter()
        .map(|timed| {
            let weather = table.lookup(&timed.delivery.pickup_datetime).cloned();
            if weather.is_none() {
                let key = WeatherKey::for_timestamp(&timed.delivery.pickup_datetime);
                warn!("Missing weather for {} {}", key.date, key.hour);
                misses += 1;
            }
            WeatheredDelivery { timed, weather }
        })
        .collect();

    if misses > 0 {
        warn!(
            "{} of {} deliveries have no weather entry",
            misses,
            enriched.len()
        );
    }
    enriched
}

pub fn enrich_with_telemetry<S: TelemetrySource + ?Sized>(
    records: Vec<WeatheredDelivery>,
    source: &mut S,
) -> Result<Vec<MeasuredDelivery>> {
    info!("Adding distance and delivery time...");
    records
        .into_iter()
        .map(|weathered| {
            let telemetry = source
                .measure(&weathered.timed.delivery)
                .with_context(|| {
                    format!(
                        "Telemetry unavailable for delivery {}",
                        weathered.timed.delivery.delivery_id
                    )
                })?;
            Ok(MeasuredDelivery {
                weathered,
                telemetry,
            })
        })
        .collect()
}

pub fn classify(records: Vec<MeasuredDelivery>, model: &DelayModel) -> Vec<ClassifiedDelivery> {
    info!("Classifying deliveries against the delay threshold...");
    records
        .into_iter()
        .map(|measured| {
            let score = scoring::score(&measured.scoring_input(), model);
            ClassifiedDelivery { measured, score }
        })
        .collect()
}

/// Run every enrichment stage in dependency order
pub fn transform<S: TelemetrySource + ?Sized>(
    rows: &[DeliveryRow],
    weather: &WeatherTable,
    telemetry: &mut S,
    model: &DelayModel,
) -> Result<Vec<ClassifiedDelivery>> {
    info!("Transforming {} deliveries...", rows.len());
    let deliveries = parse_rows(rows)?;
    let timed = enrich_with_time_features(deliveries);
    let weathered = enrich_with_weather(timed, weather);
    let measured = enrich_with_telemetry(weathered, telemetry)?;
    Ok(classify(measured, model))
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusSummary {
    pub total: usize,
    pub on_time: usize,
    pub delayed: usize,
}

impl StatusSummary {
    pub fn from_statuses(statuses: impl IntoIterator<Item = Status>) -> Self {
        let mut summary = Self::default();
        for status in statuses {
            summary.total += 1;
            match status {
                Status::OnTime => summary.on_time += 1,
                Status::Delayed => summary.delayed += 1,
            }
        }
        summary
    }

    pub fn from_records(records: &[ClassifiedDelivery]) -> Self {
        Self::from_statuses(records.iter().map(ClassifiedDelivery::status))
    }

    /// `None` for an empty batch
    pub fn on_time_pct(&self) -> Option<f64> {
        (self.total > 0).then(|| self.on_time as f64 / self.total as f64 * 100.0)
    }

    pub fn delayed_pct(&self) -> Option<f64> {
        (self.total > 0).then(|| self.delayed as f64 / self.total as f64 * 100.0)
    }

    pub fn log(&self) {
        match (self.on_time_pct(), self.delayed_pct()) {
            (Some(on_time_pct), Some(delayed_pct)) => info!(
                "Delivery Status Summary: {} On-time ({:.1}%) | {} Delayed ({:.1}%)",
                self.on_time, on_time_pct, self.delayed, delayed_pct
            ),
            _ => warn!("No data available to compute statistics."),
        }
    }
}
