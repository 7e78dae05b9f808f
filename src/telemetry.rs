//! Distance and actual-duration figures per delivery
//!
//! The scorer only ever sees a [`Telemetry`] value, so the simulated source below can be
//! replaced by a real feed by implementing [`TelemetrySource`].

use anyhow::Result;
use rand::prelude::*;
use std::collections::HashMap;

use crate::models::Delivery;
use crate::scoring::DelayModel;

pub const MIN_DISTANCE_KM: u32 = 1;
pub const MAX_DISTANCE_KM: u32 = 100;

/// Actual time is the base time scaled by a factor in this range (upper bound excluded)
const MIN_DURATION_FACTOR: f64 = 0.9;
const MAX_DURATION_FACTOR: f64 = 1.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Telemetry {
    /// Kilometres travelled
    pub distance: u32,
    /// Minutes from pickup to drop-off
    pub actual_delivery_time: u32,
}

pub trait TelemetrySource {
    fn measure(&mut self, delivery: &Delivery) -> Result<Telemetry>;
}

/// Base time scaled by `factor`, rounded to the nearest minute with ties to even
pub fn actual_minutes(base_time: f64, factor: f64) -> u32 {
    (base_time * factor).round_ties_even() as u32
}

/// Random stand-in for real telemetry
pub struct SimulatedTelemetry<R: Rng> {
    rng: R,
    model: DelayModel,
}

impl<R: Rng> SimulatedTelemetry<R> {
    pub fn new(rng: R, model: DelayModel) -> Self {
        Self { rng, model }
    }

    fn simulate(&mut self) -> Telemetry {
        let distance = self.rng.gen_range(MIN_DISTANCE_KM..=MAX_DISTANCE_KM);
        let factor = self.rng.gen_range(MIN_DURATION_FACTOR..MAX_DURATION_FACTOR);
        Telemetry {
            distance,
            actual_delivery_time: actual_minutes(self.model.base_time(distance), factor),
        }
    }
}

impl<R: Rng> TelemetrySource for SimulatedTelemetry<R> {
    fn measure(&mut self, _delivery: &Delivery) -> Result<Telemetry> {
        Ok(self.simulate())
    }
}

/// Pre-recorded telemetry keyed by delivery id
impl TelemetrySource for HashMap<u32, Telemetry> {
    fn measure(&mut self, delivery: &Delivery) -> Result<Telemetry> {
        self.get(&delivery.delivery_id)
            .copied()
            .ok_or_else(|| anyhow::anyhow!("No telemetry for delivery {}", delivery.delivery_id))
    }
}
