//! End-to-end run: generate sources, extract, transform, load, summarize

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{info, warn};

use crate::config::PipelineConfig;
use crate::db::{self, DbConn};
use crate::generate::{self, Window};
use crate::models::DeliveryRow;
use crate::output;
use crate::pipeline::{self, StatusSummary};
use crate::scoring::DelayModel;
use crate::telemetry::SimulatedTelemetry;
use crate::weather::WeatherTable;

pub fn rng_for(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    }
}

/// Fill the delivery store and build the weather table for the window ending at `now`
pub async fn generate_sources(
    db: &DbConn,
    config: &PipelineConfig,
    now: NaiveDateTime,
    rng: &mut StdRng,
) -> Result<WeatherTable> {
    let window = Window::ending_at(now, config.window_days)?;

    info!("Creating delivery store...");
    db::init_schema(db).await?;
    let rows = generate::deliveries(config.record_count, &window, rng)?;
    let inserted = db::insert_deliveries(db, &rows).await?;
    info!("Delivery store created with {} deliveries", inserted);

    info!("Generating weather data...");
    let weather = generate::weather(&window, rng)?;
    weather.save_json(&config.weather_path)?;
    info!(
        "Weather data generated for period {} - {}",
        window.start.format("%Y-%m-%d"),
        window.end.format("%Y-%m-%d")
    );

    Ok(weather)
}

pub async fn extract(db: &DbConn) -> Result<Vec<DeliveryRow>> {
    info!("Extracting data from delivery store...");
    let rows = db::fetch_deliveries(db).await?;
    info!("Extraction complete: {} records", rows.len());
    Ok(rows)
}

pub fn load_weather(config: &PipelineConfig) -> Result<WeatherTable> {
    info!("Loading weather data...");
    let weather = WeatherTable::load_json(&config.weather_path)?;
    if weather.is_empty() {
        warn!(
            "Weather file {} has no entries; every delivery will miss",
            config.weather_path.display()
        );
    }
    info!("Weather data loaded for {} days", weather.day_count());
    Ok(weather)
}

/// Extract → transform → save → summary against an already open store
pub async fn run_with(
    db: &DbConn,
    weather: &WeatherTable,
    config: &PipelineConfig,
    rng: StdRng,
) -> Result<StatusSummary> {
    let rows = extract(db).await?;

    let model = DelayModel::STANDARD;
    let mut telemetry = SimulatedTelemetry::new(rng, model.clone());
    let classified = pipeline::transform(&rows, weather, &mut telemetry, &model)
        .context("Transformation failed")?;

    info!("Saving results...");
    let written = output::write_csv(&config.output_path, &classified)
        .context("Failed to save results")?;
    info!("{} results saved to {}", written, config.output_path.display());

    let summary = StatusSummary::from_records(&classified);
    summary.log();
    Ok(summary)
}

/// Full pipeline run against the on-disk store
pub async fn run(config: &PipelineConfig, now: NaiveDateTime) -> Result<StatusSummary> {
    info!("Starting courier delay pipeline");
    let mut rng = rng_for(config.seed);

    let (db, weather) = if config.reuse_sources {
        let db = db::connect(&config.db_path).await?;
        (db, load_weather(config)?)
    } else {
        db::reset(&config.db_path)?;
        let db = db::connect(&config.db_path).await?;
        let weather = generate_sources(&db, config, now, &mut rng).await?;
        (db, weather)
    };

    let summary = run_with(&db, &weather, config, rng).await?;
    info!("Pipeline completed successfully");
    Ok(summary)
}
