//! Source data generator
//!
//! Writes a fresh delivery store and the hourly weather file for the window ending now,
//! without running the classification pipeline.
//!
//! Usage:
//!   cargo run --release --bin generate_sources -- [OPTIONS]

use anyhow::Result;
use chrono::Local;
use clap::Parser;
use courier_delay::config::{self, PipelineConfig};
use courier_delay::{db, etl};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "generate_sources")]
#[command(about = "Generate the synthetic delivery store and weather file")]
struct Args {
    /// Delivery store directory (replaced if present)
    #[arg(long, default_value = config::DEFAULT_DB_PATH)]
    db: PathBuf,

    /// Weather JSON path
    #[arg(long, default_value = config::DEFAULT_WEATHER_PATH)]
    weather: PathBuf,

    /// Number of deliveries to generate
    #[arg(long, default_value_t = config::DEFAULT_RECORD_COUNT)]
    records: usize,

    /// Days of history ending now
    #[arg(
        long,
        default_value_t = config::DEFAULT_WINDOW_DAYS,
        value_parser = clap::value_parser!(i64).range(1..=config::MAX_WINDOW_DAYS)
    )]
    days: i64,

    /// Random seed for reproducibility
    #[arg(long)]
    seed: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let args = Args::parse();
    let config = PipelineConfig {
        db_path: args.db,
        weather_path: args.weather,
        record_count: args.records,
        window_days: args.days,
        seed: args.seed,
        ..PipelineConfig::default()
    };

    db::reset(&config.db_path)?;
    let conn = db::connect(&config.db_path).await?;
    let mut rng = etl::rng_for(config.seed);
    let now = Local::now().naive_local();
    let weather = etl::generate_sources(&conn, &config, now, &mut rng).await?;

    info!("Deliveries in store: {}", db::count_deliveries(&conn).await?);
    info!(
        "Weather entries: {} over {} days, written to {}",
        weather.len(),
        weather.day_count(),
        config.weather_path.display()
    );

    Ok(())
}
