use anyhow::Result;
use chrono::Local;
use clap::Parser;
use courier_delay::config::{self, PipelineConfig};
use courier_delay::etl;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;

/// Generate delivery and weather sources, classify every delivery as on-time or delayed
#[derive(Parser, Debug)]
#[command(name = "courier_delay")]
#[command(about = "Enrich courier deliveries and label them On-time or Delayed")]
struct Args {
    /// Delivery store directory
    #[arg(long, default_value = config::DEFAULT_DB_PATH)]
    db: PathBuf,

    /// Weather JSON path
    #[arg(long, default_value = config::DEFAULT_WEATHER_PATH)]
    weather: PathBuf,

    /// Output CSV path
    #[arg(long, default_value = config::DEFAULT_OUTPUT_PATH)]
    output: PathBuf,

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

    /// Use the existing delivery store and weather file instead of regenerating them
    #[arg(long)]
    reuse_sources: bool,

    /// Log filter directive
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl From<Args> for PipelineConfig {
    fn from(args: Args) -> Self {
        PipelineConfig {
            db_path: args.db,
            weather_path: args.weather,
            output_path: args.output,
            record_count: args.records,
            window_days: args.days,
            seed: args.seed,
            reuse_sources: args.reuse_sources,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_env_filter(args.log_level.as_str())
        .init();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Error during pipeline execution: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<()> {
    let config = PipelineConfig::from(args);
    etl::run(&config, Local::now().naive_local()).await?;
    Ok(())
}
