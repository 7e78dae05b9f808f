use std::path::PathBuf;

pub const DEFAULT_DB_PATH: &str = "data/deliveries.db";
pub const DEFAULT_WEATHER_PATH: &str = "data/weather_data.json";
pub const DEFAULT_OUTPUT_PATH: &str = "data/deliveries.csv";
pub const DEFAULT_RECORD_COUNT: usize = 1000;
pub const DEFAULT_WINDOW_DAYS: i64 = 90;
/// Longest generated window accepted
pub const MAX_WINDOW_DAYS: i64 = 3650;

/// Paths and sizes for one pipeline run
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    /// Directory of the embedded delivery store
    pub db_path: PathBuf,
    pub weather_path: PathBuf,
    pub output_path: PathBuf,
    pub record_count: usize,
    /// Length of the generated window, ending now
    pub window_days: i64,
    /// Fixed seed for reproducible runs; entropy when unset
    pub seed: Option<u64>,
    /// Reuse the delivery store and weather file from a previous run
    pub reuse_sources: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            weather_path: PathBuf::from(DEFAULT_WEATHER_PATH),
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            record_count: DEFAULT_RECORD_COUNT,
            window_days: DEFAULT_WINDOW_DAYS,
            seed: None,
            reuse_sources: false,
        }
    }
}
