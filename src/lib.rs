pub mod config;
pub mod db;
pub mod error;
pub mod etl;
pub mod generate;
pub mod models;
pub mod output;
pub mod pipeline;
pub mod report;
pub mod scoring;
pub mod telemetry;
pub mod time_features;
pub mod weather;
