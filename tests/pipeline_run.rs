//! End-to-end runs of the delivery pipeline

use chrono::NaiveDateTime;
use courier_delay::config::PipelineConfig;
use courier_delay::models::{Status, DATETIME_FORMAT};
use courier_delay::{db, etl, output};

fn now() -> NaiveDateTime {
    NaiveDateTime::parse_from_str("2024-06-30 14:25:09", DATETIME_FORMAT).unwrap()
}

fn config_in(dir: &std::path::Path) -> PipelineConfig {
    PipelineConfig {
        db_path: dir.join("deliveries.db"),
        weather_path: dir.join("weather_data.json"),
        output_path: dir.join("out").join("deliveries.csv"),
        seed: Some(42),
        ..PipelineConfig::default()
    }
}

#[tokio::test]
async fn test_generated_run_labels_every_delivery() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());

    let conn = db::connect_memory().await.unwrap();
    let mut rng = etl::rng_for(config.seed);
    let weather = etl::generate_sources(&conn, &config, now(), &mut rng)
        .await
        .unwrap();
    assert_eq!(db::count_deliveries(&conn).await.unwrap(), 1000);
    assert_eq!(weather.day_count(), 91);

    let summary = etl::run_with(&conn, &weather, &config, rng).await.unwrap();
    assert_eq!(summary.total, 1000);
    assert_eq!(summary.on_time + summary.delayed, 1000);

    let rows = output::read_csv(&config.output_path).unwrap();
    assert_eq!(rows.len(), 1000);
    for (i, row) in rows.iter().enumerate() {
        assert_eq!(row.delivery_id as usize, i + 1);
        assert!(matches!(row.status, Status::OnTime | Status::Delayed));
        assert!(row.hour < 24);
        assert!((1..=100).contains(&row.distance));
        // every pickup falls inside the generated weather window
        assert!(row.weather_condition.is_some());
    }
}

#[tokio::test]
async fn test_reloaded_weather_matches_generated() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());

    let conn = db::connect_memory().await.unwrap();
    let mut rng = etl::rng_for(config.seed);
    let generated = etl::generate_sources(&conn, &config, now(), &mut rng)
        .await
        .unwrap();
    let loaded = etl::load_weather(&config).unwrap();

    assert_eq!(loaded.len(), generated.len());
    assert_eq!(loaded.get("2024-04-01", "0"), generated.get("2024-04-01", "0"));
    assert_eq!(loaded.get("2024-06-30", "23"), generated.get("2024-06-30", "23"));
}

#[tokio::test]
async fn test_full_run_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let config = PipelineConfig {
        record_count: 50,
        ..config_in(dir.path())
    };

    let summary = etl::run(&config, now()).await.unwrap();
    assert_eq!(summary.total, 50);
    assert!(config.db_path.exists());
    assert!(config.weather_path.exists());
    assert_eq!(output::read_csv(&config.output_path).unwrap().len(), 50);
}

#[tokio::test]
async fn test_non_positive_window_fails_generation() {
    let dir = tempfile::tempdir().unwrap();
    let conn = db::connect_memory().await.unwrap();

    for days in [0, -5] {
        let config = PipelineConfig {
            window_days: days,
            ..config_in(dir.path())
        };
        let mut rng = etl::rng_for(config.seed);
        let result = etl::generate_sources(&conn, &config, now(), &mut rng).await;
        assert!(result.is_err(), "window of {} days accepted", days);
    }
    assert!(!dir.path().join("weather_data.json").exists());
}

#[test]
fn test_empty_weather_file_loads_as_empty_table() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());
    std::fs::write(&config.weather_path, "{}").unwrap();

    let weather = etl::load_weather(&config).unwrap();
    assert!(weather.is_empty());
    assert_eq!(weather.day_count(), 0);
}
