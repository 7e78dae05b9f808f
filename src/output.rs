//! Flat CSV output of classified deliveries

use anyhow::{Context, Result};
use csv::{ReaderBuilder, WriterBuilder};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::models::{Status, DATETIME_FORMAT};
use crate::pipeline::ClassifiedDelivery;

/// One output line; field order is the column order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputRow {
    #[serde(rename = "Delivery_ID")]
    pub delivery_id: u32,
    #[serde(rename = "Pickup_DateTime")]
    pub pickup_datetime: String,
    #[serde(rename = "Weekday")]
    pub weekday: String,
    #[serde(rename = "Hour")]
    pub hour: u32,
    #[serde(rename = "Package_Type")]
    pub package_type: String,
    #[serde(rename = "Distance")]
    pub distance: u32,
    #[serde(rename = "Delivery_Zone")]
    pub delivery_zone: String,
    /// Empty when no weather was recorded for the pickup hour
    #[serde(rename = "Weather_Condition")]
    pub weather_condition: Option<String>,
    #[serde(rename = "Actual_Delivery_Time")]
    pub actual_delivery_time: u32,
    #[serde(rename = "Status")]
    pub status: Status,
}

impl From<&ClassifiedDelivery> for OutputRow {
    fn from(record: &ClassifiedDelivery) -> Self {
        let delivery = record.delivery();
        let time = record.time();
        let telemetry = record.telemetry();

        OutputRow {
            delivery_id: delivery.delivery_id,
            pickup_datetime: delivery.pickup_datetime.format(DATETIME_FORMAT).to_string(),
            weekday: time.weekday_name().to_string(),
            hour: time.hour,
            package_type: delivery.package_type.to_string(),
            distance: telemetry.distance,
            delivery_zone: delivery.delivery_zone.to_string(),
            weather_condition: record.weather().map(|w| w.to_string()),
            actual_delivery_time: telemetry.actual_delivery_time,
            status: record.score.status,
        }
    }
}

pub fn write_csv(path: &Path, records: &[ClassifiedDelivery]) -> Result<usize> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut writer = WriterBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;

    for record in records {
        writer.serialize(OutputRow::from(record))?;
    }
    writer.flush()?;

    Ok(records.len())
}

pub fn read_csv(path: &Path) -> Result<Vec<OutputRow>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;

    let rows = reader
        .deserialize()
        .collect::<Result<Vec<OutputRow>, csv::Error>>()
        .with_context(|| format!("Malformed output row in {}", path.display()))?;
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DeliveryRow, WeatherCondition};
    use crate::pipeline::transform;
    use crate::scoring::DelayModel;
    use crate::telemetry::Telemetry;
    use crate::weather::{WeatherKey, WeatherTable};
    use chrono::NaiveDate;
    use std::collections::HashMap;

    fn classified() -> Vec<ClassifiedDelivery> {
        let rows = vec![
            DeliveryRow {
                delivery_id: 1,
                pickup_datetime: "2024-03-04 08:30:00".into(),
                package_type: "Medium".into(),
                delivery_zone: "Urban".into(),
                recipient_id: 4,
            },
            DeliveryRow {
                delivery_id: 2,
                pickup_datetime: "2024-03-09 05:05:05".into(),
                package_type: "X-Large".into(),
                delivery_zone: "Shopping Center".into(),
                recipient_id: 9,
            },
        ];
        let mut table = WeatherTable::new();
        let monday = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
        table.insert(WeatherKey::new(monday, 8), WeatherCondition::Sunny);

        let mut telemetry: HashMap<u32, Telemetry> = HashMap::new();
        telemetry.insert(
            1,
            Telemetry {
                distance: 50,
                actual_delivery_time: 189,
            },
        );
        telemetry.insert(
            2,
            Telemetry {
                distance: 3,
                actual_delivery_time: 35,
            },
        );

        transform(&rows, &table, &mut telemetry, &DelayModel::STANDARD).unwrap()
    }

    #[test]
    fn test_header_and_column_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("deliveries.csv");
        assert_eq!(write_csv(&path, &classified()).unwrap(), 2);

        let text = fs::read_to_string(&path).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "Delivery_ID,Pickup_DateTime,Weekday,Hour,Package_Type,Distance,\
             Delivery_Zone,Weather_Condition,Actual_Delivery_Time,Status"
        );
        assert_eq!(
            lines.next().unwrap(),
            "1,2024-03-04 08:30:00,Monday,8,Medium,50,Urban,Sunny,189,Delayed"
        );
        // no weather for that hour: empty column
        assert_eq!(
            lines.next().unwrap(),
            "2,2024-03-09 05:05:05,Saturday,5,X-Large,3,Shopping Center,,35,On-time"
        );
    }

    #[test]
    fn test_read_back_output() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deliveries.csv");
        let records = classified();
        write_csv(&path, &records).unwrap();

        let rows = read_csv(&path).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], OutputRow::from(&records[0]));
        assert_eq!(rows[1].weather_condition, None);
        assert_eq!(rows[1].status, Status::OnTime);
    }
}
