use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::RecordError;

/// Timestamp layout used by the delivery store and the CSV output
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Raw row as stored in the delivery table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryRow {
    pub delivery_id: i64,
    pub pickup_datetime: String,
    pub package_type: String,
    pub delivery_zone: String,
    pub recipient_id: i64,
}

/// Package size class
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PackageType {
    Small,
    Medium,
    Large,
    XLarge,
    Special,
    /// Anything the multiplier table does not know about
    Other(String),
}

impl PackageType {
    pub const KNOWN: [PackageType; 5] = [
        PackageType::Small,
        PackageType::Medium,
        PackageType::Large,
        PackageType::XLarge,
        PackageType::Special,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            PackageType::Small => "Small",
            PackageType::Medium => "Medium",
            PackageType::Large => "Large",
            PackageType::XLarge => "X-Large",
            PackageType::Special => "Special",
            PackageType::Other(s) => s,
        }
    }
}

impl From<&str> for PackageType {
    fn from(s: &str) -> Self {
        match s {
            "Small" => PackageType::Small,
            "Medium" => PackageType::Medium,
            "Large" => PackageType::Large,
            "X-Large" => PackageType::XLarge,
            "Special" => PackageType::Special,
            other => PackageType::Other(other.to_string()),
        }
    }
}

impl fmt::Display for PackageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Delivery zone category
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DeliveryZone {
    Urban,
    Suburban,
    Rural,
    Industrial,
    ShoppingCenter,
    Other(String),
}

impl DeliveryZone {
    pub const KNOWN: [DeliveryZone; 5] = [
        DeliveryZone::Urban,
        DeliveryZone::Suburban,
        DeliveryZone::Rural,
        DeliveryZone::Industrial,
        DeliveryZone::ShoppingCenter,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            DeliveryZone::Urban => "Urban",
            DeliveryZone::Suburban => "Suburban",
            DeliveryZone::Rural => "Rural",
            DeliveryZone::Industrial => "Industrial",
            DeliveryZone::ShoppingCenter => "Shopping Center",
            DeliveryZone::Other(s) => s,
        }
    }
}

impl From<&str> for DeliveryZone {
    fn from(s: &str) -> Self {
        match s {
            "Urban" => DeliveryZone::Urban,
            "Suburban" => DeliveryZone::Suburban,
            "Rural" => DeliveryZone::Rural,
            "Industrial" => DeliveryZone::Industrial,
            "Shopping Center" => DeliveryZone::ShoppingCenter,
            other => DeliveryZone::Other(other.to_string()),
        }
    }
}

impl fmt::Display for DeliveryZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Hourly weather condition.
///
/// Serialized as its display name so the weather file stays a plain
/// `{"date": {"hour": "Sunny"}}` document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum WeatherCondition {
    Sunny,
    Cloudy,
    Rainy,
    Windy,
    Snowy,
    Foggy,
    Other(String),
}

impl WeatherCondition {
    pub const KNOWN: [WeatherCondition; 6] = [
        WeatherCondition::Sunny,
        WeatherCondition::Cloudy,
        WeatherCondition::Rainy,
        WeatherCondition::Windy,
        WeatherCondition::Snowy,
        WeatherCondition::Foggy,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            WeatherCondition::Sunny => "Sunny",
            WeatherCondition::Cloudy => "Cloudy",
            WeatherCondition::Rainy => "Rainy",
            WeatherCondition::Windy => "Windy",
            WeatherCondition::Snowy => "Snowy",
            WeatherCondition::Foggy => "Foggy",
            WeatherCondition::Other(s) => s,
        }
    }
}

impl From<&str> for WeatherCondition {
    fn from(s: &str) -> Self {
        match s {
            "Sunny" => WeatherCondition::Sunny,
            "Cloudy" => WeatherCondition::Cloudy,
            "Rainy" => WeatherCondition::Rainy,
            "Windy" => WeatherCondition::Windy,
            "Snowy" => WeatherCondition::Snowy,
            "Foggy" => WeatherCondition::Foggy,
            other => WeatherCondition::Other(other.to_string()),
        }
    }
}

impl From<String> for WeatherCondition {
    fn from(s: String) -> Self {
        WeatherCondition::from(s.as_str())
    }
}

impl From<WeatherCondition> for String {
    fn from(c: WeatherCondition) -> Self {
        c.as_str().to_string()
    }
}

impl fmt::Display for WeatherCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Final delivery classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    #[serde(rename = "On-time")]
    OnTime,
    Delayed,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::OnTime => "On-time",
            Status::Delayed => "Delayed",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Delivery with its structural fields parsed
#[derive(Debug, Clone, PartialEq)]
pub struct Delivery {
    pub delivery_id: u32,
    pub pickup_datetime: NaiveDateTime,
    pub package_type: PackageType,
    pub delivery_zone: DeliveryZone,
    pub recipient_id: i64,
}

impl DeliveryRow {
    pub fn to_delivery(&self) -> Result<Delivery, RecordError> {
        let delivery_id = u32::try_from(self.delivery_id)
            .ok()
            .filter(|id| *id > 0)
            .ok_or(RecordError::InvalidId(self.delivery_id))?;

        let pickup = self.required("pickup_datetime", &self.pickup_datetime)?;
        let pickup_datetime = NaiveDateTime::parse_from_str(pickup, DATETIME_FORMAT)
            .map_err(|source| RecordError::InvalidTimestamp {
                delivery_id: self.delivery_id,
                value: pickup.to_string(),
                source,
            })?;

        let package_type = self.required("package_type", &self.package_type)?;
        let delivery_zone = self.required("delivery_zone", &self.delivery_zone)?;

        Ok(Delivery {
            delivery_id,
            pickup_datetime,
            package_type: PackageType::from(package_type),
            delivery_zone: DeliveryZone::from(delivery_zone),
            recipient_id: self.recipient_id,
        })
    }

    fn required<'a>(&self, field: &'static str, value: &'a str) -> Result<&'a str, RecordError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(RecordError::MissingField {
                delivery_id: self.delivery_id,
                field,
            });
        }
        Ok(trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    fn row(id: i64, pickup: &str, package: &str, zone: &str) -> DeliveryRow {
        DeliveryRow {
            delivery_id: id,
            pickup_datetime: pickup.to_string(),
            package_type: package.to_string(),
            delivery_zone: zone.to_string(),
            recipient_id: 7,
        }
    }

    #[test]
    fn test_parse_valid_row() {
        let delivery = row(3, "2024-03-04 08:15:00", "X-Large", "Shopping Center")
            .to_delivery()
            .unwrap();
        assert_eq!(delivery.delivery_id, 3);
        assert_eq!(delivery.pickup_datetime.hour(), 8);
        assert_eq!(delivery.package_type, PackageType::XLarge);
        assert_eq!(delivery.delivery_zone, DeliveryZone::ShoppingCenter);
        assert_eq!(delivery.recipient_id, 7);
    }

    #[test]
    fn test_unknown_categories_are_carried() {
        let delivery = row(1, "2024-03-04 08:15:00", "Pallet", "Harbor")
            .to_delivery()
            .unwrap();
        assert_eq!(delivery.package_type, PackageType::Other("Pallet".into()));
        assert_eq!(delivery.delivery_zone.as_str(), "Harbor");
    }

    #[test]
    fn test_bad_timestamp_is_error() {
        let err = row(9, "04/03/2024 8am", "Small", "Urban")
            .to_delivery()
            .unwrap_err();
        assert!(matches!(err, RecordError::InvalidTimestamp { delivery_id: 9, .. }));
    }

    #[test]
    fn test_missing_fields_are_errors() {
        let err = row(2, "2024-03-04 08:15:00", "  ", "Urban")
            .to_delivery()
            .unwrap_err();
        assert!(matches!(
            err,
            RecordError::MissingField { field: "package_type", .. }
        ));

        let err = row(2, "", "Small", "Urban").to_delivery().unwrap_err();
        assert!(matches!(
            err,
            RecordError::MissingField { field: "pickup_datetime", .. }
        ));
    }

    #[test]
    fn test_non_positive_id_is_error() {
        let err = row(0, "2024-03-04 08:15:00", "Small", "Urban")
            .to_delivery()
            .unwrap_err();
        assert!(matches!(err, RecordError::InvalidId(0)));
    }

    #[test]
    fn test_weather_condition_serde_uses_names() {
        let json = serde_json::to_string(&WeatherCondition::Foggy).unwrap();
        assert_eq!(json, "\"Foggy\"");
        let parsed: WeatherCondition = serde_json::from_str("\"Hail\"").unwrap();
        assert_eq!(parsed, WeatherCondition::Other("Hail".into()));
    }

    #[test]
    fn test_status_names() {
        assert_eq!(Status::OnTime.to_string(), "On-time");
        assert_eq!(Status::Delayed.to_string(), "Delayed");
    }
}
