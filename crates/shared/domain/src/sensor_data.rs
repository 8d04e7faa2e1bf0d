//! Sensor readings: the stored entity, the broker wire payload and the
//! shapes returned by the API.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{de::Error as _, Deserialize, Deserializer, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Stored sensor reading
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorData {
    pub id: Uuid,
    pub device_id: Uuid,
    pub sensor_id: Option<String>,
    pub sensor_name: Option<String>,
    pub location: Option<String>,
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
    pub timestamp: DateTime<Utc>,
    pub metadata: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SensorData {
    /// Create a reading for a device with fresh id and timestamps
    pub fn new(device_id: Uuid, timestamp: DateTime<Utc>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            device_id,
            sensor_id: None,
            sensor_name: None,
            location: None,
            temperature: None,
            humidity: None,
            timestamp,
            metadata: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Parse a timestamp leniently.
///
/// Accepts RFC 3339, a naive `YYYY-MM-DDTHH:MM:SS[.fff]` (space separator
/// allowed) or a bare date; naive values are taken as UTC.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Optional request timestamp in any form `parse_timestamp` accepts.
/// A present but unparseable value is a deserialization error.
pub fn deserialize_optional_timestamp<'de, D>(
    deserializer: D,
) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(raw) => parse_timestamp(&raw)
            .map(Some)
            .ok_or_else(|| D::Error::custom(format!("invalid timestamp '{}'", raw))),
    }
}

/// Reading as published on the broker by the simulator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SensorReading {
    pub sensor_id: String,
    pub sensor_name: String,
    pub location: String,
    pub temperature: f64,
    pub humidity: f64,
    pub timestamp: DateTime<Utc>,
}

/// Sensor data creation payload
#[derive(Debug, Clone, Deserialize, Validate)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct CreateSensorData {
    pub device_id: Uuid,
    #[validate(length(max = 50, message = "Sensor id must be at most 50 characters"))]
    pub sensor_id: Option<String>,
    #[validate(length(max = 200, message = "Sensor name must be at most 200 characters"))]
    pub sensor_name: Option<String>,
    #[validate(length(max = 100, message = "Location must be at most 100 characters"))]
    pub location: Option<String>,
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
    /// Defaults to the time of the request
    #[serde(default, deserialize_with = "deserialize_optional_timestamp")]
    pub timestamp: Option<DateTime<Utc>>,
    pub metadata: Option<String>,
}

/// Sensor data update payload (full replacement)
#[derive(Debug, Clone, Deserialize, Validate)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct UpdateSensorData {
    pub device_id: Uuid,
    #[validate(length(max = 50, message = "Sensor id must be at most 50 characters"))]
    pub sensor_id: Option<String>,
    #[validate(length(max = 200, message = "Sensor name must be at most 200 characters"))]
    pub sensor_name: Option<String>,
    #[validate(length(max = 100, message = "Location must be at most 100 characters"))]
    pub location: Option<String>,
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
    /// Keeps the stored timestamp when omitted
    #[serde(default, deserialize_with = "deserialize_optional_timestamp")]
    pub timestamp: Option<DateTime<Utc>>,
    pub metadata: Option<String>,
}

/// Broker-shaped reading posted over HTTP
#[derive(Debug, Clone, Deserialize, Validate)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct MqttSensorDataRequest {
    #[validate(length(max = 50, message = "Sensor id must be at most 50 characters"))]
    #[cfg_attr(feature = "openapi", schema(example = "sensor_001"))]
    pub sensor_id: String,
    #[validate(length(max = 200, message = "Sensor name must be at most 200 characters"))]
    pub sensor_name: Option<String>,
    #[validate(length(max = 100, message = "Location must be at most 100 characters"))]
    pub location: Option<String>,
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_optional_timestamp")]
    pub timestamp: Option<DateTime<Utc>>,
}

/// Sensor data response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct SensorDataResponse {
    pub id: Uuid,
    pub device_id: Uuid,
    pub sensor_id: Option<String>,
    pub sensor_name: Option<String>,
    pub location: Option<String>,
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
    pub timestamp: DateTime<Utc>,
    pub metadata: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<SensorData> for SensorDataResponse {
    fn from(data: SensorData) -> Self {
        Self {
            id: data.id,
            device_id: data.device_id,
            sensor_id: data.sensor_id,
            sensor_name: data.sensor_name,
            location: data.location,
            temperature: data.temperature,
            humidity: data.humidity,
            timestamp: data.timestamp,
            metadata: data.metadata,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }
}

/// Summary statistics of a device's readings over a time window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct SensorDataAggregate {
    pub device_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub count: usize,
    pub average_temperature: Option<f64>,
    pub min_temperature: Option<f64>,
    pub max_temperature: Option<f64>,
    pub average_humidity: Option<f64>,
    pub min_humidity: Option<f64>,
    pub max_humidity: Option<f64>,
}

/// Average, minimum and maximum of the present values
fn summarize(values: impl Iterator<Item = f64>) -> (Option<f64>, Option<f64>, Option<f64>) {
    let values: Vec<f64> = values.collect();
    if values.is_empty() {
        return (None, None, None);
    }

    let sum: f64 = values.iter().sum();
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    (Some(sum / values.len() as f64), Some(min), Some(max))
}

impl SensorDataAggregate {
    /// Aggregate readings; statistics skip readings lacking the value.
    pub fn from_readings(
        device_id: Uuid,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
        readings: &[SensorData],
    ) -> Self {
        let (average_temperature, min_temperature, max_temperature) =
            summarize(readings.iter().filter_map(|r| r.temperature));
        let (average_humidity, min_humidity, max_humidity) =
            summarize(readings.iter().filter_map(|r| r.humidity));

        Self {
            device_id,
            start_time,
            end_time,
            count: readings.len(),
            average_temperature,
            min_temperature,
            max_temperature,
            average_humidity,
            min_humidity,
            max_humidity,
        }
    }
}
