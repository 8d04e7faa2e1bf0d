//! Reading payload as it arrives on the broker.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};

/// Inbound reading. Field names are matched in camelCase or PascalCase and
/// `name` is accepted for the sensor name.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SensorPayload {
    #[serde(
        default,
        rename = "sensorName",
        alias = "SensorName",
        alias = "name",
        alias = "Name"
    )]
    pub sensor_name: Option<String>,
    #[serde(default, alias = "Location")]
    pub location: Option<String>,
    #[serde(default, alias = "Temperature")]
    pub temperature: Option<f64>,
    #[serde(default, alias = "Humidity")]
    pub humidity: Option<f64>,
    #[serde(default, alias = "Latitude")]
    pub latitude: Option<f64>,
    #[serde(default, alias = "Longitude")]
    pub longitude: Option<f64>,
    #[serde(default, alias = "Timestamp", deserialize_with = "lenient_timestamp")]
    pub timestamp: Option<DateTime<Utc>>,
}

fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(domain::parse_timestamp))
}

impl SensorPayload {
    pub fn from_slice(bytes: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(bytes)
    }

    /// Explicit location, else the coordinates, else nothing.
    pub fn resolved_location(&self) -> Option<String> {
        if let Some(location) = self.location.as_deref() {
            if !domain::is_blank(location) {
                return Some(location.trim().to_string());
            }
        }

        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Some(format!("{:.6},{:.6}", lat, lon)),
            _ => None,
        }
    }

    /// Sensor name when one was sent
    pub fn name(&self) -> Option<&str> {
        self.sensor_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }
}
