//! Fake sensor fleet producing random environmental readings.

use chrono::Utc;
use rand::{seq::SliceRandom, Rng};
use serde::{Deserialize, Serialize};

use domain::{is_blank, SensorReading};

use crate::error::{PublisherError, PublisherResult};

const TEMPERATURE_RANGE: (f64, f64) = (10.0, 40.0);
const HUMIDITY_RANGE: (f64, f64) = (20.0, 90.0);

/// Rooms a simulated reading may claim to come from.
pub const LOCATIONS: [&str; 12] = [
    "Living Room",
    "Kitchen",
    "Bedroom",
    "Bathroom",
    "Garage",
    "Garden",
    "Office",
    "Basement",
    "Attic",
    "Balcony",
    "Dining Room",
    "Study Room",
];

/// One simulated sensor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SensorConfiguration {
    pub sensor_id: String,
    pub sensor_name: String,
}

impl SensorConfiguration {
    pub fn new(sensor_id: impl Into<String>, sensor_name: impl Into<String>) -> Self {
        Self {
            sensor_id: sensor_id.into(),
            sensor_name: sensor_name.into(),
        }
    }
}

/// The five sensors every simulation starts with.
pub fn default_sensors() -> Vec<SensorConfiguration> {
    vec![
        SensorConfiguration::new("SENSOR_001", "Primary Environmental Sensor"),
        SensorConfiguration::new("SENSOR_002", "Secondary Climate Monitor"),
        SensorConfiguration::new("SENSOR_003", "Backup Temperature Gauge"),
        SensorConfiguration::new("SENSOR_004", "Mobile Weather Station"),
        SensorConfiguration::new("SENSOR_005", "Smart Environment Tracker"),
    ]
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Owns the sensor fleet and fabricates readings for it.
#[derive(Debug, Clone)]
pub struct SensorSimulator {
    sensors: Vec<SensorConfiguration>,
}

impl SensorSimulator {
    /// Simulator with the default fleet
    pub fn new() -> Self {
        Self::with_sensors(default_sensors())
    }

    pub fn with_sensors(sensors: Vec<SensorConfiguration>) -> Self {
        Self { sensors }
    }

    /// Fabricate one reading for the given sensor.
    pub fn generate(&self, sensor: &SensorConfiguration) -> SensorReading {
        let mut rng = rand::thread_rng();
        let temperature = rng.gen_range(TEMPERATURE_RANGE.0..=TEMPERATURE_RANGE.1);
        let humidity = rng.gen_range(HUMIDITY_RANGE.0..=HUMIDITY_RANGE.1);
        let location = LOCATIONS.choose(&mut rng).copied().unwrap_or(LOCATIONS[0]);

        SensorReading {
            sensor_id: sensor.sensor_id.clone(),
            sensor_name: sensor.sensor_name.clone(),
            location: location.to_string(),
            temperature: round_one_decimal(temperature),
            humidity: round_one_decimal(humidity),
            timestamp: Utc::now(),
        }
    }

    /// One reading per configured sensor, in fleet order.
    pub fn generate_all(&self) -> Vec<SensorReading> {
        self.sensors.iter().map(|s| self.generate(s)).collect()
    }

    pub fn sensors(&self) -> &[SensorConfiguration] {
        &self.sensors
    }

    /// Add a sensor; ids must be non-blank and unique.
    pub fn add_sensor(&mut self, sensor: SensorConfiguration) -> PublisherResult<()> {
        if is_blank(&sensor.sensor_id) {
            return Err(PublisherError::InvalidSensor(
                "Sensor id cannot be empty".to_string(),
            ));
        }

        if self.sensors.iter().any(|s| s.sensor_id == sensor.sensor_id) {
            return Err(PublisherError::InvalidSensor(format!(
                "A sensor with id '{}' already exists",
                sensor.sensor_id
            )));
        }

        self.sensors.push(sensor);
        Ok(())
    }

    /// Remove a sensor by id. Returns false when nothing was removed.
    pub fn remove_sensor(&mut self, sensor_id: &str) -> bool {
        if is_blank(sensor_id) {
            return false;
        }

        match self.sensors.iter().position(|s| s.sensor_id == sensor_id) {
            Some(index) => {
                self.sensors.remove(index);
                true
            }
            None => false,
        }
    }
}

impl Default for SensorSimulator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_fleet() {
        let simulator = SensorSimulator::new();
        let ids: Vec<&str> = simulator.sensors().iter().map(|s| s.sensor_id.as_str()).collect();
        assert_eq!(
            ids,
            vec!["SENSOR_001", "SENSOR_002", "SENSOR_003", "SENSOR_004", "SENSOR_005"]
        );
        assert_eq!(simulator.sensors()[3].sensor_name, "Mobile Weather Station");
    }

    #[test]
    fn test_generated_values_stay_in_range() {
        let simulator = SensorSimulator::new();
        let sensor = SensorConfiguration::new("SENSOR_042", "Test");

        for _ in 0..200 {
            let reading = simulator.generate(&sensor);
            assert!((10.0..=40.0).contains(&reading.temperature));
            assert!((20.0..=90.0).contains(&reading.humidity));
            assert_eq!(round_one_decimal(reading.temperature), reading.temperature);
            assert_eq!(round_one_decimal(reading.humidity), reading.humidity);
            assert!(LOCATIONS.contains(&reading.location.as_str()));
            assert_eq!(reading.sensor_id, "SENSOR_042");
        }
    }

    #[test]
    fn test_generate_all_follows_fleet_order() {
        let simulator = SensorSimulator::new();
        let readings = simulator.generate_all();
        assert_eq!(readings.len(), 5);
        assert_eq!(readings[0].sensor_id, "SENSOR_001");
        assert_eq!(readings[4].sensor_name, "Smart Environment Tracker");
    }

    #[test]
    fn test_add_sensor_rejects_blank_and_duplicate_ids() {
        let mut simulator = SensorSimulator::new();

        assert!(simulator.add_sensor(SensorConfiguration::new("  ", "Blank")).is_err());
        assert!(simulator
            .add_sensor(SensorConfiguration::new("SENSOR_001", "Again"))
            .is_err());
        assert!(simulator
            .add_sensor(SensorConfiguration::new("SENSOR_006", "Porch Sensor"))
            .is_ok());
        assert_eq!(simulator.sensors().len(), 6);
    }

    #[test]
    fn test_remove_sensor() {
        let mut simulator = SensorSimulator::new();

        assert!(!simulator.remove_sensor(""));
        assert!(!simulator.remove_sensor("SENSOR_999"));
        assert!(simulator.remove_sensor("SENSOR_002"));
        assert!(!simulator.remove_sensor("SENSOR_002"));
        assert_eq!(simulator.sensors().len(), 4);
    }
}
