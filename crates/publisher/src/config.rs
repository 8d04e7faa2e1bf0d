//! Publisher configuration.

use std::env;
use std::time::Duration;

use common::MqttConfig;

/// Publisher configuration.
#[derive(Debug, Clone)]
pub struct PublisherConfig {
    /// Broker connection settings
    pub mqtt: MqttConfig,
    /// Delay between two batches of readings
    pub publish_interval: Duration,
    /// How long to wait for the broker to accept the connection
    pub connect_timeout: Duration,
}

impl PublisherConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            mqtt: MqttConfig::from_env("iot-publisher"),
            publish_interval: Duration::from_millis(
                env::var("PUBLISH_INTERVAL_MS")
                    .ok()
                    .and_then(|ms| ms.parse::<u64>().ok())
                    .filter(|ms| *ms > 0)
                    .unwrap_or(1000),
            ),
            connect_timeout: Duration::from_secs(
                env::var("MQTT_CONNECT_TIMEOUT_SECONDS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(10),
            ),
        }
    }
}

impl Default for PublisherConfig {
    fn default() -> Self {
        Self {
            mqtt: MqttConfig {
                client_id_prefix: "iot-publisher".to_string(),
                ..MqttConfig::default()
            },
            publish_interval: Duration::from_millis(1000),
            connect_timeout: Duration::from_secs(10),
        }
    }
}
