//! Subscriber service configuration.

use std::env;
use std::time::Duration;

use common::{DatabaseConfig, MqttConfig};

/// Subscriber service configuration.
#[derive(Debug, Clone)]
pub struct SubscriberConfig {
    /// Relational store settings
    pub database: DatabaseConfig,
    /// Broker the listener subscribes to
    pub mqtt: MqttConfig,
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Fixed delay before reconnecting to the broker
    pub reconnect_delay: Duration,
    /// Dashboard origin allowed by CORS
    pub cors_allowed_origin: String,
    /// Buffered hub messages per connection before it starts lagging
    pub hub_channel_capacity: usize,
}

impl SubscriberConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            database: DatabaseConfig::from_env(),
            mqtt: MqttConfig::from_env("iot-subscriber"),
            host: env::var("SUBSCRIBER_HOST").unwrap_or(defaults.host),
            port: env::var("SUBSCRIBER_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            reconnect_delay: env::var("MQTT_RECONNECT_DELAY_SECONDS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.reconnect_delay),
            cors_allowed_origin: env::var("CORS_ALLOWED_ORIGIN")
                .unwrap_or(defaults.cors_allowed_origin),
            hub_channel_capacity: env::var("HUB_CHANNEL_CAPACITY")
                .ok()
                .and_then(|c| c.parse().ok())
                .filter(|c| *c > 0)
                .unwrap_or(defaults.hub_channel_capacity),
        }
    }
}

impl Default for SubscriberConfig {
    fn default() -> Self {
        Self {
            database: DatabaseConfig::default(),
            mqtt: MqttConfig {
                client_id_prefix: "iot-subscriber".to_string(),
                ..MqttConfig::default()
            },
            host: "0.0.0.0".to_string(),
            port: 5000,
            reconnect_delay: Duration::from_secs(5),
            cors_allowed_origin: "http://localhost:4200".to_string(),
            hub_channel_capacity: 256,
        }
    }
}
