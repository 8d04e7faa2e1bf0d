//! Publisher errors.

use thiserror::Error;

/// Errors raised while simulating or publishing readings.
#[derive(Error, Debug)]
pub enum PublisherError {
    #[error("MQTT client is not connected")]
    NotConnected,

    #[error("Timed out after {0} seconds waiting for the broker")]
    ConnectTimeout(u64),

    #[error("Invalid sensor: {0}")]
    InvalidSensor(String),

    #[error("Failed to serialize reading: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("MQTT client error: {0}")]
    Client(#[from] rumqttc::ClientError),
}

/// Result type alias
pub type PublisherResult<T> = Result<T, PublisherError>;
