//! Domain-level constants.
//!
//! These constants define business rules, field limits and the names
//! shared between the publisher and the subscriber.

// =============================================================================
// Field limits
// =============================================================================

/// Maximum house name length
pub const MAX_HOUSE_NAME_LENGTH: u32 = 200;

/// Maximum house address length
pub const MAX_HOUSE_ADDRESS_LENGTH: u32 = 500;

/// Maximum room name length
pub const MAX_ROOM_NAME_LENGTH: u32 = 100;

/// Maximum device name length (also applies to manufacturer, model, serial)
pub const MAX_DEVICE_FIELD_LENGTH: u32 = 100;

/// Maximum sensor id length stored with a reading
pub const MAX_SENSOR_ID_LENGTH: u32 = 50;

/// Maximum sensor name length stored with a reading
pub const MAX_SENSOR_NAME_LENGTH: u32 = 200;

/// Maximum location length stored with a reading
pub const MAX_LOCATION_LENGTH: u32 = 100;

// =============================================================================
// Auto-provisioning
// =============================================================================

/// House that collects devices first seen on the broker
pub const DEFAULT_HOUSE_NAME: &str = "Default House";

/// Address given to the auto-created house
pub const DEFAULT_HOUSE_ADDRESS: &str = "Auto-generated for unknown devices";

/// Room used when an unknown device reports no location
pub const UNKNOWN_ROOM_NAME: &str = "Unknown Room";

/// Manufacturer recorded on auto-created devices
pub const AUTO_MANUFACTURER: &str = "Auto-generated";

/// Model recorded on auto-created devices
pub const AUTO_MODEL: &str = "Unknown";

// =============================================================================
// Messaging
// =============================================================================

/// First topic segment of per-sensor topics
pub const SENSOR_TOPIC_PREFIX: &str = "sensors";

/// Last topic segment of per-sensor topics
pub const SENSOR_TOPIC_SUFFIX: &str = "data";

/// Subscription filter matching every per-sensor topic
pub const SENSOR_TOPIC_FILTER: &str = "sensors/+/data";

/// Topic used for readings without a sensor id
pub const FALLBACK_SENSOR_TOPIC: &str = "sensor/data";

/// Build the per-sensor topic (`sensors/{id}/data`, id lowercased).
pub fn sensor_topic(sensor_id: &str) -> String {
    format!(
        "{}/{}/{}",
        SENSOR_TOPIC_PREFIX,
        sensor_id.to_lowercase(),
        SENSOR_TOPIC_SUFFIX
    )
}

// =============================================================================
// Real-time hub
// =============================================================================

/// Event pushed after a reading is stored
pub const EVENT_SENSOR_DATA_UPDATE: &str = "SensorDataUpdate";

/// Event pushed when a reading arrives for an inactive device
pub const EVENT_DEVICE_STATUS_UPDATE: &str = "DeviceStatusUpdate";

/// Status reported for inactive devices
pub const STATUS_DISCONNECTED: &str = "Disconnected";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sensor_topic_lowercases_id() {
        assert_eq!(sensor_topic("SENSOR_001"), "sensors/sensor_001/data");
    }
}
