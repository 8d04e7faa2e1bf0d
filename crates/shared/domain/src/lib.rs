//! Domain layer - Core entities of the IoT simulator.
//!
//! This crate contains pure domain logic with no infrastructure dependencies.
//! Entities, request payloads and response shapes are shared by the
//! publisher and the subscriber service.

pub mod constants;
pub mod dashboard;
pub mod device;
pub mod error;
pub mod house;
pub mod room;
pub mod sensor_data;

pub use constants::*;
pub use dashboard::DashboardStats;
pub use device::{CreateDevice, Device, DeviceResponse, DeviceType, UpdateDevice};
pub use error::{DomainError, DomainResult};
pub use house::{CreateHouse, House, HouseResponse, HouseWithRooms, UpdateHouse};
pub use room::{CreateRoom, Room, RoomResponse, RoomWithDevices, UpdateRoom};
pub use sensor_data::{
    parse_timestamp, CreateSensorData, MqttSensorDataRequest, SensorData, SensorDataAggregate,
    SensorDataResponse, SensorReading, UpdateSensorData,
};

/// Returns true when the value is empty or whitespace only.
pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Truncate to at most `max` characters.
pub fn clip(value: &str, max: u32) -> String {
    value.chars().take(max as usize).collect()
}

/// Fail with a validation error carrying `message` when `value` is blank.
pub fn require_text(value: &str, message: &str) -> DomainResult<()> {
    if is_blank(value) {
        return Err(DomainError::validation(message));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clip_counts_characters() {
        assert_eq!(clip("Küche", 3), "Küc");
        assert_eq!(clip("Attic", 10), "Attic");
    }

    #[test]
    fn test_require_text() {
        assert!(require_text("Kitchen", "Room name is required").is_ok());
        assert_eq!(
            require_text(" \t", "Room name is required"),
            Err(DomainError::validation("Room name is required"))
        );
    }
}
