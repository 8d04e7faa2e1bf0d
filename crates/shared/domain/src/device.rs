//! IoT device domain entity and related types.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::constants::{AUTO_MANUFACTURER, AUTO_MODEL, MAX_DEVICE_FIELD_LENGTH};
use crate::error::DomainError;
use crate::room::RoomResponse;

/// Kinds of devices a room can hold. Persisted by variant name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum DeviceType {
    TemperatureSensor,
    HumiditySensor,
    CombinedSensor,
    SmartThermostat,
    AirQualitySensor,
    MotionSensor,
    DoorSensor,
    WindowSensor,
    SmartLight,
    SmartPlug,
}

impl DeviceType {
    /// All variants in declaration order
    pub const ALL: [DeviceType; 10] = [
        DeviceType::TemperatureSensor,
        DeviceType::HumiditySensor,
        DeviceType::CombinedSensor,
        DeviceType::SmartThermostat,
        DeviceType::AirQualitySensor,
        DeviceType::MotionSensor,
        DeviceType::DoorSensor,
        DeviceType::WindowSensor,
        DeviceType::SmartLight,
        DeviceType::SmartPlug,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceType::TemperatureSensor => "TemperatureSensor",
            DeviceType::HumiditySensor => "HumiditySensor",
            DeviceType::CombinedSensor => "CombinedSensor",
            DeviceType::SmartThermostat => "SmartThermostat",
            DeviceType::AirQualitySensor => "AirQualitySensor",
            DeviceType::MotionSensor => "MotionSensor",
            DeviceType::DoorSensor => "DoorSensor",
            DeviceType::WindowSensor => "WindowSensor",
            DeviceType::SmartLight => "SmartLight",
            DeviceType::SmartPlug => "SmartPlug",
        }
    }
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeviceType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DeviceType::ALL
            .iter()
            .find(|t| t.as_str() == s)
            .copied()
            .ok_or_else(|| DomainError::validation(format!("Unknown device type '{}'", s)))
    }
}

/// IoT device domain entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Device {
    pub id: Uuid,
    pub name: String,
    pub room_id: Option<Uuid>,
    pub device_type: DeviceType,
    pub manufacturer: Option<String>,
    pub model: Option<String>,
    pub serial_number: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Device {
    /// Build the device registered for a sensor first seen on the broker.
    pub fn auto_provisioned(sensor_id: &str, sensor_name: Option<&str>, room_id: Uuid) -> Self {
        let now = Utc::now();
        let name = match sensor_name {
            Some(name) if !crate::is_blank(name) => name.to_string(),
            _ => format!("Device {}", sensor_id),
        };
        let name = crate::clip(&name, MAX_DEVICE_FIELD_LENGTH);

        Self {
            id: Uuid::new_v4(),
            name,
            room_id: Some(room_id),
            device_type: DeviceType::CombinedSensor,
            manufacturer: Some(AUTO_MANUFACTURER.to_string()),
            model: Some(AUTO_MODEL.to_string()),
            serial_number: Some(crate::clip(sensor_id, MAX_DEVICE_FIELD_LENGTH)),
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }
}

fn default_active() -> bool {
    true
}

/// Device creation payload
#[derive(Debug, Clone, Deserialize, Validate)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct CreateDevice {
    #[validate(length(max = 100, message = "Device name must be at most 100 characters"))]
    #[cfg_attr(feature = "openapi", schema(example = "Hallway thermostat"))]
    pub name: String,
    /// Room the device is installed in (required)
    pub room_id: Option<Uuid>,
    pub device_type: DeviceType,
    #[validate(length(max = 100, message = "Manufacturer must be at most 100 characters"))]
    pub manufacturer: Option<String>,
    #[validate(length(max = 100, message = "Model must be at most 100 characters"))]
    pub model: Option<String>,
    #[validate(length(max = 100, message = "Serial number must be at most 100 characters"))]
    pub serial_number: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

/// Device update payload (full replacement)
#[derive(Debug, Clone, Deserialize, Validate)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct UpdateDevice {
    #[validate(length(max = 100, message = "Device name must be at most 100 characters"))]
    pub name: String,
    pub room_id: Option<Uuid>,
    pub device_type: DeviceType,
    #[validate(length(max = 100, message = "Manufacturer must be at most 100 characters"))]
    pub manufacturer: Option<String>,
    #[validate(length(max = 100, message = "Model must be at most 100 characters"))]
    pub model: Option<String>,
    #[validate(length(max = 100, message = "Serial number must be at most 100 characters"))]
    pub serial_number: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

/// Device response with the room it lives in
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct DeviceResponse {
    pub id: Uuid,
    pub name: String,
    pub room_id: Option<Uuid>,
    pub room: Option<RoomResponse>,
    pub device_type: DeviceType,
    pub manufacturer: Option<String>,
    pub model: Option<String>,
    pub serial_number: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DeviceResponse {
    pub fn with_room(device: Device, room: Option<RoomResponse>) -> Self {
        Self {
            id: device.id,
            name: device.name,
            room_id: device.room_id,
            room,
            device_type: device.device_type,
            manufacturer: device.manufacturer,
            model: device.model,
            serial_number: device.serial_number,
            is_active: device.is_active,
            created_at: device.created_at,
            updated_at: device.updated_at,
        }
    }
}

impl From<Device> for DeviceResponse {
    fn from(device: Device) -> Self {
        Self::with_room(device, None)
    }
}
