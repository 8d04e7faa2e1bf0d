//! Room domain entity and related types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::device::{Device, DeviceResponse};

/// Room domain entity. Room names are unique inside a house,
/// ignoring case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub id: Uuid,
    pub name: String,
    pub house_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Room {
    /// Create a new room inside the given house
    pub fn new(name: String, house_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name,
            house_id,
            created_at: now,
            updated_at: now,
        }
    }

    /// Case-insensitive name comparison used for the per-house uniqueness rule
    pub fn has_name(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.to_lowercase()
    }
}

/// Room creation payload
#[derive(Debug, Clone, Deserialize, Validate)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct CreateRoom {
    #[validate(length(max = 100, message = "Room name must be at most 100 characters"))]
    #[cfg_attr(feature = "openapi", schema(example = "Kitchen"))]
    pub name: String,
    pub house_id: Uuid,
}

/// Room update payload (full replacement)
#[derive(Debug, Clone, Deserialize, Validate)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct UpdateRoom {
    #[validate(length(max = 100, message = "Room name must be at most 100 characters"))]
    pub name: String,
    pub house_id: Uuid,
}

/// Room response, carrying the owning house name for display
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct RoomResponse {
    pub id: Uuid,
    pub name: String,
    pub house_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub house_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RoomResponse {
    pub fn with_house_name(room: Room, house_name: String) -> Self {
        Self {
            id: room.id,
            name: room.name,
            house_id: room.house_id,
            house_name: Some(house_name),
            created_at: room.created_at,
            updated_at: room.updated_at,
        }
    }
}

/// Room response without house details
impl From<Room> for RoomResponse {
    fn from(room: Room) -> Self {
        Self {
            id: room.id,
            name: room.name,
            house_id: room.house_id,
            house_name: None,
            created_at: room.created_at,
            updated_at: room.updated_at,
        }
    }
}

/// Room together with its devices
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct RoomWithDevices {
    #[serde(flatten)]
    pub room: RoomResponse,
    pub devices: Vec<DeviceResponse>,
}

impl RoomWithDevices {
    pub fn new(room: RoomResponse, devices: Vec<Device>) -> Self {
        let devices = devices
            .into_iter()
            .map(|device| DeviceResponse::with_room(device, Some(room.clone())))
            .collect();
        Self { room, devices }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_name_ignores_case() {
        let room = Room::new("Living Room".to_string(), Uuid::new_v4());
        assert!(room.has_name("living room"));
        assert!(room.has_name("LIVING ROOM"));
        assert!(!room.has_name("Kitchen"));
    }

    #[test]
    fn test_room_with_devices_attaches_room() {
        let house_id = Uuid::new_v4();
        let room = Room::new("Office".to_string(), house_id);
        let response = RoomResponse::with_house_name(room.clone(), "Lake House".to_string());
        let device = Device::auto_provisioned("sensor_001", None, room.id);

        let with_devices = RoomWithDevices::new(response, vec![device]);

        assert_eq!(with_devices.devices.len(), 1);
        let attached = with_devices.devices[0].room.as_ref().unwrap();
        assert_eq!(attached.id, room.id);
        assert_eq!(attached.house_name.as_deref(), Some("Lake House"));

        let json = serde_json::to_value(&with_devices).unwrap();
        assert_eq!(json["name"], "Office");
        assert_eq!(json["houseName"], "Lake House");
        assert!(json["devices"].is_array());
    }
}
