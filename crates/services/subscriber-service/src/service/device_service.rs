//! Device service - IoT devices installed in rooms.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use common::{AppError, AppResult, OptionExt};
use domain::{CreateDevice, Device, DeviceResponse, Room, RoomResponse, UpdateDevice};

use super::require;
use crate::repository::{DeviceRepository, RoomRepository};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Device service trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait DeviceService: Send + Sync {
    async fn get_device(&self, id: Uuid) -> AppResult<DeviceResponse>;

    /// All devices, or only those of `room_id` when given
    async fn list_devices(&self, room_id: Option<Uuid>) -> AppResult<Vec<DeviceResponse>>;

    async fn create_device(&self, request: CreateDevice) -> AppResult<DeviceResponse>;

    async fn update_device(&self, id: Uuid, request: UpdateDevice) -> AppResult<DeviceResponse>;

    /// Delete a device and its readings. False when absent.
    async fn delete_device(&self, id: Uuid) -> AppResult<bool>;
}

/// Concrete implementation of DeviceService.
pub struct DeviceManager {
    devices: Arc<dyn DeviceRepository>,
    rooms: Arc<dyn RoomRepository>,
}

impl DeviceManager {
    pub fn new(devices: Arc<dyn DeviceRepository>, rooms: Arc<dyn RoomRepository>) -> Self {
        Self { devices, rooms }
    }

    async fn require_room(&self, name: &str, room_id: Option<Uuid>) -> AppResult<Room> {
        require(name, "Device name is required")?;
        let room_id = room_id.ok_or_else(|| AppError::validation("Room ID is required"))?;

        self.rooms
            .find_by_id(room_id)
            .await?
            .ok_or_else(|| AppError::validation(format!("Room {} does not exist", room_id)))
    }

    async fn ensure_serial_available(
        &self,
        serial_number: Option<&str>,
        device_id: Option<Uuid>,
    ) -> AppResult<()> {
        let Some(serial_number) = serial_number.filter(|s| !domain::is_blank(s)) else {
            return Ok(());
        };

        match self.devices.find_by_serial_number(serial_number).await? {
            Some(existing) if Some(existing.id) != device_id => Err(AppError::conflict(format!(
                "A device with serial number '{}' already exists",
                serial_number
            ))),
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl DeviceService for DeviceManager {
    async fn get_device(&self, id: Uuid) -> AppResult<DeviceResponse> {
        let (device, room) = self.devices.find_with_room(id).await?.ok_or_not_found()?;
        Ok(DeviceResponse::with_room(device, room.map(RoomResponse::from)))
    }

    async fn list_devices(&self, room_id: Option<Uuid>) -> AppResult<Vec<DeviceResponse>> {
        if let Some(room_id) = room_id {
            let room = self.rooms.find_by_id(room_id).await?.map(RoomResponse::from);
            let devices = self.devices.list_by_room(room_id).await?;
            return Ok(devices
                .into_iter()
                .map(|device| DeviceResponse::with_room(device, room.clone()))
                .collect());
        }

        let devices = self.devices.list_with_room().await?;
        Ok(devices
            .into_iter()
            .map(|(device, room)| DeviceResponse::with_room(device, room.map(RoomResponse::from)))
            .collect())
    }

    async fn create_device(&self, request: CreateDevice) -> AppResult<DeviceResponse> {
        let room = self.require_room(&request.name, request.room_id).await?;
        self.ensure_serial_available(request.serial_number.as_deref(), None)
            .await?;

        let now = chrono::Utc::now();
        let device = Device {
            id: Uuid::new_v4(),
            name: request.name,
            room_id: Some(room.id),
            device_type: request.device_type,
            manufacturer: request.manufacturer,
            model: request.model,
            serial_number: request.serial_number,
            is_active: request.is_active,
            created_at: now,
            updated_at: now,
        };

        let device = self.devices.insert(device).await?;
        tracing::info!("Created device {} ({}) in room {}", device.name, device.id, room.id);

        Ok(DeviceResponse::with_room(device, Some(RoomResponse::from(room))))
    }

    async fn update_device(&self, id: Uuid, request: UpdateDevice) -> AppResult<DeviceResponse> {
        let mut device = self.devices.find_by_id(id).await?.ok_or_not_found()?;
        let room = self.require_room(&request.name, request.room_id).await?;
        self.ensure_serial_available(request.serial_number.as_deref(), Some(id))
            .await?;

        device.name = request.name;
        device.room_id = Some(room.id);
        device.device_type = request.device_type;
        device.manufacturer = request.manufacturer;
        device.model = request.model;
        device.serial_number = request.serial_number;
        device.is_active = request.is_active;

        let device = self.devices.update(device).await?;
        Ok(DeviceResponse::with_room(device, Some(RoomResponse::from(room))))
    }

    async fn delete_device(&self, id: Uuid) -> AppResult<bool> {
        self.devices.delete(id).await
    }
}
