//! Room service - rooms inside houses.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use common::{AppError, AppResult, OptionExt};
use domain::{CreateRoom, Room, RoomResponse, RoomWithDevices, UpdateRoom};

use super::require;
use crate::repository::{DeviceRepository, HouseRepository, RoomRepository};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Room service trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait RoomService: Send + Sync {
    async fn get_room(&self, id: Uuid) -> AppResult<RoomResponse>;

    /// All rooms, or only those of `house_id` when given
    async fn list_rooms(&self, house_id: Option<Uuid>) -> AppResult<Vec<RoomResponse>>;

    async fn get_room_with_devices(&self, id: Uuid) -> AppResult<RoomWithDevices>;

    async fn create_room(&self, request: CreateRoom) -> AppResult<RoomResponse>;

    async fn update_room(&self, id: Uuid, request: UpdateRoom) -> AppResult<RoomResponse>;

    /// Delete an empty room. Rooms still holding devices are refused.
    async fn delete_room(&self, id: Uuid) -> AppResult<bool>;
}

/// Concrete implementation of RoomService.
pub struct RoomManager {
    rooms: Arc<dyn RoomRepository>,
    houses: Arc<dyn HouseRepository>,
    devices: Arc<dyn DeviceRepository>,
}

impl RoomManager {
    pub fn new(
        rooms: Arc<dyn RoomRepository>,
        houses: Arc<dyn HouseRepository>,
        devices: Arc<dyn DeviceRepository>,
    ) -> Self {
        Self {
            rooms,
            houses,
            devices,
        }
    }

    /// Check the house exists and no other room in it carries the name.
    async fn validate_placement(
        &self,
        name: &str,
        house_id: Uuid,
        current_room: Option<Uuid>,
    ) -> AppResult<String> {
        require(name, "Room name is required")?;

        let house = self
            .houses
            .find_by_id(house_id)
            .await?
            .ok_or_else(|| AppError::validation(format!("House {} does not exist", house_id)))?;

        if let Some(existing) = self.rooms.find_by_house_and_name(house_id, name).await? {
            if Some(existing.id) != current_room {
                return Err(AppError::validation(format!(
                    "A room named '{}' already exists in this house",
                    name
                )));
            }
        }

        Ok(house.name)
    }
}

#[async_trait]
impl RoomService for RoomManager {
    async fn get_room(&self, id: Uuid) -> AppResult<RoomResponse> {
        let (room, house) = self.rooms.find_with_house(id).await?.ok_or_not_found()?;
        Ok(match house {
            Some(house) => RoomResponse::with_house_name(room, house.name),
            None => RoomResponse::from(room),
        })
    }

    async fn list_rooms(&self, house_id: Option<Uuid>) -> AppResult<Vec<RoomResponse>> {
        if let Some(house_id) = house_id {
            let house_name = self.houses.find_by_id(house_id).await?.map(|h| h.name);
            let rooms = self.rooms.list_by_house(house_id).await?;
            return Ok(rooms
                .into_iter()
                .map(|room| match &house_name {
                    Some(name) => RoomResponse::with_house_name(room, name.clone()),
                    None => RoomResponse::from(room),
                })
                .collect());
        }

        let rooms = self.rooms.list_with_house().await?;
        Ok(rooms
            .into_iter()
            .map(|(room, house)| match house {
                Some(house) => RoomResponse::with_house_name(room, house.name),
                None => RoomResponse::from(room),
            })
            .collect())
    }

    async fn get_room_with_devices(&self, id: Uuid) -> AppResult<RoomWithDevices> {
        let room = self.get_room(id).await?;
        let devices = self.devices.list_by_room(id).await?;
        Ok(RoomWithDevices::new(room, devices))
    }

    async fn create_room(&self, request: CreateRoom) -> AppResult<RoomResponse> {
        let name = request.name.trim();
        let house_name = self
            .validate_placement(name, request.house_id, None)
            .await?;

        let room = self
            .rooms
            .insert(Room::new(name.to_string(), request.house_id))
            .await?;
        tracing::info!("Created room {} ({}) in house {}", room.name, room.id, room.house_id);

        Ok(RoomResponse::with_house_name(room, house_name))
    }

    async fn update_room(&self, id: Uuid, request: UpdateRoom) -> AppResult<RoomResponse> {
        let mut room = self.rooms.find_by_id(id).await?.ok_or_not_found()?;
        let name = request.name.trim();
        let house_name = self
            .validate_placement(name, request.house_id, Some(id))
            .await?;

        room.name = name.to_string();
        room.house_id = request.house_id;
        let room = self.rooms.update(room).await?;

        Ok(RoomResponse::with_house_name(room, house_name))
    }

    async fn delete_room(&self, id: Uuid) -> AppResult<bool> {
        if self.rooms.find_by_id(id).await?.is_none() {
            return Ok(false);
        }

        let device_count = self.devices.count_by_room(id).await?;
        if device_count > 0 {
            return Err(AppError::conflict(format!(
                "Room has {} device(s); move or delete them first",
                device_count
            )));
        }

        self.rooms.delete(id).await
    }
}
