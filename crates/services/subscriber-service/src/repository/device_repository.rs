//! Device repository implementation.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    sea_query::LikeExpr, ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::device::{self, ActiveModel, Entity as DeviceEntity};
use super::entities::room::Entity as RoomEntity;
use super::entities::sensor_data::{self, Entity as SensorDataEntity};
use super::update_error;
use common::{AppError, AppResult};
use domain::{Device, Room};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

const LIKE_ESCAPE: char = '!';

/// `LIKE` pattern matching `value` anywhere, with its wildcards taken literally.
fn contains_pattern(value: &str) -> LikeExpr {
    let mut pattern = String::with_capacity(value.len() + 2);
    pattern.push('%');
    for c in value.chars() {
        if matches!(c, '%' | '_' | LIKE_ESCAPE) {
            pattern.push(LIKE_ESCAPE);
        }
        pattern.push(c);
    }
    pattern.push('%');
    LikeExpr::new(pattern).escape(LIKE_ESCAPE)
}

/// Device repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait DeviceRepository: Send + Sync {
    /// Find device by ID
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Device>>;

    /// Find device by ID together with its room
    async fn find_with_room(&self, id: Uuid) -> AppResult<Option<(Device, Option<Room>)>>;

    /// List all devices with their rooms, ordered by name
    async fn list_with_room(&self) -> AppResult<Vec<(Device, Option<Room>)>>;

    /// List the devices of one room, ordered by name
    async fn list_by_room(&self, room_id: Uuid) -> AppResult<Vec<Device>>;

    /// Find device by exact serial number
    async fn find_by_serial_number(&self, serial_number: &str) -> AppResult<Option<Device>>;

    /// Resolve the device reporting under a broker sensor id.
    ///
    /// Tries, in order: serial number equal to the id, name containing the
    /// id, and the device of any stored reading carrying the id.
    async fn find_by_sensor_id(&self, sensor_id: &str) -> AppResult<Option<Device>>;

    /// Persist a new device
    async fn insert(&self, device: Device) -> AppResult<Device>;

    /// Overwrite an existing device, refreshing `updated_at`
    async fn update(&self, device: Device) -> AppResult<Device>;

    /// Delete device by ID; false when it did not exist
    async fn delete(&self, id: Uuid) -> AppResult<bool>;

    /// Number of devices
    async fn count(&self) -> AppResult<u64>;

    /// Number of active devices
    async fn count_active(&self) -> AppResult<u64>;

    /// Number of devices installed in a room
    async fn count_by_room(&self, room_id: Uuid) -> AppResult<u64>;
}

/// SeaORM-backed device repository
pub struct DeviceStore {
    db: DatabaseConnection,
}

impl DeviceStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl DeviceRepository for DeviceStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Device>> {
        let result = DeviceEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Device::from))
    }

    async fn find_with_room(&self, id: Uuid) -> AppResult<Option<(Device, Option<Room>)>> {
        let result = DeviceEntity::find_by_id(id)
            .find_also_related(RoomEntity)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(|(device, room)| (Device::from(device), room.map(Room::from))))
    }

    async fn list_with_room(&self) -> AppResult<Vec<(Device, Option<Room>)>> {
        let models = DeviceEntity::find()
            .find_also_related(RoomEntity)
            .order_by_asc(device::Column::Name)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models
            .into_iter()
            .map(|(device, room)| (Device::from(device), room.map(Room::from)))
            .collect())
    }

    async fn list_by_room(&self, room_id: Uuid) -> AppResult<Vec<Device>> {
        let models = DeviceEntity::find()
            .filter(device::Column::RoomId.eq(room_id))
            .order_by_asc(device::Column::Name)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(Device::from).collect())
    }

    async fn find_by_serial_number(&self, serial_number: &str) -> AppResult<Option<Device>> {
        let result = DeviceEntity::find()
            .filter(device::Column::SerialNumber.eq(serial_number))
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Device::from))
    }

    async fn find_by_sensor_id(&self, sensor_id: &str) -> AppResult<Option<Device>> {
        if let Some(device) = self.find_by_serial_number(sensor_id).await? {
            return Ok(Some(device));
        }

        let by_name = DeviceEntity::find()
            .filter(device::Column::Name.like(contains_pattern(sensor_id)))
            .order_by_asc(device::Column::CreatedAt)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;
        if let Some(model) = by_name {
            return Ok(Some(Device::from(model)));
        }

        let by_reading = SensorDataEntity::find()
            .filter(sensor_data::Column::SensorId.eq(sensor_id))
            .order_by_desc(sensor_data::Column::Timestamp)
            .find_also_related(DeviceEntity)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(by_reading.and_then(|(_, device)| device).map(Device::from))
    }

    async fn insert(&self, device: Device) -> AppResult<Device> {
        let model = ActiveModel::from(device)
            .insert(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(Device::from(model))
    }

    async fn update(&self, device: Device) -> AppResult<Device> {
        let mut active = ActiveModel::from(device);
        active.updated_at = Set(Utc::now());

        let model = active.update(&self.db).await.map_err(update_error)?;
        Ok(Device::from(model))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = DeviceEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.rows_affected > 0)
    }

    async fn count(&self) -> AppResult<u64> {
        DeviceEntity::find()
            .count(&self.db)
            .await
            .map_err(AppError::from)
    }

    async fn count_active(&self) -> AppResult<u64> {
        DeviceEntity::find()
            .filter(device::Column::IsActive.eq(true))
            .count(&self.db)
            .await
            .map_err(AppError::from)
    }

    async fn count_by_room(&self, room_id: Uuid) -> AppResult<u64> {
        DeviceEntity::find()
            .filter(device::Column::RoomId.eq(room_id))
            .count(&self.db)
            .await
            .map_err(AppError::from)
    }
}
