//! Repository layer for data access.

pub mod entities;
mod device_repository;
mod house_repository;
mod room_repository;
mod sensor_data_repository;

use common::AppError;
use sea_orm::DbErr;

pub use device_repository::{DeviceRepository, DeviceStore};
pub use house_repository::{HouseRepository, HouseStore};
pub use room_repository::{RoomRepository, RoomStore};
pub use sensor_data_repository::{SensorDataRepository, SensorDataStore};

#[cfg(any(test, feature = "test-utils"))]
pub use device_repository::MockDeviceRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use house_repository::MockHouseRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use room_repository::MockRoomRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use sensor_data_repository::MockSensorDataRepository;

/// Updating a row that no longer exists surfaces as not found.
fn update_error(err: DbErr) -> AppError {
    match err {
        DbErr::RecordNotUpdated => AppError::NotFound,
        other => AppError::from(other),
    }
}
