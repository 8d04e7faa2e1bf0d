//! Service layer - business rules over the repositories.

mod dashboard_service;
mod device_service;
mod house_service;
mod room_service;
mod sensor_data_service;

pub use dashboard_service::{DashboardManager, DashboardService};
pub use device_service::{DeviceManager, DeviceService};
pub use house_service::{HouseManager, HouseService};
pub use room_service::{RoomManager, RoomService};
pub use sensor_data_service::{SensorDataManager, SensorDataService};

#[cfg(any(test, feature = "test-utils"))]
pub use dashboard_service::MockDashboardService;
#[cfg(any(test, feature = "test-utils"))]
pub use device_service::MockDeviceService;
#[cfg(any(test, feature = "test-utils"))]
pub use house_service::MockHouseService;
#[cfg(any(test, feature = "test-utils"))]
pub use room_service::MockRoomService;
#[cfg(any(test, feature = "test-utils"))]
pub use sensor_data_service::MockSensorDataService;

use common::AppResult;

/// Reject empty or whitespace-only required fields.
fn require(value: &str, message: &str) -> AppResult<()> {
    domain::require_text(value, message)?;
    Ok(())
}
