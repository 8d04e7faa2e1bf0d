//! Dashboard service - fleet-wide counters.

use async_trait::async_trait;
use std::sync::Arc;

use common::AppResult;
use domain::DashboardStats;

use crate::repository::{DeviceRepository, HouseRepository, RoomRepository};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait DashboardService: Send + Sync {
    async fn stats(&self) -> AppResult<DashboardStats>;
}

pub struct DashboardManager {
    houses: Arc<dyn HouseRepository>,
    rooms: Arc<dyn RoomRepository>,
    devices: Arc<dyn DeviceRepository>,
}

impl DashboardManager {
    pub fn new(
        houses: Arc<dyn HouseRepository>,
        rooms: Arc<dyn RoomRepository>,
        devices: Arc<dyn DeviceRepository>,
    ) -> Self {
        Self {
            houses,
            rooms,
            devices,
        }
    }
}

#[async_trait]
impl DashboardService for DashboardManager {
    async fn stats(&self) -> AppResult<DashboardStats> {
        let total_houses = self.houses.count().await?;
        let total_rooms = self.rooms.count().await?;
        let total_devices = self.devices.count().await?;
        let active_devices = self.devices.count_active().await?;

        Ok(DashboardStats::new(
            total_houses,
            total_rooms,
            total_devices,
            active_devices,
        ))
    }
}
