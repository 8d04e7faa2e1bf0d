//! Application state for dependency injection.

use std::sync::Arc;

use async_trait::async_trait;

use common::{AppError, AppResult};

use crate::infra::Database;
use crate::realtime::SensorHub;
use crate::service::{DashboardService, DeviceService, HouseService, RoomService, SensorDataService};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Liveness check of the backing store.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait StoreHealth: Send + Sync {
    async fn check(&self) -> AppResult<()>;
}

#[async_trait]
impl StoreHealth for Database {
    async fn check(&self) -> AppResult<()> {
        self.ping().await.map_err(AppError::from)
    }
}

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub houses: Arc<dyn HouseService>,
    pub rooms: Arc<dyn RoomService>,
    pub devices: Arc<dyn DeviceService>,
    pub sensor_data: Arc<dyn SensorDataService>,
    pub dashboard: Arc<dyn DashboardService>,
    pub hub: SensorHub,
    pub store: Arc<dyn StoreHealth>,
}

impl AppState {
    /// Create new app state.
    pub fn new(
        houses: Arc<dyn HouseService>,
        rooms: Arc<dyn RoomService>,
        devices: Arc<dyn DeviceService>,
        sensor_data: Arc<dyn SensorDataService>,
        dashboard: Arc<dyn DashboardService>,
        hub: SensorHub,
        store: Arc<dyn StoreHealth>,
    ) -> Self {
        Self {
            houses,
            rooms,
            devices,
            sensor_data,
            dashboard,
            hub,
            store,
        }
    }
}
