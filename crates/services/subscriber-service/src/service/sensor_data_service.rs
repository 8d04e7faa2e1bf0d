//! Sensor data service - readings, queries over time and retention.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use uuid::Uuid;

use common::{AppError, AppResult, OptionExt};
use domain::{
    CreateSensorData, MqttSensorDataRequest, SensorData, SensorDataAggregate, UpdateSensorData,
};

use super::require;
use crate::repository::{DeviceRepository, SensorDataRepository};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Sensor data service trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait SensorDataService: Send + Sync {
    async fn get_sensor_data(&self, id: Uuid) -> AppResult<SensorData>;

    /// All readings, newest first
    async fn list_sensor_data(&self) -> AppResult<Vec<SensorData>>;

    async fn list_by_device(&self, device_id: Uuid) -> AppResult<Vec<SensorData>>;

    /// Readings within `[start, end]`; `start` must precede `end`
    async fn list_by_device_in_range(
        &self,
        device_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> AppResult<Vec<SensorData>>;

    async fn latest_by_device(&self, device_id: Uuid) -> AppResult<SensorData>;

    async fn aggregate(
        &self,
        device_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> AppResult<SensorDataAggregate>;

    async fn create_sensor_data(&self, request: CreateSensorData) -> AppResult<SensorData>;

    /// Store a broker-shaped reading for the device registered under its
    /// sensor id
    async fn create_from_mqtt(&self, request: MqttSensorDataRequest) -> AppResult<SensorData>;

    async fn update_sensor_data(&self, id: Uuid, request: UpdateSensorData)
        -> AppResult<SensorData>;

    async fn delete_sensor_data(&self, id: Uuid) -> AppResult<bool>;

    /// Remove readings older than `cutoff`, returning the count removed
    async fn cleanup(&self, cutoff: DateTime<Utc>) -> AppResult<u64>;
}

/// Concrete implementation of SensorDataService.
pub struct SensorDataManager {
    readings: Arc<dyn SensorDataRepository>,
    devices: Arc<dyn DeviceRepository>,
}

impl SensorDataManager {
    pub fn new(
        readings: Arc<dyn SensorDataRepository>,
        devices: Arc<dyn DeviceRepository>,
    ) -> Self {
        Self { readings, devices }
    }

    async fn require_device(&self, device_id: Uuid) -> AppResult<()> {
        if self.devices.find_by_id(device_id).await?.is_none() {
            return Err(AppError::validation(format!(
                "Device {} does not exist",
                device_id
            )));
        }
        Ok(())
    }
}

fn check_range(start: DateTime<Utc>, end: DateTime<Utc>) -> AppResult<()> {
    if start >= end {
        return Err(AppError::validation("Start date must be earlier than end date"));
    }
    Ok(())
}

#[async_trait]
impl SensorDataService for SensorDataManager {
    async fn get_sensor_data(&self, id: Uuid) -> AppResult<SensorData> {
        self.readings.find_by_id(id).await?.ok_or_not_found()
    }

    async fn list_sensor_data(&self) -> AppResult<Vec<SensorData>> {
        self.readings.list().await
    }

    async fn list_by_device(&self, device_id: Uuid) -> AppResult<Vec<SensorData>> {
        self.readings.list_by_device(device_id).await
    }

    async fn list_by_device_in_range(
        &self,
        device_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> AppResult<Vec<SensorData>> {
        check_range(start, end)?;
        self.readings
            .list_by_device_in_range(device_id, start, end)
            .await
    }

    async fn latest_by_device(&self, device_id: Uuid) -> AppResult<SensorData> {
        self.readings
            .latest_by_device(device_id)
            .await?
            .ok_or_not_found()
    }

    async fn aggregate(
        &self,
        device_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> AppResult<SensorDataAggregate> {
        check_range(start, end)?;
        let readings = self
            .readings
            .list_by_device_in_range(device_id, start, end)
            .await?;

        Ok(SensorDataAggregate::from_readings(
            device_id, start, end, &readings,
        ))
    }

    async fn create_sensor_data(&self, request: CreateSensorData) -> AppResult<SensorData> {
        self.require_device(request.device_id).await?;

        let mut data = SensorData::new(request.device_id, request.timestamp.unwrap_or_else(Utc::now));
        data.sensor_id = request.sensor_id;
        data.sensor_name = request.sensor_name;
        data.location = request.location;
        data.temperature = request.temperature;
        data.humidity = request.humidity;
        data.metadata = request.metadata;

        self.readings.insert(data).await
    }

    async fn create_from_mqtt(&self, request: MqttSensorDataRequest) -> AppResult<SensorData> {
        require(&request.sensor_id, "Sensor ID is required")?;

        let device = self
            .devices
            .find_by_sensor_id(&request.sensor_id)
            .await?
            .ok_or_else(|| {
                AppError::validation(format!(
                    "Device with sensor ID '{}' not found",
                    request.sensor_id
                ))
            })?;

        let mut data = SensorData::new(device.id, request.timestamp.unwrap_or_else(Utc::now));
        data.sensor_id = Some(request.sensor_id);
        data.sensor_name = request.sensor_name;
        data.location = request.location;
        data.temperature = request.temperature;
        data.humidity = request.humidity;

        self.readings.insert(data).await
    }

    async fn update_sensor_data(
        &self,
        id: Uuid,
        request: UpdateSensorData,
    ) -> AppResult<SensorData> {
        let mut data = self.readings.find_by_id(id).await?.ok_or_not_found()?;
        self.require_device(request.device_id).await?;

        data.device_id = request.device_id;
        data.sensor_id = request.sensor_id;
        data.sensor_name = request.sensor_name;
        data.location = request.location;
        data.temperature = request.temperature;
        data.humidity = request.humidity;
        data.metadata = request.metadata;
        if let Some(timestamp) = request.timestamp {
            data.timestamp = timestamp;
        }

        self.readings.update(data).await
    }

    async fn delete_sensor_data(&self, id: Uuid) -> AppResult<bool> {
        self.readings.delete(id).await
    }

    async fn cleanup(&self, cutoff: DateTime<Utc>) -> AppResult<u64> {
        let deleted = self.readings.delete_older_than(cutoff).await?;
        tracing::info!("Deleted {} readings older than {}", deleted, cutoff);
        Ok(deleted)
    }
}
