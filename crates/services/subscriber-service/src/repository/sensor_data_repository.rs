//! Sensor reading repository implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::sensor_data::{self, ActiveModel, Entity as SensorDataEntity};
use super::update_error;
use common::{AppError, AppResult};
use domain::SensorData;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Sensor reading repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait SensorDataRepository: Send + Sync {
    /// Find reading by ID
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<SensorData>>;

    /// All readings, newest first
    async fn list(&self) -> AppResult<Vec<SensorData>>;

    /// Readings of one device, newest first
    async fn list_by_device(&self, device_id: Uuid) -> AppResult<Vec<SensorData>>;

    /// Readings of one device within `[start, end]`, oldest first
    async fn list_by_device_in_range(
        &self,
        device_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> AppResult<Vec<SensorData>>;

    /// Most recent reading of one device
    async fn latest_by_device(&self, device_id: Uuid) -> AppResult<Option<SensorData>>;

    /// Persist a new reading
    async fn insert(&self, data: SensorData) -> AppResult<SensorData>;

    /// Overwrite an existing reading, refreshing `updated_at`
    async fn update(&self, data: SensorData) -> AppResult<SensorData>;

    /// Delete reading by ID; false when it did not exist
    async fn delete(&self, id: Uuid) -> AppResult<bool>;

    /// Delete readings timestamped before `cutoff`, returning how many went
    async fn delete_older_than(&self, cutoff: DateTime<Utc>) -> AppResult<u64>;
}

/// SeaORM-backed sensor reading repository
pub struct SensorDataStore {
    db: DatabaseConnection,
}

impl SensorDataStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SensorDataRepository for SensorDataStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<SensorData>> {
        let result = SensorDataEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(SensorData::from))
    }

    async fn list(&self) -> AppResult<Vec<SensorData>> {
        let models = SensorDataEntity::find()
            .order_by_desc(sensor_data::Column::Timestamp)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(SensorData::from).collect())
    }

    async fn list_by_device(&self, device_id: Uuid) -> AppResult<Vec<SensorData>> {
        let models = SensorDataEntity::find()
            .filter(sensor_data::Column::DeviceId.eq(device_id))
            .order_by_desc(sensor_data::Column::Timestamp)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(SensorData::from).collect())
    }

    async fn list_by_device_in_range(
        &self,
        device_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> AppResult<Vec<SensorData>> {
        let models = SensorDataEntity::find()
            .filter(sensor_data::Column::DeviceId.eq(device_id))
            .filter(sensor_data::Column::Timestamp.between(start, end))
            .order_by_asc(sensor_data::Column::Timestamp)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(SensorData::from).collect())
    }

    async fn latest_by_device(&self, device_id: Uuid) -> AppResult<Option<SensorData>> {
        let result = SensorDataEntity::find()
            .filter(sensor_data::Column::DeviceId.eq(device_id))
            .order_by_desc(sensor_data::Column::Timestamp)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(SensorData::from))
    }

    async fn insert(&self, data: SensorData) -> AppResult<SensorData> {
        let model = ActiveModel::from(data)
            .insert(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(SensorData::from(model))
    }

    async fn update(&self, data: SensorData) -> AppResult<SensorData> {
        let mut active = ActiveModel::from(data);
        active.updated_at = Set(Utc::now());

        let model = active.update(&self.db).await.map_err(update_error)?;
        Ok(SensorData::from(model))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = SensorDataEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.rows_affected > 0)
    }

    async fn delete_older_than(&self, cutoff: DateTime<Utc>) -> AppResult<u64> {
        let result = SensorDataEntity::delete_many()
            .filter(sensor_data::Column::Timestamp.lt(cutoff))
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.rows_affected)
    }
}
