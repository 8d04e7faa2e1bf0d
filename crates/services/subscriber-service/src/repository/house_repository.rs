//! House repository implementation.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::house::{self, ActiveModel, Entity as HouseEntity};
use super::entities::room::{self, Entity as RoomEntity};
use super::update_error;
use common::{AppError, AppResult};
use domain::{House, Room};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// House repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait HouseRepository: Send + Sync {
    /// Find house by ID
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<House>>;

    /// Find the first house with exactly this name
    async fn find_by_name(&self, name: &str) -> AppResult<Option<House>>;

    /// Find house by ID together with its rooms (ordered by name)
    async fn find_with_rooms(&self, id: Uuid) -> AppResult<Option<(House, Vec<Room>)>>;

    /// List all houses ordered by name
    async fn list(&self) -> AppResult<Vec<House>>;

    /// Persist a new house
    async fn insert(&self, house: House) -> AppResult<House>;

    /// Overwrite an existing house, refreshing `updated_at`
    async fn update(&self, house: House) -> AppResult<House>;

    /// Delete house by ID; false when it did not exist
    async fn delete(&self, id: Uuid) -> AppResult<bool>;

    /// Number of houses
    async fn count(&self) -> AppResult<u64>;
}

/// SeaORM-backed house repository
pub struct HouseStore {
    db: DatabaseConnection,
}

impl HouseStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl HouseRepository for HouseStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<House>> {
        let result = HouseEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(House::from))
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Option<House>> {
        let result = HouseEntity::find()
            .filter(house::Column::Name.eq(name))
            .order_by_asc(house::Column::CreatedAt)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(House::from))
    }

    async fn find_with_rooms(&self, id: Uuid) -> AppResult<Option<(House, Vec<Room>)>> {
        let Some(house) = self.find_by_id(id).await? else {
            return Ok(None);
        };

        let rooms = RoomEntity::find()
            .filter(room::Column::HouseId.eq(id))
            .order_by_asc(room::Column::Name)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(Some((house, rooms.into_iter().map(Room::from).collect())))
    }

    async fn list(&self) -> AppResult<Vec<House>> {
        let models = HouseEntity::find()
            .order_by_asc(house::Column::Name)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(House::from).collect())
    }

    async fn insert(&self, house: House) -> AppResult<House> {
        let model = ActiveModel::from(house)
            .insert(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(House::from(model))
    }

    async fn update(&self, house: House) -> AppResult<House> {
        let mut active = ActiveModel::from(house);
        active.updated_at = Set(Utc::now());

        let model = active.update(&self.db).await.map_err(update_error)?;
        Ok(House::from(model))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = HouseEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.rows_affected > 0)
    }

    async fn count(&self) -> AppResult<u64> {
        HouseEntity::find()
            .count(&self.db)
            .await
            .map_err(AppError::from)
    }
}
