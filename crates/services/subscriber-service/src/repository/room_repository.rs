//! Room repository implementation.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::house::Entity as HouseEntity;
use super::entities::room::{self, ActiveModel, Entity as RoomEntity};
use super::update_error;
use common::{AppError, AppResult};
use domain::{House, Room};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Room repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait RoomRepository: Send + Sync {
    /// Find room by ID
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Room>>;

    /// Find room by ID together with its house
    async fn find_with_house(&self, id: Uuid) -> AppResult<Option<(Room, Option<House>)>>;

    /// List all rooms with their houses, ordered by room name
    async fn list_with_house(&self) -> AppResult<Vec<(Room, Option<House>)>>;

    /// List the rooms of one house, ordered by name
    async fn list_by_house(&self, house_id: Uuid) -> AppResult<Vec<Room>>;

    /// Find a room inside a house by name, ignoring case
    async fn find_by_house_and_name(&self, house_id: Uuid, name: &str)
        -> AppResult<Option<Room>>;

    /// Persist a new room
    async fn insert(&self, room: Room) -> AppResult<Room>;

    /// Overwrite an existing room, refreshing `updated_at`
    async fn update(&self, room: Room) -> AppResult<Room>;

    /// Delete room by ID; false when it did not exist
    async fn delete(&self, id: Uuid) -> AppResult<bool>;

    /// Number of rooms
    async fn count(&self) -> AppResult<u64>;
}

/// SeaORM-backed room repository
pub struct RoomStore {
    db: DatabaseConnection,
}

impl RoomStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl RoomRepository for RoomStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Room>> {
        let result = RoomEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Room::from))
    }

    async fn find_with_house(&self, id: Uuid) -> AppResult<Option<(Room, Option<House>)>> {
        let result = RoomEntity::find_by_id(id)
            .find_also_related(HouseEntity)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(|(room, house)| (Room::from(room), house.map(House::from))))
    }

    async fn list_with_house(&self) -> AppResult<Vec<(Room, Option<House>)>> {
        let models = RoomEntity::find()
            .find_also_related(HouseEntity)
            .order_by_asc(room::Column::Name)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models
            .into_iter()
            .map(|(room, house)| (Room::from(room), house.map(House::from)))
            .collect())
    }

    async fn list_by_house(&self, house_id: Uuid) -> AppResult<Vec<Room>> {
        let models = RoomEntity::find()
            .filter(room::Column::HouseId.eq(house_id))
            .order_by_asc(room::Column::Name)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(Room::from).collect())
    }

    async fn find_by_house_and_name(
        &self,
        house_id: Uuid,
        name: &str,
    ) -> AppResult<Option<Room>> {
        let result = RoomEntity::find()
            .filter(room::Column::HouseId.eq(house_id))
            .filter(
                Expr::expr(Func::lower(Expr::col((RoomEntity, room::Column::Name))))
                    .eq(name.to_lowercase()),
            )
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Room::from))
    }

    async fn insert(&self, room: Room) -> AppResult<Room> {
        let model = ActiveModel::from(room)
            .insert(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(Room::from(model))
    }

    async fn update(&self, room: Room) -> AppResult<Room> {
        let mut active = ActiveModel::from(room);
        active.updated_at = Set(Utc::now());

        let model = active.update(&self.db).await.map_err(update_error)?;
        Ok(Room::from(model))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = RoomEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.rows_affected > 0)
    }

    async fn count(&self) -> AppResult<u64> {
        RoomEntity::find()
            .count(&self.db)
            .await
            .map_err(AppError::from)
    }
}
