//! House service - houses and their rooms.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use common::{AppResult, OptionExt};
use domain::{CreateHouse, House, HouseWithRooms, UpdateHouse};

use super::require;
use crate::repository::HouseRepository;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// House service trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait HouseService: Send + Sync {
    async fn get_house(&self, id: Uuid) -> AppResult<House>;

    /// All houses ordered by name
    async fn list_houses(&self) -> AppResult<Vec<House>>;

    async fn get_house_with_rooms(&self, id: Uuid) -> AppResult<HouseWithRooms>;

    async fn create_house(&self, request: CreateHouse) -> AppResult<House>;

    async fn update_house(&self, id: Uuid, request: UpdateHouse) -> AppResult<House>;

    /// Delete a house and, through the store, its rooms. False when absent.
    async fn delete_house(&self, id: Uuid) -> AppResult<bool>;
}

/// Concrete implementation of HouseService using repository.
pub struct HouseManager {
    repo: Arc<dyn HouseRepository>,
}

impl HouseManager {
    pub fn new(repo: Arc<dyn HouseRepository>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl HouseService for HouseManager {
    async fn get_house(&self, id: Uuid) -> AppResult<House> {
        self.repo.find_by_id(id).await?.ok_or_not_found()
    }

    async fn list_houses(&self) -> AppResult<Vec<House>> {
        self.repo.list().await
    }

    async fn get_house_with_rooms(&self, id: Uuid) -> AppResult<HouseWithRooms> {
        let (house, rooms) = self.repo.find_with_rooms(id).await?.ok_or_not_found()?;
        Ok(HouseWithRooms::new(house, rooms))
    }

    async fn create_house(&self, request: CreateHouse) -> AppResult<House> {
        require(&request.name, "House name is required")?;
        require(&request.address, "House address is required")?;

        let house = self
            .repo
            .insert(House::new(request.name, request.address))
            .await?;
        tracing::info!("Created house {} ({})", house.name, house.id);
        Ok(house)
    }

    async fn update_house(&self, id: Uuid, request: UpdateHouse) -> AppResult<House> {
        require(&request.name, "House name is required")?;
        require(&request.address, "House address is required")?;

        let mut house = self.repo.find_by_id(id).await?.ok_or_not_found()?;
        house.name = request.name;
        house.address = request.address;

        self.repo.update(house).await
    }

    async fn delete_house(&self, id: Uuid) -> AppResult<bool> {
        self.repo.delete(id).await
    }
}
