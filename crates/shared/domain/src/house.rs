//! House domain entity and related types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::room::{Room, RoomResponse};

/// House domain entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct House {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl House {
    /// Create a new house with fresh id and timestamps
    pub fn new(name: String, address: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name,
            address,
            created_at: now,
            updated_at: now,
        }
    }
}

/// House creation payload
#[derive(Debug, Clone, Deserialize, Validate)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct CreateHouse {
    /// House display name
    #[validate(length(max = 200, message = "House name must be at most 200 characters"))]
    #[cfg_attr(feature = "openapi", schema(example = "Lake House"))]
    pub name: String,
    /// Postal address
    #[validate(length(max = 500, message = "House address must be at most 500 characters"))]
    #[cfg_attr(feature = "openapi", schema(example = "12 Shore Road"))]
    pub address: String,
}

/// House update payload (full replacement)
#[derive(Debug, Clone, Deserialize, Validate)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct UpdateHouse {
    #[validate(length(max = 200, message = "House name must be at most 200 characters"))]
    pub name: String,
    #[validate(length(max = 500, message = "House address must be at most 500 characters"))]
    pub address: String,
}

/// House response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct HouseResponse {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<House> for HouseResponse {
    fn from(house: House) -> Self {
        Self {
            id: house.id,
            name: house.name,
            address: house.address,
            created_at: house.created_at,
            updated_at: house.updated_at,
        }
    }
}

/// House together with its rooms
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct HouseWithRooms {
    #[serde(flatten)]
    pub house: HouseResponse,
    pub rooms: Vec<RoomResponse>,
}

impl HouseWithRooms {
    pub fn new(house: House, rooms: Vec<Room>) -> Self {
        let house_name = house.name.clone();
        Self {
            house: HouseResponse::from(house),
            rooms: rooms
                .into_iter()
                .map(|room| RoomResponse::with_house_name(room, house_name.clone()))
                .collect(),
        }
    }
}
