//! House handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use uuid::Uuid;

use common::{AppError, AppResult};
use domain::{CreateHouse, HouseResponse, HouseWithRooms, UpdateHouse};

use crate::extractors::ValidatedJson;
use crate::state::AppState;

/// Create house routes
pub fn house_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_houses).post(create_house))
        .route("/:id", get(get_house).put(update_house).delete(delete_house))
        .route("/:id/rooms", get(get_house_rooms))
}

/// List all houses
#[utoipa::path(
    get,
    path = "/api/houses",
    tag = "Houses",
    responses(
        (status = 200, description = "Houses ordered by name", body = Vec<HouseResponse>)
    )
)]
pub async fn list_houses(State(state): State<AppState>) -> AppResult<Json<Vec<HouseResponse>>> {
    let houses = state.houses.list_houses().await?;
    Ok(Json(houses.into_iter().map(HouseResponse::from).collect()))
}

/// Get house by ID
#[utoipa::path(
    get,
    path = "/api/houses/{id}",
    tag = "Houses",
    params(
        ("id" = Uuid, Path, description = "House ID")
    ),
    responses(
        (status = 200, description = "House", body = HouseResponse),
        (status = 404, description = "House not found")
    )
)]
pub async fn get_house(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<HouseResponse>> {
    let house = state.houses.get_house(id).await?;
    Ok(Json(HouseResponse::from(house)))
}

/// Get house with its rooms
#[utoipa::path(
    get,
    path = "/api/houses/{id}/rooms",
    tag = "Houses",
    params(
        ("id" = Uuid, Path, description = "House ID")
    ),
    responses(
        (status = 200, description = "House and its rooms", body = HouseWithRooms),
        (status = 404, description = "House not found")
    )
)]
pub async fn get_house_rooms(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<HouseWithRooms>> {
    Ok(Json(state.houses.get_house_with_rooms(id).await?))
}

/// Create a house
#[utoipa::path(
    post,
    path = "/api/houses",
    tag = "Houses",
    request_body = CreateHouse,
    responses(
        (status = 201, description = "House created", body = HouseResponse),
        (status = 400, description = "Validation error")
    )
)]
pub async fn create_house(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateHouse>,
) -> AppResult<(StatusCode, Json<HouseResponse>)> {
    let house = state.houses.create_house(payload).await?;
    Ok((StatusCode::CREATED, Json(HouseResponse::from(house))))
}

/// Update a house
#[utoipa::path(
    put,
    path = "/api/houses/{id}",
    tag = "Houses",
    params(
        ("id" = Uuid, Path, description = "House ID")
    ),
    request_body = UpdateHouse,
    responses(
        (status = 200, description = "House updated", body = HouseResponse),
        (status = 400, description = "Validation error"),
        (status = 404, description = "House not found")
    )
)]
pub async fn update_house(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateHouse>,
) -> AppResult<Json<HouseResponse>> {
    let house = state.houses.update_house(id, payload).await?;
    Ok(Json(HouseResponse::from(house)))
}

/// Delete a house with its rooms and devices
#[utoipa::path(
    delete,
    path = "/api/houses/{id}",
    tag = "Houses",
    params(
        ("id" = Uuid, Path, description = "House ID")
    ),
    responses(
        (status = 204, description = "House deleted"),
        (status = 404, description = "House not found")
    )
)]
pub async fn delete_house(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    if !state.houses.delete_house(id).await? {
        return Err(AppError::NotFound);
    }
    Ok(StatusCode::NO_CONTENT)
}
