//! Room handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

use common::{AppError, AppResult};
use domain::{CreateRoom, RoomResponse, RoomWithDevices, UpdateRoom};

use crate::extractors::ValidatedJson;
use crate::state::AppState;

/// Optional filter of the room list
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct RoomFilter {
    /// Only rooms of this house
    pub house_id: Option<Uuid>,
}

/// Create room routes
pub fn room_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_rooms).post(create_room))
        .route("/:id", get(get_room).put(update_room).delete(delete_room))
        .route("/:id/devices", get(get_room_devices))
}

/// List rooms, optionally of one house
#[utoipa::path(
    get,
    path = "/api/rooms",
    tag = "Rooms",
    params(RoomFilter),
    responses(
        (status = 200, description = "Rooms ordered by name", body = Vec<RoomResponse>)
    )
)]
pub async fn list_rooms(
    State(state): State<AppState>,
    Query(filter): Query<RoomFilter>,
) -> AppResult<Json<Vec<RoomResponse>>> {
    Ok(Json(state.rooms.list_rooms(filter.house_id).await?))
}

/// Get room by ID
#[utoipa::path(
    get,
    path = "/api/rooms/{id}",
    tag = "Rooms",
    params(
        ("id" = Uuid, Path, description = "Room ID")
    ),
    responses(
        (status = 200, description = "Room", body = RoomResponse),
        (status = 404, description = "Room not found")
    )
)]
pub async fn get_room(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<RoomResponse>> {
    Ok(Json(state.rooms.get_room(id).await?))
}

/// Get room with its devices
#[utoipa::path(
    get,
    path = "/api/rooms/{id}/devices",
    tag = "Rooms",
    params(
        ("id" = Uuid, Path, description = "Room ID")
    ),
    responses(
        (status = 200, description = "Room and its devices", body = RoomWithDevices),
        (status = 404, description = "Room not found")
    )
)]
pub async fn get_room_devices(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<RoomWithDevices>> {
    Ok(Json(state.rooms.get_room_with_devices(id).await?))
}

/// Create a room
#[utoipa::path(
    post,
    path = "/api/rooms",
    tag = "Rooms",
    request_body = CreateRoom,
    responses(
        (status = 201, description = "Room created", body = RoomResponse),
        (status = 400, description = "Validation error, unknown house or duplicate name")
    )
)]
pub async fn create_room(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateRoom>,
) -> AppResult<(StatusCode, Json<RoomResponse>)> {
    let room = state.rooms.create_room(payload).await?;
    Ok((StatusCode::CREATED, Json(room)))
}

/// Update a room
#[utoipa::path(
    put,
    path = "/api/rooms/{id}",
    tag = "Rooms",
    params(
        ("id" = Uuid, Path, description = "Room ID")
    ),
    request_body = UpdateRoom,
    responses(
        (status = 200, description = "Room updated", body = RoomResponse),
        (status = 400, description = "Validation error, unknown house or duplicate name"),
        (status = 404, description = "Room not found")
    )
)]
pub async fn update_room(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateRoom>,
) -> AppResult<Json<RoomResponse>> {
    Ok(Json(state.rooms.update_room(id, payload).await?))
}

/// Delete an empty room
#[utoipa::path(
    delete,
    path = "/api/rooms/{id}",
    tag = "Rooms",
    params(
        ("id" = Uuid, Path, description = "Room ID")
    ),
    responses(
        (status = 204, description = "Room deleted"),
        (status = 404, description = "Room not found"),
        (status = 409, description = "Room still holds devices")
    )
)]
pub async fn delete_room(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    if !state.rooms.delete_room(id).await? {
        return Err(AppError::NotFound);
    }
    Ok(StatusCode::NO_CONTENT)
}
