//! Device handlers.

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
use domain::{CreateDevice, DeviceResponse, UpdateDevice};

use crate::extractors::ValidatedJson;
use crate::state::AppState;

/// Optional filter of the device list
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct DeviceFilter {
    /// Only devices installed in this room
    pub room_id: Option<Uuid>,
}

/// Create device routes
pub fn device_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_devices).post(create_device))
        .route("/:id", get(get_device).put(update_device).delete(delete_device))
}

/// List devices, optionally of one room
#[utoipa::path(
    get,
    path = "/api/devices",
    tag = "Devices",
    params(DeviceFilter),
    responses(
        (status = 200, description = "Devices ordered by name", body = Vec<DeviceResponse>)
    )
)]
pub async fn list_devices(
    State(state): State<AppState>,
    Query(filter): Query<DeviceFilter>,
) -> AppResult<Json<Vec<DeviceResponse>>> {
    Ok(Json(state.devices.list_devices(filter.room_id).await?))
}

/// Get device by ID
#[utoipa::path(
    get,
    path = "/api/devices/{id}",
    tag = "Devices",
    params(
        ("id" = Uuid, Path, description = "Device ID")
    ),
    responses(
        (status = 200, description = "Device with its room", body = DeviceResponse),
        (status = 404, description = "Device not found")
    )
)]
pub async fn get_device(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<DeviceResponse>> {
    Ok(Json(state.devices.get_device(id).await?))
}

/// Register a device
#[utoipa::path(
    post,
    path = "/api/devices",
    tag = "Devices",
    request_body = CreateDevice,
    responses(
        (status = 201, description = "Device created", body = DeviceResponse),
        (status = 400, description = "Validation error or unknown room"),
        (status = 409, description = "Serial number already in use")
    )
)]
pub async fn create_device(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateDevice>,
) -> AppResult<(StatusCode, Json<DeviceResponse>)> {
    let device = state.devices.create_device(payload).await?;
    Ok((StatusCode::CREATED, Json(device)))
}

/// Update a device
#[utoipa::path(
    put,
    path = "/api/devices/{id}",
    tag = "Devices",
    params(
        ("id" = Uuid, Path, description = "Device ID")
    ),
    request_body = UpdateDevice,
    responses(
        (status = 200, description = "Device updated", body = DeviceResponse),
        (status = 400, description = "Validation error or unknown room"),
        (status = 404, description = "Device not found"),
        (status = 409, description = "Serial number already in use")
    )
)]
pub async fn update_device(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateDevice>,
) -> AppResult<Json<DeviceResponse>> {
    Ok(Json(state.devices.update_device(id, payload).await?))
}

/// Delete a device and its readings
#[utoipa::path(
    delete,
    path = "/api/devices/{id}",
    tag = "Devices",
    params(
        ("id" = Uuid, Path, description = "Device ID")
    ),
    responses(
        (status = 204, description = "Device deleted"),
        (status = 404, description = "Device not found")
    )
)]
pub async fn delete_device(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    if !state.devices.delete_device(id).await? {
        return Err(AppError::NotFound);
    }
    Ok(StatusCode::NO_CONTENT)
}
