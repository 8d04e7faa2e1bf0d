//! Sensor data handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::{delete, get, post},
    Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use common::{AppError, AppResult};
use domain::{
    parse_timestamp, CreateSensorData, MqttSensorDataRequest, SensorDataAggregate,
    SensorDataResponse, UpdateSensorData,
};

use crate::extractors::ValidatedJson;
use crate::state::AppState;

/// Time window of a range or aggregate query
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct RangeQuery {
    /// Window start (RFC 3339 or `YYYY-MM-DD[THH:MM:SS]`, UTC)
    pub start_date: Option<String>,
    /// Window end, inclusive
    pub end_date: Option<String>,
}

impl RangeQuery {
    fn bounds(&self) -> AppResult<(DateTime<Utc>, DateTime<Utc>)> {
        Ok((
            required_timestamp("startDate", self.start_date.as_deref())?,
            required_timestamp("endDate", self.end_date.as_deref())?,
        ))
    }
}

/// Retention cutoff of a cleanup request
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct CleanupQuery {
    /// Readings strictly older than this are removed
    pub older_than: Option<String>,
}

/// Cleanup result
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CleanupResponse {
    pub deleted_count: u64,
    pub message: String,
}

fn required_timestamp(name: &str, value: Option<&str>) -> AppResult<DateTime<Utc>> {
    let value = value
        .filter(|v| !domain::is_blank(v))
        .ok_or_else(|| AppError::bad_request(format!("{} is required", name)))?;

    parse_timestamp(value)
        .ok_or_else(|| AppError::bad_request(format!("{} is not a valid date: {}", name, value)))
}

/// Create sensor data routes
pub fn sensor_data_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_sensor_data).post(create_sensor_data))
        .route("/from-mqtt", post(create_from_mqtt))
        .route("/cleanup", delete(cleanup_sensor_data))
        .route("/device/:device_id", get(list_device_data))
        .route("/device/:device_id/range", get(list_device_data_in_range))
        .route("/device/:device_id/latest", get(latest_device_data))
        .route("/device/:device_id/aggregate", get(aggregate_device_data))
        .route(
            "/:id",
            get(get_sensor_data)
                .put(update_sensor_data)
                .delete(delete_sensor_data),
        )
}

/// List all readings, newest first
#[utoipa::path(
    get,
    path = "/api/sensordata",
    tag = "Sensor Data",
    responses(
        (status = 200, description = "Readings, newest first", body = Vec<SensorDataResponse>)
    )
)]
pub async fn list_sensor_data(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<SensorDataResponse>>> {
    let readings = state.sensor_data.list_sensor_data().await?;
    Ok(Json(readings.into_iter().map(SensorDataResponse::from).collect()))
}

/// Get reading by ID
#[utoipa::path(
    get,
    path = "/api/sensordata/{id}",
    tag = "Sensor Data",
    params(
        ("id" = Uuid, Path, description = "Reading ID")
    ),
    responses(
        (status = 200, description = "Reading", body = SensorDataResponse),
        (status = 404, description = "Reading not found")
    )
)]
pub async fn get_sensor_data(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<SensorDataResponse>> {
    let data = state.sensor_data.get_sensor_data(id).await?;
    Ok(Json(SensorDataResponse::from(data)))
}

/// Readings of one device, newest first
#[utoipa::path(
    get,
    path = "/api/sensordata/device/{device_id}",
    tag = "Sensor Data",
    params(
        ("device_id" = Uuid, Path, description = "Device ID")
    ),
    responses(
        (status = 200, description = "Readings of the device", body = Vec<SensorDataResponse>)
    )
)]
pub async fn list_device_data(
    State(state): State<AppState>,
    Path(device_id): Path<Uuid>,
) -> AppResult<Json<Vec<SensorDataResponse>>> {
    let readings = state.sensor_data.list_by_device(device_id).await?;
    Ok(Json(readings.into_iter().map(SensorDataResponse::from).collect()))
}

/// Readings of one device inside a time window, oldest first
#[utoipa::path(
    get,
    path = "/api/sensordata/device/{device_id}/range",
    tag = "Sensor Data",
    params(
        ("device_id" = Uuid, Path, description = "Device ID"),
        RangeQuery
    ),
    responses(
        (status = 200, description = "Readings in the window", body = Vec<SensorDataResponse>),
        (status = 400, description = "Missing or inverted window")
    )
)]
pub async fn list_device_data_in_range(
    State(state): State<AppState>,
    Path(device_id): Path<Uuid>,
    Query(range): Query<RangeQuery>,
) -> AppResult<Json<Vec<SensorDataResponse>>> {
    let (start, end) = range.bounds()?;
    let readings = state
        .sensor_data
        .list_by_device_in_range(device_id, start, end)
        .await?;
    Ok(Json(readings.into_iter().map(SensorDataResponse::from).collect()))
}

/// Most recent reading of a device
#[utoipa::path(
    get,
    path = "/api/sensordata/device/{device_id}/latest",
    tag = "Sensor Data",
    params(
        ("device_id" = Uuid, Path, description = "Device ID")
    ),
    responses(
        (status = 200, description = "Latest reading", body = SensorDataResponse),
        (status = 404, description = "Device has no readings")
    )
)]
pub async fn latest_device_data(
    State(state): State<AppState>,
    Path(device_id): Path<Uuid>,
) -> AppResult<Json<SensorDataResponse>> {
    let data = state.sensor_data.latest_by_device(device_id).await?;
    Ok(Json(SensorDataResponse::from(data)))
}

/// Statistics of a device's readings inside a time window
#[utoipa::path(
    get,
    path = "/api/sensordata/device/{device_id}/aggregate",
    tag = "Sensor Data",
    params(
        ("device_id" = Uuid, Path, description = "Device ID"),
        RangeQuery
    ),
    responses(
        (status = 200, description = "Window statistics", body = SensorDataAggregate),
        (status = 400, description = "Missing or inverted window")
    )
)]
pub async fn aggregate_device_data(
    State(state): State<AppState>,
    Path(device_id): Path<Uuid>,
    Query(range): Query<RangeQuery>,
) -> AppResult<Json<SensorDataAggregate>> {
    let (start, end) = range.bounds()?;
    Ok(Json(state.sensor_data.aggregate(device_id, start, end).await?))
}

/// Store a reading
#[utoipa::path(
    post,
    path = "/api/sensordata",
    tag = "Sensor Data",
    request_body = CreateSensorData,
    responses(
        (status = 201, description = "Reading stored", body = SensorDataResponse),
        (status = 400, description = "Validation error or unknown device")
    )
)]
pub async fn create_sensor_data(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateSensorData>,
) -> AppResult<(StatusCode, Json<SensorDataResponse>)> {
    let data = state.sensor_data.create_sensor_data(payload).await?;
    Ok((StatusCode::CREATED, Json(SensorDataResponse::from(data))))
}

/// Store a broker-shaped reading for a registered sensor
#[utoipa::path(
    post,
    path = "/api/sensordata/from-mqtt",
    tag = "Sensor Data",
    request_body = MqttSensorDataRequest,
    responses(
        (status = 201, description = "Reading stored", body = SensorDataResponse),
        (status = 400, description = "Validation error or unknown sensor")
    )
)]
pub async fn create_from_mqtt(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<MqttSensorDataRequest>,
) -> AppResult<(StatusCode, Json<SensorDataResponse>)> {
    let data = state.sensor_data.create_from_mqtt(payload).await?;
    Ok((StatusCode::CREATED, Json(SensorDataResponse::from(data))))
}

/// Replace a reading
#[utoipa::path(
    put,
    path = "/api/sensordata/{id}",
    tag = "Sensor Data",
    params(
        ("id" = Uuid, Path, description = "Reading ID")
    ),
    request_body = UpdateSensorData,
    responses(
        (status = 200, description = "Reading updated", body = SensorDataResponse),
        (status = 400, description = "Validation error or unknown device"),
        (status = 404, description = "Reading not found")
    )
)]
pub async fn update_sensor_data(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateSensorData>,
) -> AppResult<Json<SensorDataResponse>> {
    let data = state.sensor_data.update_sensor_data(id, payload).await?;
    Ok(Json(SensorDataResponse::from(data)))
}

/// Delete a reading
#[utoipa::path(
    delete,
    path = "/api/sensordata/{id}",
    tag = "Sensor Data",
    params(
        ("id" = Uuid, Path, description = "Reading ID")
    ),
    responses(
        (status = 204, description = "Reading deleted"),
        (status = 404, description = "Reading not found")
    )
)]
pub async fn delete_sensor_data(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    if !state.sensor_data.delete_sensor_data(id).await? {
        return Err(AppError::NotFound);
    }
    Ok(StatusCode::NO_CONTENT)
}

/// Delete readings older than a cutoff
#[utoipa::path(
    delete,
    path = "/api/sensordata/cleanup",
    tag = "Sensor Data",
    params(CleanupQuery),
    responses(
        (status = 200, description = "Readings removed", body = CleanupResponse),
        (status = 400, description = "Missing or invalid cutoff")
    )
)]
pub async fn cleanup_sensor_data(
    State(state): State<AppState>,
    Query(query): Query<CleanupQuery>,
) -> AppResult<Json<CleanupResponse>> {
    let cutoff = required_timestamp("olderThan", query.older_than.as_deref())?;
    let deleted_count = state.sensor_data.cleanup(cutoff).await?;

    Ok(Json(CleanupResponse {
        deleted_count,
        message: format!(
            "Deleted {} sensor data records older than {}.",
            deleted_count,
            cutoff.format("%Y-%m-%d")
        ),
    }))
}
