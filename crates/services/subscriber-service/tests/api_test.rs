//! Integration tests for API endpoints.
//!
//! These tests drive the router with mock services, without a database or
//! broker.

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use mockall::predicate::eq;
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use common::AppError;
use domain::{DashboardStats, House, SensorData};
use subscriber_lib::realtime::SensorHub;
use subscriber_lib::routes::{cors_layer, create_router};
use subscriber_lib::service::{
    MockDashboardService, MockDeviceService, MockHouseService, MockRoomService,
    MockSensorDataService,
};
use subscriber_lib::state::{AppState, MockStoreHealth};

/// Mock services; tests set expectations before building the router.
struct TestApp {
    houses: MockHouseService,
    rooms: MockRoomService,
    devices: MockDeviceService,
    sensor_data: MockSensorDataService,
    dashboard: MockDashboardService,
    store: MockStoreHealth,
}

impl TestApp {
    fn new() -> Self {
        let mut store = MockStoreHealth::new();
        store.expect_check().returning(|| Ok(()));
        Self {
            houses: MockHouseService::new(),
            rooms: MockRoomService::new(),
            devices: MockDeviceService::new(),
            sensor_data: MockSensorDataService::new(),
            dashboard: MockDashboardService::new(),
            store,
        }
    }

    fn router(self) -> Router {
        let state = AppState::new(
            Arc::new(self.houses),
            Arc::new(self.rooms),
            Arc::new(self.devices),
            Arc::new(self.sensor_data),
            Arc::new(self.dashboard),
            SensorHub::new(16),
            Arc::new(self.store),
        );
        create_router(state, cors_layer("http://localhost:4200").unwrap())
    }
}

async fn send(app: Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            request = request.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app.oneshot(request.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

#[tokio::test]
async fn test_health_reports_database() {
    let (status, body) = send(TestApp::new().router(), Method::GET, "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"]["status"], "healthy");
}

#[tokio::test]
async fn test_health_degraded_when_database_down() {
    let mut app = TestApp::new();
    app.store = MockStoreHealth::new();
    app.store
        .expect_check()
        .returning(|| Err(AppError::service_unavailable("database")));

    let (status, body) = send(app.router(), Method::GET, "/health", None).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], "degraded");
}

#[tokio::test]
async fn test_root_lists_endpoints() {
    let (status, body) = send(TestApp::new().router(), Method::GET, "/", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["endpoints"]["houses"], "/api/houses");
}

#[tokio::test]
async fn test_create_house_returns_created() {
    let mut app = TestApp::new();
    app.houses
        .expect_create_house()
        .returning(|request| Ok(House::new(request.name, request.address)));

    let (status, body) = send(
        app.router(),
        Method::POST,
        "/api/houses",
        Some(json!({"name": "Lake House", "address": "12 Shore Road"})),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["name"], "Lake House");
    assert!(body.get("createdAt").is_some());
}

#[tokio::test]
async fn test_overlong_house_name_is_rejected() {
    let mut app = TestApp::new();
    app.houses.expect_create_house().never();

    let (status, body) = send(
        app.router(),
        Method::POST,
        "/api/houses",
        Some(json!({"name": "x".repeat(201), "address": "12 Shore Road"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_get_missing_house_is_not_found() {
    let mut app = TestApp::new();
    app.houses
        .expect_get_house()
        .returning(|_| Err(AppError::NotFound));

    let uri = format!("/api/houses/{}", Uuid::new_v4());
    let (status, body) = send(app.router(), Method::GET, &uri, None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_delete_house_status_codes() {
    let existing = Uuid::new_v4();
    let mut app = TestApp::new();
    app.houses
        .expect_delete_house()
        .returning(move |id| Ok(id == existing));
    let router = app.router();

    let (status, _) = send(router.clone(), Method::DELETE, &format!("/api/houses/{}", existing), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(router, Method::DELETE, &format!("/api/houses/{}", Uuid::new_v4()), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_room_with_devices_conflicts() {
    let mut app = TestApp::new();
    app.rooms
        .expect_delete_room()
        .returning(|_| Err(AppError::conflict("Room has 1 device(s); move or delete them first")));

    let uri = format!("/api/rooms/{}", Uuid::new_v4());
    let (status, body) = send(app.router(), Method::DELETE, &uri, None).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "CONFLICT");
}

#[tokio::test]
async fn test_list_rooms_passes_house_filter() {
    let house_id = Uuid::new_v4();
    let mut app = TestApp::new();
    app.rooms
        .expect_list_rooms()
        .with(eq(Some(house_id)))
        .returning(|_| Ok(vec![]));

    let uri = format!("/api/rooms?houseId={}", house_id);
    let (status, body) = send(app.router(), Method::GET, &uri, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_range_query_parses_dates() {
    let device_id = Uuid::new_v4();
    let mut app = TestApp::new();
    app.sensor_data
        .expect_list_by_device_in_range()
        .withf(move |id, start, end| {
            *id == device_id
                && start.to_rfc3339() == "2025-03-01T00:00:00+00:00"
                && end.to_rfc3339() == "2025-03-02T12:00:00+00:00"
        })
        .returning(|device_id, start, _| Ok(vec![SensorData::new(device_id, start)]));

    let uri = format!(
        "/api/sensordata/device/{}/range?startDate=2025-03-01&endDate=2025-03-02T12:00:00",
        device_id
    );
    let (status, body) = send(app.router(), Method::GET, &uri, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().map(Vec::len), Some(1));
    assert_eq!(body[0]["deviceId"], device_id.to_string());
}

#[tokio::test]
async fn test_range_query_requires_dates() {
    let mut app = TestApp::new();
    app.sensor_data.expect_list_by_device_in_range().never();

    let uri = format!("/api/sensordata/device/{}/range?startDate=2025-03-01", Uuid::new_v4());
    let (status, body) = send(app.router(), Method::GET, &uri, None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "endDate is required");
}

#[tokio::test]
async fn test_cleanup_reports_deleted_count() {
    let mut app = TestApp::new();
    app.sensor_data.expect_cleanup().returning(|_| Ok(7));

    let (status, body) = send(
        app.router(),
        Method::DELETE,
        "/api/sensordata/cleanup?olderThan=2025-01-31",
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["deletedCount"], 7);
    assert_eq!(
        body["message"],
        "Deleted 7 sensor data records older than 2025-01-31."
    );
}

#[tokio::test]
async fn test_dashboard_stats() {
    let mut app = TestApp::new();
    app.dashboard
        .expect_stats()
        .returning(|| Ok(DashboardStats::new(1, 3, 4, 3)));

    let (status, body) = send(app.router(), Method::GET, "/api/dashboard/stats", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalDevices"], 4);
    assert_eq!(body["inactiveDevices"], 1);
    assert_eq!(body["activeDevicePercentage"], 75.0);
}

#[tokio::test]
async fn test_cors_allows_dashboard_origin() {
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/houses")
        .header(header::ORIGIN, "http://localhost:4200")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .body(Body::empty())
        .unwrap();

    let response = TestApp::new().router().oneshot(request).await.unwrap();

    let headers = response.headers();
    assert_eq!(
        headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "http://localhost:4200"
    );
    assert_eq!(
        headers.get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS).unwrap(),
        "true"
    );
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let (status, body) = send(TestApp::new().router(), Method::GET, "/api-docs/openapi.json", None).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"].get("/api/houses").is_some());
    assert!(body["paths"].get("/api/sensordata/cleanup").is_some());
    assert_eq!(
        body["components"]["schemas"]["MqttSensorDataRequest"]["properties"]["sensorId"]["example"],
        "sensor_001"
    );
}

#[tokio::test]
async fn test_from_mqtt_rejects_overlong_sensor_name() {
    let mut app = TestApp::new();
    app.sensor_data.expect_create_from_mqtt().never();

    let (status, body) = send(
        app.router(),
        Method::POST,
        "/api/sensordata/from-mqtt",
        Some(json!({"sensorId": "sensor_001", "sensorName": "N".repeat(201)})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert_eq!(
        body["error"]["message"],
        "Sensor name must be at most 200 characters"
    );
}

#[tokio::test]
async fn test_create_sensor_data_accepts_naive_timestamp() {
    let device_id = Uuid::new_v4();
    let mut app = TestApp::new();
    app.sensor_data
        .expect_create_sensor_data()
        .withf(|request| {
            request.timestamp.map(|t| t.to_rfc3339()).as_deref()
                == Some("2025-03-01T12:00:00+00:00")
        })
        .returning(|request| {
            Ok(SensorData::new(
                request.device_id,
                request.timestamp.unwrap_or_default(),
            ))
        });

    let (status, body) = send(
        app.router(),
        Method::POST,
        "/api/sensordata",
        Some(json!({"deviceId": device_id, "temperature": 20.5, "timestamp": "2025-03-01T12:00:00"})),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["deviceId"], device_id.to_string());
}
