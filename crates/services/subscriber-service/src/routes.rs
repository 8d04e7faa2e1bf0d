//! Route configuration.

use axum::{
    http::{header, HeaderValue, Method},
    routing::get,
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::handlers::{
    dashboard_routes, device_routes, health_routes, house_routes, room_routes,
    sensor_data_routes, service_info,
};
use crate::openapi::ApiDoc;
use crate::realtime::sensor_data_hub;
use crate::state::AppState;

/// CORS policy for the dashboard origin. Credentials are allowed, so the
/// origin, methods and headers are listed explicitly.
pub fn cors_layer(origin: &str) -> Result<CorsLayer, header::InvalidHeaderValue> {
    Ok(CorsLayer::new()
        .allow_origin(origin.parse::<HeaderValue>()?)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::AUTHORIZATION])
        .allow_credentials(true))
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/houses", house_routes())
        .nest("/rooms", room_routes())
        .nest("/devices", device_routes())
        .nest("/sensordata", sensor_data_routes())
        .nest("/dashboard", dashboard_routes())
}

/// Create the main router with all routes.
pub fn create_router(state: AppState, cors: CorsLayer) -> Router {
    Router::new()
        .route("/", get(service_info))
        .nest("/health", health_routes())
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest("/api", api_routes())
        // Real-time push channel
        .route("/sensor-data-hub", get(sensor_data_hub))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
