//! Dashboard handlers.

use axum::{extract::State, response::Json, routing::get, Router};

use common::AppResult;
use domain::DashboardStats;

use crate::state::AppState;

/// Create dashboard routes
pub fn dashboard_routes() -> Router<AppState> {
    Router::new().route("/stats", get(get_stats))
}

/// Fleet-wide counters
#[utoipa::path(
    get,
    path = "/api/dashboard/stats",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Current totals", body = DashboardStats)
    )
)]
pub async fn get_stats(State(state): State<AppState>) -> AppResult<Json<DashboardStats>> {
    Ok(Json(state.dashboard.stats().await?))
}
