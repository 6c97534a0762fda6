//! Health check and dashboard.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use elegancia_core::DashboardStats;

use crate::auth::Caller;
use crate::error::ApiResult;
use crate::AppState;

/// Health check endpoint. No authentication.
pub async fn health() -> impl IntoResponse {
    "OK"
}

/// Headline numbers, any authenticated role.
pub async fn dashboard(State(state): State<AppState>, _caller: Caller) -> ApiResult<Json<DashboardStats>> {
    Ok(Json(state.db.reports().dashboard().await?))
}
