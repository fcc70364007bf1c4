// src/handlers/health.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::config::AppState;

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HealthStatus {
    pub status: &'static str,
    pub version: &'static str,
    pub fetch_timeout_secs: u64,
}

// GET /api/health
#[utoipa::path(
    get,
    path = "/api/health",
    tag = "Health",
    responses(
        (status = 200, description = "Serviço no ar", body = HealthStatus)
    )
)]
pub async fn health(State(app_state): State<AppState>) -> impl IntoResponse {
    let status = HealthStatus {
        status: "OK",
        version: env!("CARGO_PKG_VERSION"),
        fetch_timeout_secs: app_state.config.fetch_timeout.as_secs(),
    };
    (StatusCode::OK, Json(status))
}
