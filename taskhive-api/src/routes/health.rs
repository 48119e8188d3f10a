/// Health check endpoint
///
/// # Endpoints
///
/// - `GET /health` - Service and database health

use crate::app::AppState;
use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use taskhive_shared::db::pool;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Overall status: "ok" or "degraded"
    pub status: &'static str,

    /// Whether the database responded
    pub database: bool,

    /// Service version
    pub version: &'static str,
}

/// Reports service health, including database connectivity
///
/// Returns 200 with `"status": "ok"` when the database responds, 503 with
/// `"status": "degraded"` when it doesn't.
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let database = pool::health_check(&state.db).await.is_ok();

    let (status_code, status) = if database {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded")
    };

    (
        status_code,
        Json(HealthResponse {
            status,
            database,
            version: taskhive_shared::VERSION,
        }),
    )
}
