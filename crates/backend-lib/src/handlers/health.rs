use axum::Json;
use tasklist_common::HealthStatus;

/// Liveness probe
pub async fn health() -> Json<HealthStatus> {
    Json(HealthStatus::ok())
}
