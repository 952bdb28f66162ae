//! GET /health: liveness probe.

use axum::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Always `{"status":"ok"}`; touches neither the store nor the model.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}
