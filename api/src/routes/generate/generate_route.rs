//! POST /api/generate: retrieval-augmented code generation.

use std::sync::Arc;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use code_generator::GenerateRequest;
use tracing::{debug, info};

use crate::{
    core::app_state::AppState,
    error_handler::AppResult,
    routes::generate::generate_response::GenerateResponse,
};

/// Handler: POST /api/generate
///
/// A model runtime failure still answers `200 OK`; the failure is described
/// in `output` and `error`. Snippet store failures answer `500`.
///
/// # Example
/// ```bash
/// curl -X POST http://127.0.0.1:8000/api/generate \
///   -H 'content-type: application/json' \
///   -d '{"prompt":"Create a simple Node.js Express server","code_type":"node"}'
/// ```
pub async fn generate_route(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> AppResult<Json<GenerateResponse>> {
    let Json(req) = payload?;
    debug!(
        n_results = req.n_results,
        code_type = ?req.code_type,
        "generate_route: start"
    );

    let generation = state.generator.generate(&req).await?;
    let response = GenerateResponse::from(generation);

    info!(
        used_context = response.used_context.len(),
        failed = response.error.is_some(),
        "generate_route: done"
    );
    Ok(Json(response))
}
