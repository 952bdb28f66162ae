//! HTTP surface of the code generation service.
//!
//! Routes:
//! - `GET  /health`       liveness probe
//! - `POST /api/generate` retrieval-augmented code generation

pub mod core;
mod error_handler;
mod routes;

pub use error_handler::{AppError, AppResult};

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tokio::signal;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};

use crate::core::{app_config::ApiConfig, app_state::AppState};
use crate::routes::{generate::generate_route::generate_route, health_route::health};

/// Builds the application router with CORS and request tracing.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/generate", post(generate_route))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::very_permissive())
        .with_state(Arc::new(state))
}

/// Binds `cfg.address` and serves until Ctrl+C.
pub async fn start(cfg: ApiConfig, state: AppState) -> Result<(), AppError> {
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(cfg.address)
        .await
        .map_err(AppError::Bind)?;
    info!(address = %cfg.address, "api listening");

    // Start server with graceful shutdown on Ctrl+C
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(AppError::Server)?;

    info!("api stopped");
    Ok(())
}

/// Resolves when Ctrl+C is pressed.
async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        // Without a signal handler the server keeps running until killed.
        error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
