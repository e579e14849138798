pub mod health;

use std::time::Duration;

use axum::{
    error_handling::HandleErrorLayer,
    extract::DefaultBodyLimit,
    routing::{get, post},
    BoxError, Router,
};
use tower::{timeout::error::Elapsed, timeout::TimeoutLayer, ServiceBuilder};

use crate::errors::AppError;
use crate::generation::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;
    let request_timeout = state.config.request_timeout;

    Router::new()
        .route("/health", get(health::health_handler))
        // Optimization API
        .route("/api/v1/optimize", post(handlers::handle_optimize_upload))
        .route("/api/v1/optimize/text", post(handlers::handle_optimize_text))
        .route("/api/v1/analyze", post(handlers::handle_analyze))
        .route("/api/v1/cover-letter", post(handlers::handle_cover_letter))
        // Downloads
        .route("/api/v1/export/:kind", post(handlers::handle_export))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(move |err: BoxError| async move {
                    timeout_error(err, request_timeout)
                }))
                .layer(TimeoutLayer::new(request_timeout)),
        )
        .with_state(state)
}

/// Renders middleware failures with the same JSON error body as handlers.
fn timeout_error(err: BoxError, request_timeout: Duration) -> AppError {
    if err.is::<Elapsed>() {
        AppError::Timeout(request_timeout.as_secs())
    } else {
        AppError::Internal(anyhow::anyhow!("Unhandled middleware error: {err}"))
    }
}
