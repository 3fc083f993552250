pub mod api;
pub mod cookie;
pub mod health;
pub mod pages;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::state::AppState;

/// Upper bound on any request body: a just-under-limit image plus multipart
/// framing, or its base64 expansion on the JSON API. The per-image limit itself
/// is enforced by the intake module.
pub const MAX_REQUEST_BODY_BYTES: usize = 16 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Views
        .route("/", get(pages::handle_landing))
        .route("/analyze", get(pages::handle_analyze_view))
        .route("/analyze/image", get(pages::handle_image))
        .route("/analyze/upload", post(pages::handle_upload))
        .route("/analyze/run", post(pages::handle_run))
        .route("/analyze/clear", post(pages::handle_clear))
        // JSON API
        .route("/api/v1/analyze", post(api::handle_analyze))
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BODY_BYTES))
        .with_state(state)
}
