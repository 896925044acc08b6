use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::handlers::{
    AppState, borrow_media, create_media, download_media, get_media, list_media, media_action,
};

/// Creates the API router with all media catalog endpoints
///
/// Query endpoints:
/// - GET /media - List all media grouped by type
/// - GET /media/:media_type/:id - Media details with available actions
///
/// Command endpoints:
/// - POST /media - Register a new item
/// - POST /media/:media_type/:id/action - Dispatch an action through the type's action table
/// - POST /media/:media_type/:id/borrow - Borrow (borrowable types only)
/// - POST /media/:media_type/:id/download - Download (downloadable types only)
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health check endpoint
        .route("/health", get(health_check))
        .route("/media", get(list_media).post(create_media))
        .route("/media/:media_type/:id", get(get_media))
        .route("/media/:media_type/:id/action", post(media_action))
        .route("/media/:media_type/:id/borrow", post(borrow_media))
        .route("/media/:media_type/:id/download", post(download_media))
        // Add tracing middleware
        .layer(TraceLayer::new_for_http())
        // Add application state
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
