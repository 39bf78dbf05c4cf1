//! Route table and router assembly.

use crate::AppState;
use crate::auth;
use crate::response::ApiResponse;
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::middleware::from_fn_with_state;
use axum::response::Json as ResponseJson;
use axum::routing::{get, post};
use std::path::Path;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

pub mod design;
pub mod story;

/// Max accepted upload size (10 MB, matching the upload gateway cap).
const UPLOAD_BODY_LIMIT: usize = 10 * 1024 * 1024;

/// Assemble the full application router.
///
/// `media_root` is served statically under `/media` so stored blob URLs
/// resolve.
pub fn router(state: AppState, media_root: &Path) -> Router {
    let protected = Router::new()
        .route(
            "/design/upload",
            post(design::upload_design).layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        .route("/design/generate", post(design::generate_designs))
        .route("/design", get(design::list_designs))
        .route("/design/:id", get(design::get_design))
        .route("/story/generate", post(story::generate_story))
        .route("/story/captions", post(story::platform_captions))
        .route("/story", get(story::list_stories))
        .route("/story/:id", get(story::get_story))
        .route_layer(from_fn_with_state(state.clone(), auth::require_auth));

    Router::new()
        .route("/health", get(health))
        .merge(protected)
        .nest_service("/media", ServeDir::new(media_root))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Liveness probe.
async fn health() -> ResponseJson<ApiResponse<serde_json::Value>> {
    ResponseJson(ApiResponse::success(serde_json::json!({
        "service": "karigari",
        "status": "ok",
    })))
}
