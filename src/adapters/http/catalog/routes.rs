//! Route table for catalog endpoints.

use axum::{routing::get, Router};

use super::handlers::{get_video, list_videos};
use crate::adapters::http::state::AppState;

/// Catalog routes, mounted under `/api`.
pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/videos", get(list_videos))
        .route("/videos/:id", get(get_video))
}
