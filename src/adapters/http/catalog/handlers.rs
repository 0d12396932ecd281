//! Axum handlers for catalog endpoints.

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};

use super::dto::{VideoListResponse, VideoResponse};
use crate::adapters::http::error::ApiError;
use crate::adapters::http::state::AppState;
use crate::application::handlers::GetVideoQuery;
use crate::domain::foundation::VideoId;

/// GET /api/videos
pub async fn list_videos(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let videos = state.list_videos_handler().handle().await?;
    Ok(Json(VideoListResponse { videos }))
}

/// GET /api/videos/:id
pub async fn get_video(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let video_id: VideoId = id.parse()?;
    let video = state
        .get_video_handler()
        .handle(GetVideoQuery { video_id })
        .await?;
    Ok(Json(VideoResponse { video }))
}
