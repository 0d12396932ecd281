//! JSON shapes for catalog endpoints.

use serde::{Deserialize, Serialize};

use crate::domain::catalog::{Video, VideoSummary};

/// Response for the video listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoListResponse {
    pub videos: Vec<VideoSummary>,
}

/// Response for a single video.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoResponse {
    pub video: Video,
}
