//! GetVideoHandler - Query handler for one catalog entry.

use std::sync::Arc;

use crate::domain::catalog::Video;
use crate::domain::entitlement::EntitlementError;
use crate::domain::foundation::VideoId;
use crate::ports::CatalogReader;

#[derive(Debug, Clone)]
pub struct GetVideoQuery {
    pub video_id: VideoId,
}

/// Handler for getting a video.
pub struct GetVideoHandler {
    catalog: Arc<dyn CatalogReader>,
}

impl GetVideoHandler {
    pub fn new(catalog: Arc<dyn CatalogReader>) -> Self {
        Self { catalog }
    }

    pub async fn handle(&self, query: GetVideoQuery) -> Result<Video, EntitlementError> {
        self.catalog
            .get_video(query.video_id)
            .await?
            .ok_or_else(|| EntitlementError::not_found("Video", query.video_id))
    }
}
