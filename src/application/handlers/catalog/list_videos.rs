//! ListVideosHandler - Query handler for the catalog listing.

use std::sync::Arc;

use crate::domain::catalog::VideoSummary;
use crate::domain::entitlement::EntitlementError;
use crate::ports::CatalogReader;

/// Handler for listing videos.
///
/// Listing is open to everyone; access is resolved per video on playback.
pub struct ListVideosHandler {
    catalog: Arc<dyn CatalogReader>,
}

impl ListVideosHandler {
    pub fn new(catalog: Arc<dyn CatalogReader>) -> Self {
        Self { catalog }
    }

    pub async fn handle(&self) -> Result<Vec<VideoSummary>, EntitlementError> {
        Ok(self.catalog.list_videos().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::*;

    #[tokio::test]
    async fn lists_every_video_with_premium_marker() {
        let fx = Fixture::new().await;
        let handler = ListVideosHandler::new(fx.catalog.clone());

        let videos = handler.handle().await.unwrap();

        assert_eq!(videos.len(), 3);
        assert_eq!(videos[0].id, FREE_VIDEO);
        assert!(!videos[0].is_premium);
        assert!(videos[1].is_premium);
    }

    #[tokio::test]
    async fn catalog_failure_is_infrastructure() {
        let fx = Fixture::new().await;
        fx.catalog.set_failing(true);
        let handler = ListVideosHandler::new(fx.catalog.clone());

        assert!(matches!(
            handler.handle().await,
            Err(EntitlementError::Infrastructure(_))
        ));
    }
}
