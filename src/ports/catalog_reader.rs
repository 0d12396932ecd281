//! Catalog reader port (read-only).
//!
//! Series and modules are looked up by name because videos reference them
//! by name; implementations must back these lookups with the unique name
//! indexes rather than scans.

use async_trait::async_trait;

use crate::domain::catalog::{Module, Series, Video, VideoSummary};
use crate::domain::foundation::{DomainError, VideoId};

/// Read access to videos and their groupings.
#[async_trait]
pub trait CatalogReader: Send + Sync {
    /// Fetch a video. `Ok(None)` if it does not exist.
    async fn get_video(&self, id: VideoId) -> Result<Option<Video>, DomainError>;

    /// Fetch a series by its unique name.
    async fn get_series_by_name(&self, name: &str) -> Result<Option<Series>, DomainError>;

    /// Fetch a module by its unique name.
    async fn get_module_by_name(&self, name: &str) -> Result<Option<Module>, DomainError>;

    /// List every video, ordered by id.
    async fn list_videos(&self) -> Result<Vec<VideoSummary>, DomainError>;
}
