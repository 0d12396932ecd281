//! In-memory catalog.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use super::unavailable;
use crate::domain::catalog::{Module, Series, Video, VideoSummary};
use crate::domain::foundation::{DomainError, ModuleId, SeriesId, VideoId};
use crate::ports::CatalogReader;

/// In-memory implementation of the `CatalogReader` port.
#[derive(Default)]
pub struct InMemoryCatalog {
    videos: Mutex<BTreeMap<VideoId, Video>>,
    series: Mutex<BTreeMap<String, Series>>,
    modules: Mutex<BTreeMap<String, Module>>,
    failing: AtomicBool,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a video.
    pub fn add_video(&self, video: Video) {
        self.videos.lock().unwrap().insert(video.id, video);
    }

    /// Adds or replaces a series, keyed by its unique name.
    pub fn add_series(&self, series: Series) {
        self.series
            .lock()
            .unwrap()
            .insert(series.name.clone(), series);
    }

    /// Adds or replaces a module, keyed by its unique name.
    pub fn add_module(&self, module: Module) {
        self.modules
            .lock()
            .unwrap()
            .insert(module.name.clone(), module);
    }

    /// Makes every subsequent read fail with a database error.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub(crate) fn series_id(&self, name: &str) -> Option<SeriesId> {
        self.series.lock().unwrap().get(name).map(|s| s.id)
    }

    pub(crate) fn module_id(&self, name: &str) -> Option<ModuleId> {
        self.modules.lock().unwrap().get(name).map(|m| m.id)
    }

    fn check(&self) -> Result<(), DomainError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(unavailable());
        }
        Ok(())
    }
}

#[async_trait]
impl CatalogReader for InMemoryCatalog {
    async fn get_video(&self, id: VideoId) -> Result<Option<Video>, DomainError> {
        self.check()?;
        Ok(self.videos.lock().unwrap().get(&id).cloned())
    }

    async fn get_series_by_name(&self, name: &str) -> Result<Option<Series>, DomainError> {
        self.check()?;
        Ok(self.series.lock().unwrap().get(name).cloned())
    }

    async fn get_module_by_name(&self, name: &str) -> Result<Option<Module>, DomainError> {
        self.check()?;
        Ok(self.modules.lock().unwrap().get(name).cloned())
    }

    async fn list_videos(&self) -> Result<Vec<VideoSummary>, DomainError> {
        self.check()?;
        Ok(self
            .videos
            .lock()
            .unwrap()
            .values()
            .map(Video::summary)
            .collect())
    }
}
