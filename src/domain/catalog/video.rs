//! Video catalog entries.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::VideoId;

/// A playable catalog entry.
///
/// `series` and `module` reference their groupings by name, matching the
/// unique name columns of the series and module tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Video {
    pub id: VideoId,
    pub title: String,
    /// External playback reference (hosted player id).
    pub playback_ref: String,
    pub is_premium: bool,
    /// Processor price for a one-time purchase of this video alone.
    pub price_id: Option<String>,
    pub series: Option<String>,
    /// Module (content vertical) this video belongs to.
    pub module: Option<String>,
}

impl Video {
    /// Series name, treating an empty string the same as no series.
    pub fn series_name(&self) -> Option<&str> {
        non_empty(self.series.as_deref())
    }

    /// Module name, treating an empty string the same as no module.
    pub fn module_name(&self) -> Option<&str> {
        non_empty(self.module.as_deref())
    }

    /// One-time price reference, ignoring blank values.
    pub fn price_ref(&self) -> Option<&str> {
        non_empty(self.price_id.as_deref())
    }

    pub fn summary(&self) -> VideoSummary {
        VideoSummary {
            id: self.id,
            title: self.title.clone(),
            playback_ref: self.playback_ref.clone(),
            is_premium: self.is_premium,
        }
    }
}

/// Listing projection of a video.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoSummary {
    pub id: VideoId,
    pub title: String,
    pub playback_ref: String,
    pub is_premium: bool,
}

pub(crate) fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
