//! Catalog browsing handlers.

mod get_video;
mod list_videos;

pub use get_video::{GetVideoHandler, GetVideoQuery};
pub use list_videos::ListVideosHandler;
