//! Catalog domain - videos and the groupings they are sold through.
//!
//! Catalog rows are written by administration tooling outside this service
//! and are read-only here.

mod grouping;
mod video;

pub use grouping::{Module, Series};
pub use video::{Video, VideoSummary};
