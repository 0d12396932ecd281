//! HTTP adapter for catalog browsing.
//!
//! - `GET /api/videos` - List videos
//! - `GET /api/videos/:id` - Video detail

pub mod dto;
pub mod handlers;
pub mod routes;

pub use dto::*;
pub use routes::catalog_routes;
