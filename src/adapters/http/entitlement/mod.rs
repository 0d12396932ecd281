//! HTTP adapter for access checks and purchases.
//!
//! - `GET /api/videos/:id/access` - Can the caller watch this video
//! - `GET /api/videos/:id/purchase-options` - What the caller can still buy
//! - `POST /api/purchases` - Record a purchase and bill it

pub mod dto;
pub mod handlers;
pub mod routes;

pub use dto::*;
pub use routes::entitlement_routes;
