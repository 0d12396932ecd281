//! HTTP adapter for the caller's billing account.
//!
//! - `GET /api/account` - Profile and billing status
//! - `POST /api/account/payment-setup` - Start hosted card collection
//! - `POST /api/account/portal` - Open the hosted billing portal
//! - `GET /api/account/payment-method` - Re-check the processor for a saved card

pub mod dto;
pub mod handlers;
pub mod routes;

pub use dto::*;
pub use routes::account_routes;
