//! HTTP adapter for payment processor webhooks.
//!
//! - `POST /api/webhooks/stripe` - Signed lifecycle notifications
//!
//! No caller identity; deliveries are authenticated by signature.

pub mod handlers;
pub mod routes;

pub use handlers::WebhookAck;
pub use routes::webhook_routes;
