//! Route table for webhook endpoints.

use axum::{routing::post, Router};

use super::handlers::handle_stripe_webhook;
use crate::adapters::http::state::AppState;

/// Webhook routes, mounted under `/api/webhooks`.
pub fn webhook_routes() -> Router<AppState> {
    Router::new().route("/stripe", post(handle_stripe_webhook))
}
