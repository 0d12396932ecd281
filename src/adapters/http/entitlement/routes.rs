//! Route table for access and purchase endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{check_access, list_purchase_options, record_purchase};
use crate::adapters::http::state::AppState;

/// Entitlement routes, mounted under `/api`. All require a caller identity.
pub fn entitlement_routes() -> Router<AppState> {
    Router::new()
        .route("/videos/:id/access", get(check_access))
        .route("/videos/:id/purchase-options", get(list_purchase_options))
        .route("/purchases", post(record_purchase))
}
