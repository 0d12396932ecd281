//! Route table for account endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{create_portal_session, get_account, start_payment_setup, verify_payment_method};
use crate::adapters::http::state::AppState;

/// Account routes, mounted under `/api/account`.
pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(get_account))
        .route("/payment-setup", post(start_payment_setup))
        .route("/portal", post(create_portal_session))
        .route("/payment-method", get(verify_payment_method))
}
