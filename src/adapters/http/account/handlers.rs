//! Axum handlers for account endpoints.

use axum::{extract::State, response::IntoResponse, Json};

use super::dto::{AccountResponse, PaymentMethodResponse, PaymentSetupRequest, RedirectResponse};
use crate::adapters::http::error::ApiError;
use crate::adapters::http::middleware::RequireUser;
use crate::adapters::http::state::AppState;
use crate::application::handlers::{
    CreatePortalSessionCommand, GetUserQuery, StartPaymentSetupCommand, VerifyPaymentMethodQuery,
};

/// GET /api/account
pub async fn get_account(
    State(state): State<AppState>,
    RequireUser(user_id): RequireUser,
) -> Result<impl IntoResponse, ApiError> {
    let user = state
        .get_user_handler()
        .handle(GetUserQuery { user_id })
        .await?;
    Ok(Json(AccountResponse::from(user)))
}

/// POST /api/account/payment-setup
///
/// The body is optional; without it the redirects point back at the account page.
pub async fn start_payment_setup(
    State(state): State<AppState>,
    RequireUser(user_id): RequireUser,
    body: Option<Json<PaymentSetupRequest>>,
) -> Result<impl IntoResponse, ApiError> {
    let req = body.map(|Json(req)| req).unwrap_or_default();
    let cmd = StartPaymentSetupCommand {
        user_id,
        success_url: req.success_url,
        cancel_url: req.cancel_url,
    };

    let result = state.payment_setup_handler().handle(cmd).await?;
    if result.customer_created {
        tracing::info!(user_id = %user_id, customer_id = %result.customer_id, "Billing customer created");
    }
    Ok(Json(RedirectResponse::from(result)))
}

/// POST /api/account/portal
pub async fn create_portal_session(
    State(state): State<AppState>,
    RequireUser(user_id): RequireUser,
) -> Result<impl IntoResponse, ApiError> {
    let session = state
        .portal_session_handler()
        .handle(CreatePortalSessionCommand { user_id })
        .await?;
    Ok(Json(RedirectResponse::from(session)))
}

/// GET /api/account/payment-method
pub async fn verify_payment_method(
    State(state): State<AppState>,
    RequireUser(user_id): RequireUser,
) -> Result<impl IntoResponse, ApiError> {
    let result = state
        .verify_payment_method_handler()
        .handle(VerifyPaymentMethodQuery { user_id })
        .await?;
    Ok(Json(PaymentMethodResponse {
        has_payment_method: result.has_payment_method,
    }))
}
