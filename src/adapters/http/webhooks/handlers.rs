//! Axum handler for Stripe webhook deliveries.

use axum::{
    body::Bytes,
    extract::State,
    http::HeaderMap,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::adapters::http::error::WebhookApiError;
use crate::adapters::http::state::AppState;
use crate::application::handlers::HandleBillingWebhookCommand;
use crate::domain::billing::WebhookError;

pub const STRIPE_SIGNATURE_HEADER: &str = "Stripe-Signature";

/// Acknowledgement body. Any 2xx stops processor retries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookAck {
    pub received: bool,
    pub event_id: String,
}

/// POST /api/webhooks/stripe
///
/// The raw body is passed through untouched; the signature covers its exact bytes.
pub async fn handle_stripe_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, WebhookApiError> {
    let signature = headers
        .get(STRIPE_SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or(WebhookError::MissingSignatureHeader)?;

    let cmd = HandleBillingWebhookCommand {
        payload: body.to_vec(),
        signature: signature.to_string(),
    };

    let result = state.webhook_handler().handle(cmd).await?;
    tracing::info!(
        event_id = %result.event_id,
        event_type = %result.event_type,
        outcome = ?result.outcome,
        "Webhook processed"
    );

    Ok(Json(WebhookAck {
        received: true,
        event_id: result.event_id,
    }))
}
