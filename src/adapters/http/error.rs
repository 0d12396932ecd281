//! Error responses for the HTTP layer.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::domain::billing::WebhookError;
use crate::domain::entitlement::EntitlementError;
use crate::domain::foundation::{DomainError, ValidationError};

/// JSON error body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Machine-readable error code.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

/// API error type that converts entitlement errors to HTTP responses.
#[derive(Debug)]
pub struct ApiError(pub EntitlementError);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            EntitlementError::NotFound { .. } => StatusCode::NOT_FOUND,
            EntitlementError::CustomerNotProvisioned(_)
            | EntitlementError::NoMainSubscription(_)
            | EntitlementError::BillingFailed { .. } => StatusCode::PAYMENT_REQUIRED,
            EntitlementError::InvalidPurchaseKind(_)
            | EntitlementError::ValidationFailed { .. } => StatusCode::BAD_REQUEST,
            EntitlementError::PricingUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            EntitlementError::Infrastructure(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<EntitlementError> for ApiError {
    fn from(err: EntitlementError) -> Self {
        Self(err)
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self(err.into())
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self(DomainError::from(err).into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(code = self.0.code(), error = %self.0, "Request failed");
        }

        // Infrastructure details stay in the logs.
        let message = match &self.0 {
            EntitlementError::Infrastructure(_) => "Internal error".to_string(),
            other => other.message(),
        };
        (status, Json(ErrorResponse::new(self.0.code(), message))).into_response()
    }
}

/// Webhook failures; the status code decides whether the processor retries.
#[derive(Debug)]
pub struct WebhookApiError(pub WebhookError);

impl From<WebhookError> for WebhookApiError {
    fn from(err: WebhookError) -> Self {
        Self(err)
    }
}

impl IntoResponse for WebhookApiError {
    fn into_response(self) -> Response {
        let status = self.0.status_code();
        if self.0.is_retryable() {
            tracing::error!(error = %self.0, "Webhook processing failed; processor will retry");
        } else {
            tracing::warn!(error = %self.0, "Webhook rejected");
        }

        let code = if status == StatusCode::UNAUTHORIZED {
            "INVALID_SIGNATURE"
        } else if status.is_client_error() {
            "INVALID_PAYLOAD"
        } else {
            "WEBHOOK_FAILED"
        };
        (status, Json(ErrorResponse::new(code, self.0.to_string()))).into_response()
    }
}
