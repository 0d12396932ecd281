//! Webhook error types for Stripe webhook handling.
//!
//! Status codes decide whether Stripe redelivers: anything other than 2xx
//! is retried with backoff, so storage failures map to 5xx and malformed
//! deliveries map to 4xx.

use http::StatusCode;
use thiserror::Error;

use crate::domain::foundation::DomainError;

/// Errors that occur during webhook verification and reconciliation.
#[derive(Debug, Error)]
pub enum WebhookError {
    /// The `Stripe-Signature` header was not sent.
    #[error("Missing Stripe-Signature header")]
    MissingSignatureHeader,

    /// Webhook signature verification failed.
    #[error("Invalid signature")]
    InvalidSignature,

    /// Webhook timestamp is older than the tolerance window.
    #[error("Timestamp out of range")]
    TimestampOutOfRange,

    /// Event timestamp is in the future beyond clock skew tolerance.
    #[error("Invalid timestamp")]
    InvalidTimestamp,

    /// Failed to parse webhook payload or signature header.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Required field missing from webhook payload.
    #[error("Missing field: {0}")]
    MissingField(&'static str),

    /// Ledger or account storage failed.
    #[error("Database error: {0}")]
    Database(String),

    /// A follow-up call to the payment processor failed.
    #[error("Payment provider error: {0}")]
    PaymentProvider(String),
}

impl WebhookError {
    /// Returns true if the failure is transient and a redelivery may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            WebhookError::Database(_) | WebhookError::PaymentProvider(_)
        )
    }

    /// Maps the error to an HTTP status code for the webhook response.
    pub fn status_code(&self) -> StatusCode {
        match self {
            WebhookError::MissingSignatureHeader
            | WebhookError::InvalidSignature
            | WebhookError::TimestampOutOfRange => StatusCode::UNAUTHORIZED,

            WebhookError::InvalidTimestamp
            | WebhookError::ParseError(_)
            | WebhookError::MissingField(_) => StatusCode::BAD_REQUEST,

            WebhookError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            WebhookError::PaymentProvider(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl From<DomainError> for WebhookError {
    fn from(err: DomainError) -> Self {
        WebhookError::Database(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn authentication_failures_are_unauthorized() {
        for err in [
            WebhookError::MissingSignatureHeader,
            WebhookError::InvalidSignature,
            WebhookError::TimestampOutOfRange,
        ] {
            assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
            assert!(!err.is_retryable());
        }
    }

    #[test]
    fn malformed_payloads_are_bad_requests() {
        assert_eq!(
            WebhookError::ParseError("eof".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            WebhookError::MissingField("customer").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(WebhookError::InvalidTimestamp.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn storage_failures_request_redelivery() {
        let err = WebhookError::Database("connection refused".to_string());
        assert!(err.is_retryable());
        assert!(err.status_code().is_server_error());
    }

    #[test]
    fn provider_failures_are_bad_gateway() {
        let err = WebhookError::PaymentProvider("timeout".to_string());
        assert!(err.is_retryable());
        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn display_includes_detail() {
        assert_eq!(
            WebhookError::MissingField("customer").to_string(),
            "Missing field: customer"
        );
        assert_eq!(
            WebhookError::Database("deadlock".to_string()).to_string(),
            "Database error: deadlock"
        );
    }
}
