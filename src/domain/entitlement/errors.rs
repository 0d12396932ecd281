//! Entitlement-specific error types.
//!
//! # HTTP Status Mapping
//!
//! | Error | HTTP Status |
//! |-------|-------------|
//! | NotFound | 404 |
//! | CustomerNotProvisioned | 402 |
//! | NoMainSubscription | 402 |
//! | BillingFailed | 402 |
//! | PricingUnavailable | 503 |
//! | InvalidPurchaseKind | 400 |
//! | ValidationFailed | 400 |
//! | Infrastructure | 500 |

use crate::domain::foundation::{DomainError, ErrorCode, UserId};

/// Errors raised by access resolution, purchase recording and account billing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntitlementError {
    /// A referenced video, series, module or user does not exist.
    NotFound { resource: String, id: String },

    /// The price oracle could not price an option.
    ///
    /// The options listing recovers from this by omitting the option.
    PricingUnavailable { price_id: String, reason: String },

    /// The user has no payment processor customer yet.
    CustomerNotProvisioned(UserId),

    /// The user has no main subscription to bill line items against.
    NoMainSubscription(UserId),

    /// The processor rejected or failed the billing call.
    BillingFailed { reason: String },

    /// Purchase kind is not one of video, series, module.
    InvalidPurchaseKind(String),

    /// Validation failed.
    ValidationFailed { field: String, message: String },

    /// Infrastructure error.
    Infrastructure(String),
}

impl EntitlementError {
    pub fn not_found(resource: impl Into<String>, id: impl ToString) -> Self {
        EntitlementError::NotFound {
            resource: resource.into(),
            id: id.to_string(),
        }
    }

    pub fn pricing_unavailable(price_id: impl Into<String>, reason: impl Into<String>) -> Self {
        EntitlementError::PricingUnavailable {
            price_id: price_id.into(),
            reason: reason.into(),
        }
    }

    pub fn customer_not_provisioned(user_id: UserId) -> Self {
        EntitlementError::CustomerNotProvisioned(user_id)
    }

    pub fn no_main_subscription(user_id: UserId) -> Self {
        EntitlementError::NoMainSubscription(user_id)
    }

    pub fn billing_failed(reason: impl Into<String>) -> Self {
        EntitlementError::BillingFailed {
            reason: reason.into(),
        }
    }

    pub fn invalid_purchase_kind(kind: impl Into<String>) -> Self {
        EntitlementError::InvalidPurchaseKind(kind.into())
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        EntitlementError::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        EntitlementError::Infrastructure(message.into())
    }

    /// Stable machine-readable code for API responses.
    pub fn code(&self) -> &'static str {
        match self {
            EntitlementError::NotFound { .. } => "NOT_FOUND",
            EntitlementError::PricingUnavailable { .. } => "PRICING_UNAVAILABLE",
            EntitlementError::CustomerNotProvisioned(_) => "CUSTOMER_NOT_PROVISIONED",
            EntitlementError::NoMainSubscription(_) => "NO_MAIN_SUBSCRIPTION",
            EntitlementError::BillingFailed { .. } => "BILLING_FAILED",
            EntitlementError::InvalidPurchaseKind(_) => "INVALID_PURCHASE_KIND",
            EntitlementError::ValidationFailed { .. } => "VALIDATION_FAILED",
            EntitlementError::Infrastructure(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns a user-friendly error message.
    pub fn message(&self) -> String {
        match self {
            EntitlementError::NotFound { resource, id } => {
                format!("{} not found: {}", resource, id)
            }
            EntitlementError::PricingUnavailable { price_id, reason } => {
                format!("Price {} is unavailable: {}", price_id, reason)
            }
            EntitlementError::CustomerNotProvisioned(user_id) => format!(
                "User {} has no billing account; add a payment method first",
                user_id
            ),
            EntitlementError::NoMainSubscription(user_id) => format!(
                "User {} has no active main subscription; add a payment method first",
                user_id
            ),
            EntitlementError::BillingFailed { reason } => format!("Billing failed: {}", reason),
            EntitlementError::InvalidPurchaseKind(kind) => {
                format!("Invalid purchase type: {}", kind)
            }
            EntitlementError::ValidationFailed { field, message } => {
                format!("Validation failed for '{}': {}", field, message)
            }
            EntitlementError::Infrastructure(msg) => format!("Error: {}", msg),
        }
    }

    /// True for precondition failures the user can fix by adding a payment method.
    pub fn is_user_actionable(&self) -> bool {
        matches!(
            self,
            EntitlementError::CustomerNotProvisioned(_) | EntitlementError::NoMainSubscription(_)
        )
    }
}

impl std::fmt::Display for EntitlementError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for EntitlementError {}

impl From<DomainError> for EntitlementError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::NotFound => EntitlementError::NotFound {
                resource: err
                    .details
                    .get("resource")
                    .cloned()
                    .unwrap_or_else(|| "Resource".to_string()),
                id: err.details.get("id").cloned().unwrap_or_default(),
            },
            ErrorCode::ValidationFailed => EntitlementError::ValidationFailed {
                field: err
                    .details
                    .get("field")
                    .cloned()
                    .unwrap_or_else(|| "unknown".to_string()),
                message: err.message,
            },
            _ => EntitlementError::Infrastructure(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_formats_resource_and_id() {
        let err = EntitlementError::not_found("Video", 7);
        assert_eq!(err.code(), "NOT_FOUND");
        assert_eq!(err.to_string(), "Video not found: 7");
    }

    #[test]
    fn precondition_errors_are_user_actionable() {
        let user = UserId::new(4);
        assert!(EntitlementError::customer_not_provisioned(user).is_user_actionable());
        assert!(EntitlementError::no_main_subscription(user).is_user_actionable());
        assert!(!EntitlementError::billing_failed("card_declined").is_user_actionable());
    }

    #[test]
    fn billing_failed_keeps_processor_detail() {
        let err = EntitlementError::billing_failed("Your card was declined.");
        assert_eq!(err.code(), "BILLING_FAILED");
        assert!(err.to_string().contains("Your card was declined."));
    }

    #[test]
    fn invalid_kind_message_names_kind() {
        let err = EntitlementError::invalid_purchase_kind("bundle");
        assert_eq!(err.code(), "INVALID_PURCHASE_KIND");
        assert!(err.message().contains("bundle"));
    }

    #[test]
    fn database_domain_error_becomes_infrastructure() {
        let err: EntitlementError = DomainError::database("pool timed out").into();
        assert!(matches!(err, EntitlementError::Infrastructure(ref m) if m.contains("pool timed out")));
    }

    #[test]
    fn validation_domain_error_keeps_field() {
        let err: EntitlementError = DomainError::validation("price_id", "mismatch").into();
        assert_eq!(
            err,
            EntitlementError::ValidationFailed {
                field: "price_id".to_string(),
                message: "mismatch".to_string(),
            }
        );
    }
}
