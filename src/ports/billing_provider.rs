//! Billing provider port for the external payment processor.
//!
//! The processor is the source of truth for money collected. Every call
//! here is a single processor mutation or read; none is retried
//! automatically, because a retried charge can bill twice.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::foundation::{DomainError, ErrorCode, Timestamp};

/// Port for processor-side billing actions.
#[async_trait]
pub trait BillingProvider: Send + Sync {
    /// Create a processor customer for an account.
    async fn create_customer(&self, email: &str) -> Result<Customer, BillingError>;

    /// Open a setup-mode checkout session for attaching a card.
    async fn create_setup_session(
        &self,
        request: SetupSessionRequest,
    ) -> Result<CheckoutSession, BillingError>;

    /// Open a self-service billing portal session.
    async fn create_portal_session(
        &self,
        customer_id: &str,
        return_url: &str,
    ) -> Result<PortalSession, BillingError>;

    /// Bill a one-time price as a line item on the next invoice of the main subscription.
    async fn add_line_item_to_main_subscription(
        &self,
        request: LineItemRequest,
    ) -> Result<BillingReceipt, BillingError>;

    /// Charge a one-time price to the customer's default payment method now.
    async fn create_immediate_charge(
        &self,
        request: ImmediateChargeRequest,
    ) -> Result<BillingReceipt, BillingError>;

    /// Start a recurring subscription for a module price.
    async fn create_module_subscription(
        &self,
        request: ModuleSubscriptionRequest,
    ) -> Result<ProcessorSubscription, BillingError>;

    /// Number of card payment methods attached to the customer.
    async fn count_payment_methods(&self, customer_id: &str) -> Result<usize, BillingError>;
}

/// Customer in the payment system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: String,
    pub email: Option<String>,
}

/// Request for a setup-mode checkout session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetupSessionRequest {
    pub customer_id: String,
    pub success_url: String,
    pub cancel_url: String,
}

/// Hosted checkout session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutSession {
    pub id: String,
    /// URL to redirect the customer to.
    pub url: String,
}

/// Hosted billing portal session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortalSession {
    pub id: String,
    pub url: String,
}

/// A one-time price billed against the main subscription.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItemRequest {
    pub customer_id: String,
    /// The main subscription the item is invoiced with.
    pub subscription_id: String,
    pub price_id: String,
    pub description: String,
}

/// A one-time price charged immediately.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImmediateChargeRequest {
    pub customer_id: String,
    pub price_id: String,
    pub description: String,
}

/// Processor reference for a completed billing action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingReceipt {
    /// Invoice item or invoice id.
    pub reference: String,
}

/// Request for a new module subscription.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleSubscriptionRequest {
    pub customer_id: String,
    pub price_id: String,
    /// First billing boundary. No proration is applied before it.
    pub billing_cycle_anchor: Timestamp,
    /// Attached to the processor subscription and echoed back in webhooks.
    pub metadata: BTreeMap<String, String>,
}

/// Subscription created at the processor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessorSubscription {
    pub id: String,
    pub customer_id: String,
    /// Raw processor status string.
    pub status: String,
}

/// Billing provider errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingError {
    pub code: BillingErrorCode,

    /// Human-readable message, passed through to the caller verbatim.
    pub message: String,

    /// Processor's own error code (if available).
    pub provider_code: Option<String>,

    /// Whether the operation can be retried.
    pub retryable: bool,
}

impl BillingError {
    pub fn new(code: BillingErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            provider_code: None,
            retryable: code.is_retryable(),
        }
    }

    pub fn with_provider_code(mut self, code: impl Into<String>) -> Self {
        self.provider_code = Some(code.into());
        self
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(BillingErrorCode::NetworkError, message)
    }

    pub fn authentication(message: impl Into<String>) -> Self {
        Self::new(BillingErrorCode::AuthenticationError, message)
    }

    pub fn card_declined(message: impl Into<String>) -> Self {
        Self::new(BillingErrorCode::CardDeclined, message)
    }

    pub fn not_found(resource: &str) -> Self {
        Self::new(BillingErrorCode::NotFound, format!("{} not found", resource))
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(BillingErrorCode::InvalidRequest, message)
    }

    pub fn provider(message: impl Into<String>) -> Self {
        Self::new(BillingErrorCode::ProviderError, message)
    }
}

impl std::fmt::Display for BillingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for BillingError {}

impl From<BillingError> for DomainError {
    fn from(err: BillingError) -> Self {
        let code = match err.code {
            BillingErrorCode::NotFound => ErrorCode::NotFound,
            BillingErrorCode::InvalidRequest => ErrorCode::ValidationFailed,
            _ => ErrorCode::ExternalServiceError,
        };
        DomainError::new(code, err.message)
    }
}

/// Billing error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BillingErrorCode {
    NetworkError,
    AuthenticationError,
    CardDeclined,
    NotFound,
    InvalidRequest,
    RateLimitExceeded,
    ProviderError,
}

impl BillingErrorCode {
    /// Transient failures. Reported to callers; never retried here.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            BillingErrorCode::NetworkError | BillingErrorCode::RateLimitExceeded
        )
    }
}

impl std::fmt::Display for BillingErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            BillingErrorCode::NetworkError => "network_error",
            BillingErrorCode::AuthenticationError => "authentication_error",
            BillingErrorCode::CardDeclined => "card_declined",
            BillingErrorCode::NotFound => "not_found",
            BillingErrorCode::InvalidRequest => "invalid_request",
            BillingErrorCode::RateLimitExceeded => "rate_limit_exceeded",
            BillingErrorCode::ProviderError => "provider_error",
        };
        write!(f, "{}", s)
    }
}
