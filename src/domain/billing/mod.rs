//! Payment processor event model.
//!
//! Lifecycle notifications arrive as signed Stripe webhook deliveries. This
//! module authenticates them and exposes the handful of payload fields that
//! entitlement reconciliation reads.

mod stripe_event;
mod webhook_errors;
mod webhook_verifier;

pub use stripe_event::{
    CustomerObject, InvoiceObject, PaymentMethodObject, StripeEvent, StripeEventData,
    StripeEventType, SubscriptionObject,
};
pub use webhook_errors::WebhookError;
pub use webhook_verifier::{SignatureHeader, StripeWebhookVerifier};
