//! Billing webhook handlers.

mod handle_billing_webhook;

pub use handle_billing_webhook::{
    HandleBillingWebhookCommand, HandleBillingWebhookHandler, HandleBillingWebhookResult,
    WebhookOutcome,
};
