//! Stripe payment processor adapters.
//!
//! - `StripeBillingAdapter`: live REST implementation of `PriceOracle` and
//!   `BillingProvider`.
//! - `MockBillingProvider`: scriptable in-memory stand-in used by tests and
//!   local development.
//!
//! Webhook signature verification lives in `domain::billing`; it needs only
//! the signing secret, not an API client.

mod api_types;
mod mock_billing_provider;
mod stripe_adapter;

pub use mock_billing_provider::{MethodCall, MockBillingProvider};
pub use stripe_adapter::{StripeBillingAdapter, StripeConfig, DEFAULT_API_BASE};
