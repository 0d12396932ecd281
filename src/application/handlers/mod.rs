//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations over the
//! ports. One file per operation, grouped by area.

pub mod access;
pub mod account;
pub mod billing;
pub mod catalog;
pub mod purchase;

#[cfg(test)]
pub(crate) mod test_support;

pub use access::{
    CheckAccessHandler, CheckAccessQuery, CheckAccessResult, ListPurchaseOptionsHandler,
    ListPurchaseOptionsQuery, ListPurchaseOptionsResult,
};
pub use account::{
    CreatePortalSessionCommand, CreatePortalSessionHandler, GetUserHandler, GetUserQuery,
    StartPaymentSetupCommand, StartPaymentSetupHandler, StartPaymentSetupResult,
    VerifyPaymentMethodHandler, VerifyPaymentMethodQuery, VerifyPaymentMethodResult,
};
pub use billing::{
    HandleBillingWebhookCommand, HandleBillingWebhookHandler, HandleBillingWebhookResult,
    WebhookOutcome,
};
pub use catalog::{GetVideoHandler, GetVideoQuery, ListVideosHandler};
pub use purchase::{RecordPurchaseCommand, RecordPurchaseHandler, RecordPurchaseResult};
