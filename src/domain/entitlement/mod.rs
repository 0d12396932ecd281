//! Entitlement domain - who may watch what, and what they can still buy.
//!
//! A user gains access to a premium video through any one of three grants:
//! a direct purchase of the video, a purchase of its series, or a live
//! subscription to its module. The ledger rows in this module are the local
//! cache of what the payment processor has actually billed.

mod access;
mod errors;
mod purchase;
mod subscription;

pub use access::AccessDecision;
pub use errors::EntitlementError;
pub use purchase::{Price, PurchaseKind, PurchaseOption, PurchaseTarget, UserPurchase};
pub use subscription::{NewSubscription, SubscriptionStatus, UserSubscription};
