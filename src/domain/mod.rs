//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared primitives (identifiers, timestamps, errors)
//! - `catalog` - Videos, series and modules
//! - `entitlement` - Purchases, subscriptions, access decisions
//! - `account` - Billing fields of a user
//! - `billing` - Payment processor webhook events and verification

pub mod account;
pub mod billing;
pub mod catalog;
pub mod entitlement;
pub mod foundation;
