//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `CatalogReader` - Videos, series, modules (read-only)
//! - `EntitlementLedger` - Purchase and subscription rows
//! - `UserRepository` - Billing fields of user accounts
//! - `PriceOracle` - Live pricing from the payment processor
//! - `BillingProvider` - Processor-side billing actions

mod billing_provider;
mod catalog_reader;
mod entitlement_ledger;
mod price_oracle;
mod user_repository;

pub use billing_provider::{
    BillingError, BillingErrorCode, BillingProvider, BillingReceipt, CheckoutSession, Customer,
    ImmediateChargeRequest, LineItemRequest, ModuleSubscriptionRequest, PortalSession,
    ProcessorSubscription, SetupSessionRequest,
};
pub use catalog_reader::CatalogReader;
pub use entitlement_ledger::EntitlementLedger;
pub use price_oracle::PriceOracle;
pub use user_repository::UserRepository;
