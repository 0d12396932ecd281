//! Adapters - Implementations of port interfaces.
//!
//! - `http` - axum REST API
//! - `memory` - In-memory storage for tests and local runs
//! - `postgres` - sqlx-backed catalog, ledger and user storage
//! - `stripe` - Stripe price oracle and billing provider

pub mod http;
pub mod memory;
pub mod postgres;
pub mod stripe;

pub use memory::{InMemoryCatalog, InMemoryEntitlementLedger, InMemoryUserRepository};
pub use postgres::{PostgresCatalogReader, PostgresEntitlementLedger, PostgresUserRepository};
pub use stripe::{MockBillingProvider, StripeBillingAdapter, StripeConfig};
