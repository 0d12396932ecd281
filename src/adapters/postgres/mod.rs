//! PostgreSQL adapters - Database implementations of the catalog, ledger
//! and user ports.
//!
//! Schema lives in `migrations/` at the crate root and is applied at startup
//! when `database.run_migrations` is set.

mod catalog_reader;
mod entitlement_ledger;
mod user_repository;

pub use catalog_reader::PostgresCatalogReader;
pub use entitlement_ledger::PostgresEntitlementLedger;
pub use user_repository::PostgresUserRepository;
