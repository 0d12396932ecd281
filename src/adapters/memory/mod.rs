//! In-memory adapters.
//!
//! Mutex-backed implementations of the storage ports for tests and local
//! demos. They enforce the same uniqueness rules as the Postgres schema.
//! Nothing is persisted across restarts.

mod catalog;
mod ledger;
mod users;

pub use catalog::InMemoryCatalog;
pub use ledger::InMemoryEntitlementLedger;
pub use users::InMemoryUserRepository;

use crate::domain::foundation::DomainError;

fn unavailable() -> DomainError {
    DomainError::database("storage unavailable")
}
