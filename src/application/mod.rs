//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Query handlers (access, options, catalog, account reads) never write;
//! command handlers (purchases, payment setup, webhook reconciliation) call
//! the processor first and the ledger second.

pub mod handlers;

pub use handlers::*;
