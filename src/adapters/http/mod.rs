//! HTTP adapter - REST API over axum.
//!
//! Each area has its own dto/handlers/routes; `router::build_router`
//! assembles them with the shared middleware stack.

pub mod account;
pub mod catalog;
pub mod entitlement;
pub mod error;
pub mod health;
pub mod middleware;
pub mod router;
pub mod state;
pub mod webhooks;

pub use error::{ApiError, ErrorResponse, WebhookApiError};
pub use middleware::{RequireUser, USER_ID_HEADER};
pub use router::build_router;
pub use state::AppState;
