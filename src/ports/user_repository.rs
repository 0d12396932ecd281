//! User repository port.
//!
//! Covers only the billing fields of a user; account creation and
//! credentials belong to the authentication subsystem.

use async_trait::async_trait;

use crate::domain::account::User;
use crate::domain::foundation::{DomainError, UserId};

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, DomainError>;

    /// Look up the user owning a processor customer id.
    async fn find_by_customer_id(&self, customer_id: &str) -> Result<Option<User>, DomainError>;

    /// Persist a newly provisioned processor customer id.
    async fn set_customer_id(&self, id: UserId, customer_id: &str) -> Result<(), DomainError>;

    /// Update the cached payment-method flag.
    async fn set_has_payment_method(&self, id: UserId, present: bool) -> Result<(), DomainError>;
}
