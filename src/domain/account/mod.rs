//! Account billing fields.
//!
//! User rows are owned by the authentication subsystem. This service reads
//! them and writes only the processor customer id and the cached
//! payment-method flag.

use serde::{Deserialize, Serialize};

use crate::domain::entitlement::EntitlementError;
use crate::domain::foundation::UserId;

/// A user as seen by billing and entitlement code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub display_name: Option<String>,
    /// Processor customer id, absent until the first billing interaction.
    pub customer_id: Option<String>,
    /// Cached processor state, refreshed by webhook reconciliation.
    pub has_payment_method: bool,
}

impl User {
    /// Returns the processor customer id, or `CustomerNotProvisioned`.
    pub fn require_customer(&self) -> Result<&str, EntitlementError> {
        self.customer_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .ok_or(EntitlementError::CustomerNotProvisioned(self.id))
    }
}
