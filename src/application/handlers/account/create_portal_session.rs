//! CreatePortalSessionHandler - Command handler for the processor's
//! self-service billing portal.

use std::sync::Arc;

use crate::domain::entitlement::EntitlementError;
use crate::domain::foundation::UserId;
use crate::ports::{BillingProvider, PortalSession, UserRepository};

/// Command to open the billing portal.
#[derive(Debug, Clone)]
pub struct CreatePortalSessionCommand {
    pub user_id: UserId,
}

/// Handler for creating billing portal sessions.
pub struct CreatePortalSessionHandler {
    users: Arc<dyn UserRepository>,
    billing: Arc<dyn BillingProvider>,
    return_url: String,
}

impl CreatePortalSessionHandler {
    pub fn new(
        users: Arc<dyn UserRepository>,
        billing: Arc<dyn BillingProvider>,
        public_base_url: &str,
    ) -> Self {
        Self {
            users,
            billing,
            return_url: format!("{}/account", public_base_url.trim_end_matches('/')),
        }
    }

    pub async fn handle(
        &self,
        cmd: CreatePortalSessionCommand,
    ) -> Result<PortalSession, EntitlementError> {
        let user = self
            .users
            .find_by_id(cmd.user_id)
            .await?
            .ok_or_else(|| EntitlementError::not_found("User", cmd.user_id))?;
        let customer_id = user.require_customer()?;

        self.billing
            .create_portal_session(customer_id, &self.return_url)
            .await
            .map_err(|e| EntitlementError::billing_failed(e.message))
    }
}
