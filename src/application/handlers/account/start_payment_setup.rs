//! StartPaymentSetupHandler - Command handler that opens a setup-mode
//! checkout so the user can save a card.
//!
//! The processor customer is provisioned here on first use.

use std::sync::Arc;

use crate::domain::entitlement::EntitlementError;
use crate::domain::foundation::UserId;
use crate::ports::{BillingProvider, CheckoutSession, SetupSessionRequest, UserRepository};

/// Command to start saving a payment method.
#[derive(Debug, Clone)]
pub struct StartPaymentSetupCommand {
    pub user_id: UserId,
    /// Defaults to `{public_base_url}/account`.
    pub success_url: Option<String>,
    /// Defaults to the success URL.
    pub cancel_url: Option<String>,
}

/// Result of starting payment setup.
#[derive(Debug, Clone)]
pub struct StartPaymentSetupResult {
    pub session: CheckoutSession,
    pub customer_id: String,
    /// True if this call provisioned the processor customer.
    pub customer_created: bool,
}

/// Handler for starting payment-method setup.
pub struct StartPaymentSetupHandler {
    users: Arc<dyn UserRepository>,
    billing: Arc<dyn BillingProvider>,
    public_base_url: String,
}

impl StartPaymentSetupHandler {
    pub fn new(
        users: Arc<dyn UserRepository>,
        billing: Arc<dyn BillingProvider>,
        public_base_url: impl Into<String>,
    ) -> Self {
        Self {
            users,
            billing,
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub async fn handle(
        &self,
        cmd: StartPaymentSetupCommand,
    ) -> Result<StartPaymentSetupResult, EntitlementError> {
        let user = self
            .users
            .find_by_id(cmd.user_id)
            .await?
            .ok_or_else(|| EntitlementError::not_found("User", cmd.user_id))?;

        let (customer_id, customer_created) = match user.require_customer() {
            Ok(existing) => (existing.to_string(), false),
            Err(_) => {
                let customer = self
                    .billing
                    .create_customer(&user.email)
                    .await
                    .map_err(|e| EntitlementError::billing_failed(e.message))?;
                self.users.set_customer_id(user.id, &customer.id).await?;
                tracing::info!(user_id = %user.id, customer_id = %customer.id, "Processor customer provisioned");
                (customer.id, true)
            }
        };

        let success_url = cmd
            .success_url
            .unwrap_or_else(|| format!("{}/account", self.public_base_url));
        let cancel_url = cmd.cancel_url.unwrap_or_else(|| success_url.clone());

        let session = self
            .billing
            .create_setup_session(SetupSessionRequest {
                customer_id: customer_id.clone(),
                success_url,
                cancel_url,
            })
            .await
            .map_err(|e| EntitlementError::billing_failed(e.message))?;

        Ok(StartPaymentSetupResult {
            session,
            customer_id,
            customer_created,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::*;
    use crate::ports::BillingError;

    fn handler(fx: &Fixture) -> StartPaymentSetupHandler {
        StartPaymentSetupHandler::new(fx.users.clone(), fx.billing_port(), "https://vod.test/")
    }

    fn command(user_id: UserId) -> StartPaymentSetupCommand {
        StartPaymentSetupCommand {
            user_id,
            success_url: None,
            cancel_url: None,
        }
    }

    #[tokio::test]
    async fn provisions_customer_on_first_use() {
        let fx = Fixture::new().await;

        let result = handler(&fx).handle(command(NEWCOMER)).await.unwrap();

        assert!(result.customer_created);
        assert_eq!(
            fx.users.get(NEWCOMER).unwrap().customer_id.as_deref(),
            Some(result.customer_id.as_str())
        );
        let calls = fx.billing.calls();
        assert_eq!(calls[0].method, "create_customer");
        assert_eq!(calls[0].args, vec!["newcomer@example.com"]);
        assert_eq!(calls[1].method, "create_setup_session");
    }

    #[tokio::test]
    async fn reuses_existing_customer_and_defaults_urls() {
        let fx = Fixture::new().await;

        let result = handler(&fx).handle(command(SUBSCRIBER)).await.unwrap();

        assert!(!result.customer_created);
        assert!(!fx.billing.was_called("create_customer"));
        let call = &fx.billing.calls()[0];
        assert_eq!(
            call.args,
            vec!["cus_1", "https://vod.test/account", "https://vod.test/account"]
        );
        assert!(result.session.url.starts_with("https://checkout.stripe.test/"));
    }

    #[tokio::test]
    async fn explicit_urls_are_passed_through() {
        let fx = Fixture::new().await;
        let mut cmd = command(SUBSCRIBER);
        cmd.success_url = Some("https://vod.test/done".to_string());

        handler(&fx).handle(cmd).await.unwrap();

        let call = &fx.billing.calls()[0];
        assert_eq!(call.args[1], "https://vod.test/done");
        assert_eq!(call.args[2], "https://vod.test/done");
    }

    #[tokio::test]
    async fn processor_failure_leaves_user_unprovisioned() {
        let fx = Fixture::new().await;
        fx.billing
            .set_method_error("create_customer", BillingError::network("connection reset"));

        let err = handler(&fx).handle(command(NEWCOMER)).await.unwrap_err();

        assert_eq!(err.code(), "BILLING_FAILED");
        assert!(fx.users.get(NEWCOMER).unwrap().customer_id.is_none());
    }
}
