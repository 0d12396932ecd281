//! VerifyPaymentMethodHandler - Query handler that asks the processor
//! whether the user has a saved card and refreshes the cached flag.

use std::sync::Arc;

use crate::domain::entitlement::EntitlementError;
use crate::domain::foundation::UserId;
use crate::ports::{BillingProvider, UserRepository};

#[derive(Debug, Clone)]
pub struct VerifyPaymentMethodQuery {
    pub user_id: UserId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifyPaymentMethodResult {
    pub has_payment_method: bool,
}

/// Handler for verifying payment methods.
///
/// Only a positive answer is written back; clearing the flag is left to
/// detach and customer-update webhooks.
pub struct VerifyPaymentMethodHandler {
    users: Arc<dyn UserRepository>,
    billing: Arc<dyn BillingProvider>,
}

impl VerifyPaymentMethodHandler {
    pub fn new(users: Arc<dyn UserRepository>, billing: Arc<dyn BillingProvider>) -> Self {
        Self { users, billing }
    }

    pub async fn handle(
        &self,
        query: VerifyPaymentMethodQuery,
    ) -> Result<VerifyPaymentMethodResult, EntitlementError> {
        let user = self
            .users
            .find_by_id(query.user_id)
            .await?
            .ok_or_else(|| EntitlementError::not_found("User", query.user_id))?;

        let Ok(customer_id) = user.require_customer() else {
            return Ok(VerifyPaymentMethodResult {
                has_payment_method: false,
            });
        };

        let count = self
            .billing
            .count_payment_methods(customer_id)
            .await
            .map_err(|e| EntitlementError::billing_failed(e.message))?;

        let has_payment_method = count > 0;
        if has_payment_method && !user.has_payment_method {
            self.users.set_has_payment_method(user.id, true).await?;
        }

        Ok(VerifyPaymentMethodResult { has_payment_method })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::*;
    use crate::ports::BillingError;

    fn handler(fx: &Fixture) -> VerifyPaymentMethodHandler {
        VerifyPaymentMethodHandler::new(fx.users.clone(), fx.billing_port())
    }

    #[tokio::test]
    async fn no_customer_means_no_method_without_processor_call() {
        let fx = Fixture::new().await;

        let result = handler(&fx)
            .handle(VerifyPaymentMethodQuery { user_id: NEWCOMER })
            .await
            .unwrap();

        assert!(!result.has_payment_method);
        assert!(fx.billing.calls().is_empty());
    }

    #[tokio::test]
    async fn found_method_sets_cached_flag() {
        let fx = Fixture::new().await;
        fx.users.set_has_payment_method(SUBSCRIBER, false).await.unwrap();
        fx.billing.set_payment_methods("cus_1", 2);

        let result = handler(&fx)
            .handle(VerifyPaymentMethodQuery { user_id: SUBSCRIBER })
            .await
            .unwrap();

        assert!(result.has_payment_method);
        assert!(fx.users.get(SUBSCRIBER).unwrap().has_payment_method);
    }

    #[tokio::test]
    async fn zero_methods_does_not_clear_flag() {
        let fx = Fixture::new().await;
        fx.billing.set_payment_methods("cus_1", 0);

        let result = handler(&fx)
            .handle(VerifyPaymentMethodQuery { user_id: SUBSCRIBER })
            .await
            .unwrap();

        assert!(!result.has_payment_method);
        assert!(fx.users.get(SUBSCRIBER).unwrap().has_payment_method);
    }

    #[tokio::test]
    async fn processor_failure_is_reported() {
        let fx = Fixture::new().await;
        fx.billing
            .set_method_error("count_payment_methods", BillingError::provider("boom"));

        let err = handler(&fx)
            .handle(VerifyPaymentMethodQuery { user_id: SUBSCRIBER })
            .await
            .unwrap_err();

        assert_eq!(err.code(), "BILLING_FAILED");
    }
}
