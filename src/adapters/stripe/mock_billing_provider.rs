//! Mock billing provider for testing.
//!
//! Configurable implementation of `BillingProvider` and `PriceOracle` for
//! unit and integration tests. Supports:
//! - Configured prices and payment-method counts
//! - Per-method error injection
//! - Call tracking
//!
//! Generated processor ids are sequential (`sub_mock_1`, `ii_mock_2`, ...)
//! so tests can assert on them.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::domain::entitlement::Price;
use crate::ports::{
    BillingError, BillingProvider, BillingReceipt, CheckoutSession, Customer,
    ImmediateChargeRequest, LineItemRequest, ModuleSubscriptionRequest, PortalSession,
    PriceOracle, ProcessorSubscription, SetupSessionRequest,
};

/// Mock billing provider for testing.
///
/// Clones share state, so a test can keep one handle for assertions while
/// the handler under test owns another.
#[derive(Default, Clone)]
pub struct MockBillingProvider {
    inner: Arc<Mutex<MockState>>,
}

#[derive(Default)]
struct MockState {
    prices: HashMap<String, Price>,
    payment_methods: HashMap<String, usize>,
    subscription_status: Option<String>,
    method_errors: HashMap<String, BillingError>,
    next_error: Option<BillingError>,
    call_log: Vec<MethodCall>,
    sequence: u64,
}

/// Recorded method call for assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodCall {
    pub method: String,
    pub args: Vec<String>,
}

impl MockBillingProvider {
    pub fn new() -> Self {
        Self::default()
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Configuration Methods
    // ════════════════════════════════════════════════════════════════════════════

    /// Register a price returned by `get_price`.
    pub fn set_price(&self, price_id: impl Into<String>, amount: i64, currency: &str) {
        self.inner
            .lock()
            .unwrap()
            .prices
            .insert(price_id.into(), Price::new(amount, currency));
    }

    /// Set how many card payment methods a customer has.
    pub fn set_payment_methods(&self, customer_id: impl Into<String>, count: usize) {
        self.inner
            .lock()
            .unwrap()
            .payment_methods
            .insert(customer_id.into(), count);
    }

    /// Status reported for new subscriptions (defaults to `active`).
    pub fn set_subscription_status(&self, status: impl Into<String>) {
        self.inner.lock().unwrap().subscription_status = Some(status.into());
    }

    /// Fail every call to `method` until cleared.
    pub fn set_method_error(&self, method: &str, error: BillingError) {
        self.inner
            .lock()
            .unwrap()
            .method_errors
            .insert(method.to_string(), error);
    }

    /// Fail the next call to any method.
    pub fn set_error(&self, error: BillingError) {
        self.inner.lock().unwrap().next_error = Some(error);
    }

    pub fn clear_errors(&self) {
        let mut state = self.inner.lock().unwrap();
        state.next_error = None;
        state.method_errors.clear();
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Call Tracking
    // ════════════════════════════════════════════════════════════════════════════

    pub fn calls(&self) -> Vec<MethodCall> {
        self.inner.lock().unwrap().call_log.clone()
    }

    pub fn was_called(&self, method: &str) -> bool {
        self.call_count(method) > 0
    }

    pub fn call_count(&self, method: &str) -> usize {
        self.inner
            .lock()
            .unwrap()
            .call_log
            .iter()
            .filter(|c| c.method == method)
            .count()
    }

    /// Calls that mutate processor state (everything except reads).
    pub fn billing_calls(&self) -> Vec<MethodCall> {
        self.calls()
            .into_iter()
            .filter(|c| c.method != "get_price" && c.method != "count_payment_methods")
            .collect()
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Internal Helpers
    // ════════════════════════════════════════════════════════════════════════════

    fn record_call(&self, method: &str, args: Vec<String>) {
        self.inner.lock().unwrap().call_log.push(MethodCall {
            method: method.to_string(),
            args,
        });
    }

    fn check_error(&self, method: &str) -> Result<(), BillingError> {
        let mut state = self.inner.lock().unwrap();
        if let Some(error) = state.method_errors.get(method) {
            return Err(error.clone());
        }
        if let Some(error) = state.next_error.take() {
            return Err(error);
        }
        Ok(())
    }

    fn next_id(&self, prefix: &str) -> String {
        let mut state = self.inner.lock().unwrap();
        state.sequence += 1;
        format!("{}_mock_{}", prefix, state.sequence)
    }
}

#[async_trait]
impl PriceOracle for MockBillingProvider {
    async fn get_price(&self, price_id: &str) -> Result<Price, BillingError> {
        self.record_call("get_price", vec![price_id.to_string()]);
        self.check_error("get_price")?;

        self.inner
            .lock()
            .unwrap()
            .prices
            .get(price_id)
            .cloned()
            .ok_or_else(|| BillingError::not_found("Price"))
    }
}

#[async_trait]
impl BillingProvider for MockBillingProvider {
    async fn create_customer(&self, email: &str) -> Result<Customer, BillingError> {
        self.record_call("create_customer", vec![email.to_string()]);
        self.check_error("create_customer")?;

        Ok(Customer {
            id: self.next_id("cus"),
            email: Some(email.to_string()),
        })
    }

    async fn create_setup_session(
        &self,
        request: SetupSessionRequest,
    ) -> Result<CheckoutSession, BillingError> {
        self.record_call(
            "create_setup_session",
            vec![
                request.customer_id.clone(),
                request.success_url.clone(),
                request.cancel_url.clone(),
            ],
        );
        self.check_error("create_setup_session")?;

        let id = self.next_id("cs");
        Ok(CheckoutSession {
            url: format!("https://checkout.stripe.test/{}", id),
            id,
        })
    }

    async fn create_portal_session(
        &self,
        customer_id: &str,
        return_url: &str,
    ) -> Result<PortalSession, BillingError> {
        self.record_call(
            "create_portal_session",
            vec![customer_id.to_string(), return_url.to_string()],
        );
        self.check_error("create_portal_session")?;

        let id = self.next_id("bps");
        Ok(PortalSession {
            url: format!("https://billing.stripe.test/{}", id),
            id,
        })
    }

    async fn add_line_item_to_main_subscription(
        &self,
        request: LineItemRequest,
    ) -> Result<BillingReceipt, BillingError> {
        self.record_call(
            "add_line_item_to_main_subscription",
            vec![
                request.customer_id.clone(),
                request.subscription_id.clone(),
                request.price_id.clone(),
            ],
        );
        self.check_error("add_line_item_to_main_subscription")?;

        Ok(BillingReceipt {
            reference: self.next_id("ii"),
        })
    }

    async fn create_immediate_charge(
        &self,
        request: ImmediateChargeRequest,
    ) -> Result<BillingReceipt, BillingError> {
        self.record_call(
            "create_immediate_charge",
            vec![request.customer_id.clone(), request.price_id.clone()],
        );
        self.check_error("create_immediate_charge")?;

        Ok(BillingReceipt {
            reference: self.next_id("in"),
        })
    }

    async fn create_module_subscription(
        &self,
        request: ModuleSubscriptionRequest,
    ) -> Result<ProcessorSubscription, BillingError> {
        let mut args = vec![
            request.customer_id.clone(),
            request.price_id.clone(),
            request.billing_cycle_anchor.as_unix_secs().to_string(),
        ];
        args.extend(request.metadata.iter().map(|(k, v)| format!("{}={}", k, v)));
        self.record_call("create_module_subscription", args);
        self.check_error("create_module_subscription")?;

        let status = self
            .inner
            .lock()
            .unwrap()
            .subscription_status
            .clone()
            .unwrap_or_else(|| "active".to_string());

        Ok(ProcessorSubscription {
            id: self.next_id("sub"),
            customer_id: request.customer_id,
            status,
        })
    }

    async fn count_payment_methods(&self, customer_id: &str) -> Result<usize, BillingError> {
        self.record_call("count_payment_methods", vec![customer_id.to_string()]);
        self.check_error("count_payment_methods")?;

        Ok(self
            .inner
            .lock()
            .unwrap()
            .payment_methods
            .get(customer_id)
            .copied()
            .unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unknown_price_is_not_found() {
        let mock = MockBillingProvider::new();
        mock.set_price("price_a", 499, "NZD");

        assert_eq!(mock.get_price("price_a").await.unwrap(), Price::new(499, "nzd"));
        assert!(mock.get_price("price_b").await.is_err());
        assert_eq!(mock.call_count("get_price"), 2);
    }

    #[tokio::test]
    async fn method_error_persists_until_cleared() {
        let mock = MockBillingProvider::new();
        mock.set_method_error("create_customer", BillingError::network("down"));

        assert!(mock.create_customer("a@example.com").await.is_err());
        assert!(mock.create_customer("a@example.com").await.is_err());

        mock.clear_errors();
        assert!(mock.create_customer("a@example.com").await.is_ok());
    }

    #[tokio::test]
    async fn next_error_is_consumed_once() {
        let mock = MockBillingProvider::new();
        mock.set_error(BillingError::card_declined("declined"));

        assert!(mock.count_payment_methods("cus_1").await.is_err());
        assert_eq!(mock.count_payment_methods("cus_1").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn clones_share_call_log() {
        let mock = MockBillingProvider::new();
        let handle = mock.clone();

        mock.create_portal_session("cus_1", "https://app.test/account")
            .await
            .unwrap();

        assert!(handle.was_called("create_portal_session"));
        assert_eq!(handle.billing_calls().len(), 1);
    }
}
