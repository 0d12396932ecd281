//! Stripe billing adapter.
//!
//! Implements `PriceOracle` and `BillingProvider` over Stripe's form-encoded
//! REST API.
//!
//! # Billing model
//!
//! - Series and video purchases in full mode are pending invoice items bound
//!   to the user's main subscription, collected on its next invoice.
//! - Simplified-mode video purchases are an invoice item plus a one-off
//!   invoice that is finalized and paid immediately.
//! - Module purchases are standalone subscriptions anchored at the start of
//!   the next month with proration disabled.
//!
//! Every mutating call carries a fresh `Idempotency-Key`, so a transport
//! level resend inside reqwest cannot double-bill. Calls are never retried
//! here.
//!
//! # Configuration
//!
//! ```ignore
//! let config = StripeConfig::new(api_key);
//! let adapter = StripeBillingAdapter::new(config);
//! ```

use async_trait::async_trait;
use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;

use crate::domain::entitlement::Price;
use crate::ports::{
    BillingError, BillingErrorCode, BillingProvider, BillingReceipt, CheckoutSession, Customer,
    ImmediateChargeRequest, LineItemRequest, ModuleSubscriptionRequest, PortalSession,
    PriceOracle, ProcessorSubscription, SetupSessionRequest,
};

use super::api_types::{
    StripeCheckoutSession, StripeCustomer, StripeErrorBody, StripeInvoice, StripeInvoiceItem,
    StripeList, StripePaymentMethod, StripePortalSession, StripePrice, StripeSubscription,
};

/// Default Stripe API origin.
pub const DEFAULT_API_BASE: &str = "https://api.stripe.com";

/// Stripe API configuration.
#[derive(Clone)]
pub struct StripeConfig {
    /// Secret or restricted key (`sk_...` / `rk_...`).
    api_key: SecretString,

    /// Base URL for the API; overridden in tests.
    api_base_url: String,
}

impl StripeConfig {
    pub fn new(api_key: SecretString) -> Self {
        Self {
            api_key,
            api_base_url: DEFAULT_API_BASE.to_string(),
        }
    }

    /// Set a custom API base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into().trim_end_matches('/').to_string();
        self
    }
}

impl std::fmt::Debug for StripeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StripeConfig")
            .field("api_key", &"[REDACTED]")
            .field("api_base_url", &self.api_base_url)
            .finish()
    }
}

type Form = Vec<(String, String)>;

fn field(key: &str, value: impl Into<String>) -> (String, String) {
    (key.to_string(), value.into())
}

/// Stripe billing adapter.
pub struct StripeBillingAdapter {
    config: StripeConfig,
    http_client: reqwest::Client,
}

impl StripeBillingAdapter {
    pub fn new(config: StripeConfig) -> Self {
        Self {
            config,
            http_client: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/v1/{}", self.config.api_base_url, path)
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, BillingError> {
        let response = self
            .http_client
            .get(self.url(path))
            .basic_auth(self.config.api_key.expose_secret(), Option::<&str>::None)
            .query(query)
            .send()
            .await
            .map_err(|e| BillingError::network(e.to_string()))?;

        parse_response(path, response).await
    }

    async fn post<T: DeserializeOwned>(&self, path: &str, form: &Form) -> Result<T, BillingError> {
        let response = self
            .http_client
            .post(self.url(path))
            .basic_auth(self.config.api_key.expose_secret(), Option::<&str>::None)
            .header("Idempotency-Key", uuid::Uuid::new_v4().to_string())
            .form(form)
            .send()
            .await
            .map_err(|e| BillingError::network(e.to_string()))?;

        parse_response(path, response).await
    }
}

async fn parse_response<T: DeserializeOwned>(
    path: &str,
    response: reqwest::Response,
) -> Result<T, BillingError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        let error = error_from_response(status, &body);
        tracing::error!(
            path,
            status = status.as_u16(),
            code = ?error.code,
            provider_code = ?error.provider_code,
            "Stripe request failed"
        );
        return Err(error);
    }

    response.json().await.map_err(|e| {
        BillingError::provider(format!("Failed to parse Stripe response: {}", e))
    })
}

/// Maps a non-2xx response to a billing error, keeping Stripe's message.
pub(crate) fn error_from_response(status: StatusCode, body: &str) -> BillingError {
    let api_error = serde_json::from_str::<StripeErrorBody>(body)
        .ok()
        .map(|b| b.error);

    let message = api_error
        .as_ref()
        .and_then(|e| e.message.clone())
        .unwrap_or_else(|| format!("Stripe API error ({})", status.as_u16()));

    let is_card_error = api_error
        .as_ref()
        .and_then(|e| e.error_type.as_deref())
        == Some("card_error");

    let code = if is_card_error || status == StatusCode::PAYMENT_REQUIRED {
        BillingErrorCode::CardDeclined
    } else {
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => BillingErrorCode::AuthenticationError,
            StatusCode::NOT_FOUND => BillingErrorCode::NotFound,
            StatusCode::TOO_MANY_REQUESTS => BillingErrorCode::RateLimitExceeded,
            s if s.is_client_error() => BillingErrorCode::InvalidRequest,
            _ => BillingErrorCode::ProviderError,
        }
    };

    let error = BillingError::new(code, message);
    match api_error.and_then(|e| e.decline_code.or(e.code)) {
        Some(provider_code) => error.with_provider_code(provider_code),
        None => error,
    }
}

/// Form body for a module subscription.
pub(crate) fn module_subscription_form(request: &ModuleSubscriptionRequest) -> Form {
    let mut form = vec![
        field("customer", request.customer_id.as_str()),
        field("items[0][price]", request.price_id.as_str()),
        field(
            "billing_cycle_anchor",
            request.billing_cycle_anchor.as_unix_secs().to_string(),
        ),
        field("proration_behavior", "none"),
    ];
    form.extend(
        request
            .metadata
            .iter()
            .map(|(k, v)| (format!("metadata[{}]", k), v.clone())),
    );
    form
}

#[async_trait]
impl PriceOracle for StripeBillingAdapter {
    async fn get_price(&self, price_id: &str) -> Result<Price, BillingError> {
        let price: StripePrice = self.get(&format!("prices/{}", price_id), &[]).await?;

        if !price.active {
            return Err(BillingError::invalid_request(format!(
                "Price {} is archived",
                price.id
            )));
        }
        let amount = price.unit_amount.ok_or_else(|| {
            BillingError::invalid_request(format!("Price {} has no unit amount", price.id))
        })?;

        Ok(Price::new(amount, &price.currency))
    }
}

#[async_trait]
impl BillingProvider for StripeBillingAdapter {
    async fn create_customer(&self, email: &str) -> Result<Customer, BillingError> {
        let customer: StripeCustomer = self
            .post("customers", &vec![field("email", email)])
            .await?;

        Ok(Customer {
            id: customer.id,
            email: customer.email,
        })
    }

    async fn create_setup_session(
        &self,
        request: SetupSessionRequest,
    ) -> Result<CheckoutSession, BillingError> {
        let form = vec![
            field("mode", "setup"),
            field("customer", request.customer_id),
            field("payment_method_types[0]", "card"),
            field("success_url", request.success_url),
            field("cancel_url", request.cancel_url),
        ];
        let session: StripeCheckoutSession = self.post("checkout/sessions", &form).await?;

        let url = session
            .url
            .ok_or_else(|| BillingError::provider("Checkout session has no URL"))?;
        Ok(CheckoutSession { id: session.id, url })
    }

    async fn create_portal_session(
        &self,
        customer_id: &str,
        return_url: &str,
    ) -> Result<PortalSession, BillingError> {
        let form = vec![field("customer", customer_id), field("return_url", return_url)];
        let session: StripePortalSession = self.post("billing_portal/sessions", &form).await?;

        Ok(PortalSession {
            id: session.id,
            url: session.url,
        })
    }

    async fn add_line_item_to_main_subscription(
        &self,
        request: LineItemRequest,
    ) -> Result<BillingReceipt, BillingError> {
        let form = vec![
            field("customer", request.customer_id),
            field("price", request.price_id),
            field("subscription", request.subscription_id),
            field("description", request.description),
        ];
        let item: StripeInvoiceItem = self.post("invoiceitems", &form).await?;

        Ok(BillingReceipt { reference: item.id })
    }

    async fn create_immediate_charge(
        &self,
        request: ImmediateChargeRequest,
    ) -> Result<BillingReceipt, BillingError> {
        let item_form = vec![
            field("customer", request.customer_id.as_str()),
            field("price", request.price_id),
            field("description", request.description),
        ];
        let item: StripeInvoiceItem = self.post("invoiceitems", &item_form).await?;

        let invoice_form = vec![
            field("customer", request.customer_id),
            field("pending_invoice_items_behavior", "include"),
            field("collection_method", "charge_automatically"),
            field("auto_advance", "false"),
        ];
        let invoice: StripeInvoice = self.post("invoices", &invoice_form).await?;

        let paid: StripeInvoice = self
            .post(&format!("invoices/{}/pay", invoice.id), &Vec::new())
            .await?;

        if paid.status.as_deref() != Some("paid") {
            return Err(BillingError::card_declined(format!(
                "Invoice {} was not paid",
                paid.id
            )));
        }

        tracing::debug!(invoice_item = %item.id, invoice = %paid.id, "Immediate charge collected");
        Ok(BillingReceipt { reference: paid.id })
    }

    async fn create_module_subscription(
        &self,
        request: ModuleSubscriptionRequest,
    ) -> Result<ProcessorSubscription, BillingError> {
        let subscription: StripeSubscription = self
            .post("subscriptions", &module_subscription_form(&request))
            .await?;

        Ok(ProcessorSubscription {
            id: subscription.id,
            customer_id: subscription.customer,
            status: subscription.status,
        })
    }

    async fn count_payment_methods(&self, customer_id: &str) -> Result<usize, BillingError> {
        let methods: StripeList<StripePaymentMethod> = self
            .get(
                "payment_methods",
                &[("customer", customer_id), ("type", "card"), ("limit", "100")],
            )
            .await?;

        if methods.has_more {
            tracing::debug!(customer_id, "More than 100 card payment methods");
        }
        Ok(methods.data.len())
    }
}
