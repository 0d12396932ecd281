//! HandleBillingWebhookHandler - Command handler reconciling the entitlement
//! ledger and cached account state against processor lifecycle events.
//!
//! Every rule is idempotent under redelivery. Unknown customers and
//! subscriptions are logged and acknowledged, never raised; only storage
//! and processor failures return an error, which makes the processor retry.

use std::sync::Arc;

use crate::domain::billing::{
    CustomerObject, InvoiceObject, PaymentMethodObject, StripeEvent, StripeEventType,
    StripeWebhookVerifier, SubscriptionObject, WebhookError,
};
use crate::domain::entitlement::{NewSubscription, SubscriptionStatus};
use crate::domain::foundation::UserId;
use crate::ports::{BillingProvider, CatalogReader, EntitlementLedger, UserRepository};

/// Command to handle one webhook delivery.
#[derive(Debug, Clone)]
pub struct HandleBillingWebhookCommand {
    /// Raw request body, exactly as received.
    pub payload: Vec<u8>,
    /// `Stripe-Signature` header value.
    pub signature: String,
}

/// Result of webhook processing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandleBillingWebhookResult {
    pub event_id: String,
    pub event_type: String,
    pub outcome: WebhookOutcome,
}

/// What reconciliation did with an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookOutcome {
    /// Subscription canceled; `removed` is false if the row was already gone.
    SubscriptionRemoved {
        subscription_id: String,
        removed: bool,
    },
    /// Live subscription ensured; `inserted` is false if it already existed.
    SubscriptionRecorded {
        subscription_id: String,
        inserted: bool,
    },
    /// Recorded status refreshed on an existing row.
    SubscriptionStatusRecorded {
        subscription_id: String,
        status: SubscriptionStatus,
    },
    /// Cached payment-method flag written.
    PaymentMethodFlagUpdated {
        user_id: UserId,
        has_payment_method: bool,
    },
    /// Understood but nothing to change.
    Acknowledged { reason: String },
    /// Event type not handled.
    Ignored { event_type: String },
}

impl WebhookOutcome {
    fn acknowledged(reason: impl Into<String>) -> Self {
        WebhookOutcome::Acknowledged {
            reason: reason.into(),
        }
    }
}

/// Handler for processor webhooks.
pub struct HandleBillingWebhookHandler {
    verifier: Arc<StripeWebhookVerifier>,
    ledger: Arc<dyn EntitlementLedger>,
    users: Arc<dyn UserRepository>,
    catalog: Arc<dyn CatalogReader>,
    billing: Arc<dyn BillingProvider>,
}

impl HandleBillingWebhookHandler {
    pub fn new(
        verifier: Arc<StripeWebhookVerifier>,
        ledger: Arc<dyn EntitlementLedger>,
        users: Arc<dyn UserRepository>,
        catalog: Arc<dyn CatalogReader>,
        billing: Arc<dyn BillingProvider>,
    ) -> Self {
        Self {
            verifier,
            ledger,
            users,
            catalog,
            billing,
        }
    }

    pub async fn handle(
        &self,
        cmd: HandleBillingWebhookCommand,
    ) -> Result<HandleBillingWebhookResult, WebhookError> {
        let event = self
            .verifier
            .verify_and_parse(&cmd.payload, &cmd.signature)?;
        self.apply(event).await
    }

    /// Applies an already-authenticated event.
    pub async fn apply(&self, event: StripeEvent) -> Result<HandleBillingWebhookResult, WebhookError> {
        let outcome = match event.parsed_type() {
            StripeEventType::CustomerSubscriptionDeleted => {
                let sub: SubscriptionObject = object(&event)?;
                self.remove_subscription(&sub.id).await?
            }
            StripeEventType::CustomerSubscriptionCreated
            | StripeEventType::CustomerSubscriptionUpdated => {
                let sub: SubscriptionObject = object(&event)?;
                self.reconcile_subscription(&sub).await?
            }
            StripeEventType::InvoicePaid => {
                let invoice: InvoiceObject = object(&event)?;
                self.record_invoice_status(&invoice, SubscriptionStatus::Active)
                    .await?
            }
            StripeEventType::InvoicePaymentFailed => {
                let invoice: InvoiceObject = object(&event)?;
                self.record_invoice_status(&invoice, SubscriptionStatus::PastDue)
                    .await?
            }
            StripeEventType::PaymentMethodAttached => {
                let pm: PaymentMethodObject = object(&event)?;
                match pm.customer.as_deref() {
                    Some(customer_id) => self.set_payment_flag(customer_id, true).await?,
                    None => WebhookOutcome::acknowledged("payment method has no customer"),
                }
            }
            StripeEventType::PaymentMethodDetached => {
                let pm: PaymentMethodObject = object(&event)?;
                let customer_id = pm
                    .customer
                    .as_deref()
                    .or_else(|| event.previous_attribute_str("customer"))
                    .map(str::to_string);
                match customer_id {
                    Some(customer_id) => self.payment_method_detached(&customer_id).await?,
                    None => WebhookOutcome::acknowledged("detached payment method has no owner"),
                }
            }
            StripeEventType::CustomerUpdated => {
                let customer: CustomerObject = object(&event)?;
                self.set_payment_flag(&customer.id, customer.has_default_payment_method())
                    .await?
            }
            StripeEventType::Unknown => {
                tracing::debug!(event_type = %event.event_type, "Ignoring webhook event");
                WebhookOutcome::Ignored {
                    event_type: event.event_type.clone(),
                }
            }
        };

        tracing::info!(
            event_id = %event.id,
            event_type = %event.event_type,
            outcome = ?outcome,
            "Webhook processed"
        );

        Ok(HandleBillingWebhookResult {
            event_id: event.id,
            event_type: event.event_type,
            outcome,
        })
    }

    async fn remove_subscription(&self, subscription_id: &str) -> Result<WebhookOutcome, WebhookError> {
        let removed = self.ledger.delete_subscription(subscription_id).await?;
        if !removed {
            tracing::info!(subscription_id, "Canceled subscription already absent from ledger");
        }
        Ok(WebhookOutcome::SubscriptionRemoved {
            subscription_id: subscription_id.to_string(),
            removed,
        })
    }

    async fn reconcile_subscription(
        &self,
        sub: &SubscriptionObject,
    ) -> Result<WebhookOutcome, WebhookError> {
        let Some(status) = SubscriptionStatus::parse(&sub.status) else {
            tracing::warn!(subscription_id = %sub.id, status = %sub.status, "Unrecognized subscription status");
            return Ok(WebhookOutcome::acknowledged(format!(
                "unrecognized status {}",
                sub.status
            )));
        };

        if status == SubscriptionStatus::Canceled {
            return self.remove_subscription(&sub.id).await;
        }

        if self.ledger.find_subscription(&sub.id).await?.is_some() {
            self.ledger.update_subscription_status(&sub.id, status).await?;
            return Ok(WebhookOutcome::SubscriptionStatusRecorded {
                subscription_id: sub.id.clone(),
                status,
            });
        }

        if !status.keeps_row() {
            return Ok(WebhookOutcome::acknowledged(format!(
                "no row for {} subscription",
                status
            )));
        }

        let Some(user) = self.users.find_by_customer_id(&sub.customer).await? else {
            tracing::warn!(customer_id = %sub.customer, subscription_id = %sub.id, "Webhook for unknown customer");
            return Ok(WebhookOutcome::acknowledged("unknown customer"));
        };

        let row = if sub.is_main() {
            if self.ledger.find_main_subscription(user.id).await?.is_some() {
                tracing::warn!(user_id = %user.id, subscription_id = %sub.id, "User already has a main subscription");
                return Ok(WebhookOutcome::acknowledged("main subscription already recorded"));
            }
            NewSubscription::main(user.id, sub.id.clone(), status)
        } else if let Some(name) = sub.module_name() {
            let Some(module) = self.catalog.get_module_by_name(name).await? else {
                tracing::warn!(module = name, subscription_id = %sub.id, "Subscription names unknown module");
                return Ok(WebhookOutcome::acknowledged("unknown module"));
            };
            if self.ledger.has_live_module_subscription(user.id, name).await? {
                return Ok(WebhookOutcome::acknowledged("module already subscribed"));
            }
            NewSubscription::module(user.id, module.id, sub.id.clone(), status)
        } else {
            tracing::warn!(subscription_id = %sub.id, "Subscription carries neither module nor main marker");
            return Ok(WebhookOutcome::acknowledged("subscription not tied to a module"));
        };

        self.ledger.insert_subscription(row).await?;
        Ok(WebhookOutcome::SubscriptionRecorded {
            subscription_id: sub.id.clone(),
            inserted: true,
        })
    }

    async fn record_invoice_status(
        &self,
        invoice: &InvoiceObject,
        status: SubscriptionStatus,
    ) -> Result<WebhookOutcome, WebhookError> {
        let Some(subscription_id) = invoice.subscription.as_deref() else {
            return Ok(WebhookOutcome::acknowledged("invoice not tied to a subscription"));
        };

        if self
            .ledger
            .update_subscription_status(subscription_id, status)
            .await?
        {
            Ok(WebhookOutcome::SubscriptionStatusRecorded {
                subscription_id: subscription_id.to_string(),
                status,
            })
        } else {
            tracing::info!(subscription_id, "Invoice for subscription not in ledger");
            Ok(WebhookOutcome::acknowledged("unknown subscription"))
        }
    }

    async fn payment_method_detached(&self, customer_id: &str) -> Result<WebhookOutcome, WebhookError> {
        let remaining = self
            .billing
            .count_payment_methods(customer_id)
            .await
            .map_err(|e| WebhookError::PaymentProvider(e.to_string()))?;
        if remaining > 0 {
            return Ok(WebhookOutcome::acknowledged(format!(
                "{} payment methods remain",
                remaining
            )));
        }
        self.set_payment_flag(customer_id, false).await
    }

    async fn set_payment_flag(
        &self,
        customer_id: &str,
        has_payment_method: bool,
    ) -> Result<WebhookOutcome, WebhookError> {
        let Some(user) = self.users.find_by_customer_id(customer_id).await? else {
            tracing::warn!(customer_id, "Webhook for unknown customer");
            return Ok(WebhookOutcome::acknowledged("unknown customer"));
        };

        self.users
            .set_has_payment_method(user.id, has_payment_method)
            .await?;
        Ok(WebhookOutcome::PaymentMethodFlagUpdated {
            user_id: user.id,
            has_payment_method,
        })
    }
}

fn object<T: serde::de::DeserializeOwned>(event: &StripeEvent) -> Result<T, WebhookError> {
    event
        .deserialize_object()
        .map_err(|e| WebhookError::ParseError(e.to_string()))
}
