//! Stripe webhook event types.
//!
//! Only the fields read by entitlement reconciliation are captured; the rest
//! of Stripe's schema is ignored during deserialization.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Stripe webhook event envelope.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StripeEvent {
    /// Unique identifier for the event (evt_xxx format).
    pub id: String,

    /// Type of event (e.g., "customer.subscription.deleted").
    #[serde(rename = "type")]
    pub event_type: String,

    /// Time at which the event was created (Unix timestamp).
    pub created: i64,

    pub data: StripeEventData,

    #[serde(default)]
    pub livemode: bool,

    #[serde(default)]
    pub api_version: Option<String>,
}

/// Container for event-specific data.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StripeEventData {
    /// The object that triggered the event (polymorphic based on event type).
    pub object: serde_json::Value,

    /// Previous values for updated attributes (only for update events).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_attributes: Option<serde_json::Value>,
}

impl StripeEvent {
    /// Parse the event type into a known enum variant.
    pub fn parsed_type(&self) -> StripeEventType {
        StripeEventType::parse(&self.event_type)
    }

    /// Attempts to deserialize the data object as the specified type.
    pub fn deserialize_object<T: serde::de::DeserializeOwned>(
        &self,
    ) -> Result<T, serde_json::Error> {
        T::deserialize(&self.data.object)
    }

    /// Reads a string-valued entry from `previous_attributes`.
    pub fn previous_attribute_str(&self, key: &str) -> Option<&str> {
        self.data
            .previous_attributes
            .as_ref()
            .and_then(|attrs| attrs.get(key))
            .and_then(|value| value.as_str())
    }
}

/// Stripe event types that affect entitlements or cached account state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StripeEventType {
    CustomerSubscriptionCreated,
    CustomerSubscriptionUpdated,
    CustomerSubscriptionDeleted,
    InvoicePaid,
    InvoicePaymentFailed,
    PaymentMethodAttached,
    PaymentMethodDetached,
    CustomerUpdated,
    /// Unknown or unhandled event type.
    Unknown,
}

impl StripeEventType {
    /// Parse event type from string.
    pub fn parse(s: &str) -> Self {
        match s {
            "customer.subscription.created" => Self::CustomerSubscriptionCreated,
            "customer.subscription.updated" => Self::CustomerSubscriptionUpdated,
            "customer.subscription.deleted" => Self::CustomerSubscriptionDeleted,
            "invoice.paid" => Self::InvoicePaid,
            "invoice.payment_failed" => Self::InvoicePaymentFailed,
            "payment_method.attached" => Self::PaymentMethodAttached,
            "payment_method.detached" => Self::PaymentMethodDetached,
            "customer.updated" => Self::CustomerUpdated,
            _ => Self::Unknown,
        }
    }

    /// Convert to the Stripe event type string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CustomerSubscriptionCreated => "customer.subscription.created",
            Self::CustomerSubscriptionUpdated => "customer.subscription.updated",
            Self::CustomerSubscriptionDeleted => "customer.subscription.deleted",
            Self::InvoicePaid => "invoice.paid",
            Self::InvoicePaymentFailed => "invoice.payment_failed",
            Self::PaymentMethodAttached => "payment_method.attached",
            Self::PaymentMethodDetached => "payment_method.detached",
            Self::CustomerUpdated => "customer.updated",
            Self::Unknown => "unknown",
        }
    }
}

/// `customer.subscription.*` payload.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SubscriptionObject {
    pub id: String,
    pub customer: String,
    pub status: String,
    /// Set at creation: `module` names the module, `main=true` marks the
    /// baseline subscription.
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

impl SubscriptionObject {
    pub fn module_name(&self) -> Option<&str> {
        self.metadata
            .get("module")
            .map(|m| m.trim())
            .filter(|m| !m.is_empty())
    }

    pub fn is_main(&self) -> bool {
        self.metadata.get("main").map(String::as_str) == Some("true")
    }
}

/// `invoice.*` payload.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct InvoiceObject {
    pub id: String,
    #[serde(default)]
    pub customer: Option<String>,
    #[serde(default)]
    pub subscription: Option<String>,
}

/// `payment_method.*` payload.
///
/// Stripe clears `customer` on detach; the previous owner is then only in
/// `previous_attributes`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PaymentMethodObject {
    pub id: String,
    #[serde(default)]
    pub customer: Option<String>,
}

/// `customer.updated` payload.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CustomerObject {
    pub id: String,
    #[serde(default)]
    pub invoice_settings: Option<InvoiceSettings>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct InvoiceSettings {
    /// Either a payment method id or an expanded object; only presence matters.
    #[serde(default)]
    pub default_payment_method: Option<serde_json::Value>,
}

impl CustomerObject {
    pub fn has_default_payment_method(&self) -> bool {
        self.invoice_settings
            .as_ref()
            .and_then(|s| s.default_payment_method.as_ref())
            .map_or(false, |pm| !pm.is_null())
    }
}
