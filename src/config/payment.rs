//! Payment configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::error::ValidationError;
use crate::adapters::stripe::{StripeConfig, DEFAULT_API_BASE};

/// Payment configuration (Stripe)
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentConfig {
    /// Secret (`sk_`) or restricted (`rk_`) API key
    pub stripe_api_key: SecretString,

    /// Webhook endpoint signing secret (`whsec_`)
    pub stripe_webhook_secret: SecretString,

    /// API origin; overridden for local stubs
    #[serde(default = "default_api_base")]
    pub stripe_api_base: String,
}

impl PaymentConfig {
    /// Check if using Stripe test mode
    pub fn is_test_mode(&self) -> bool {
        let key = self.stripe_api_key.expose_secret();
        key.starts_with("sk_test_") || key.starts_with("rk_test_")
    }

    /// Client configuration for the Stripe adapter
    pub fn stripe_config(&self) -> StripeConfig {
        StripeConfig::new(self.stripe_api_key.clone()).with_base_url(&self.stripe_api_base)
    }

    /// Validate payment configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        let api_key = self.stripe_api_key.expose_secret();
        let webhook_secret = self.stripe_webhook_secret.expose_secret();

        if api_key.is_empty() {
            return Err(ValidationError::MissingRequired("VOD_PAYMENT__STRIPE_API_KEY"));
        }
        if webhook_secret.is_empty() {
            return Err(ValidationError::MissingRequired(
                "PAYMENT__STRIPE_WEBHOOK_SECRET",
            ));
        }
        // Publishable keys (pk_) cannot create charges.
        if !api_key.starts_with("sk_") && !api_key.starts_with("rk_") {
            return Err(ValidationError::InvalidStripeKey);
        }
        if !webhook_secret.starts_with("whsec_") {
            return Err(ValidationError::InvalidStripeWebhookSecret);
        }
        if !self.stripe_api_base.starts_with("http://") && !self.stripe_api_base.starts_with("https://") {
            return Err(ValidationError::InvalidStripeApiBase);
        }
        Ok(())
    }
}

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}
