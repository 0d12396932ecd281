//! Price oracle port.

use async_trait::async_trait;

use super::billing_provider::BillingError;
use crate::domain::entitlement::Price;

/// Resolves a processor price identifier to an amount and currency.
#[async_trait]
pub trait PriceOracle: Send + Sync {
    async fn get_price(&self, price_id: &str) -> Result<Price, BillingError>;
}
