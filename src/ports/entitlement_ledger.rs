//! Entitlement ledger port.
//!
//! The ledger is the only writer of purchase and subscription rows. A
//! subscription row's presence is what grants access; its status column is
//! informational.

use async_trait::async_trait;

use crate::domain::entitlement::{
    NewSubscription, PurchaseTarget, SubscriptionStatus, UserSubscription,
};
use crate::domain::foundation::{DomainError, UserId, VideoId};

/// Per-user purchase and subscription records.
///
/// Every write is an independent row operation; callers never assume
/// atomicity across calls.
#[async_trait]
pub trait EntitlementLedger: Send + Sync {
    /// True if the user bought this video directly.
    async fn has_direct_purchase(&self, user_id: UserId, video_id: VideoId)
        -> Result<bool, DomainError>;

    /// True if the user bought the series with this name.
    async fn has_series_purchase(&self, user_id: UserId, series_name: &str)
        -> Result<bool, DomainError>;

    /// True if a subscription row exists for the module with this name.
    async fn has_live_module_subscription(
        &self,
        user_id: UserId,
        module_name: &str,
    ) -> Result<bool, DomainError>;

    /// Record a one-time purchase.
    async fn insert_purchase(&self, user_id: UserId, target: PurchaseTarget)
        -> Result<(), DomainError>;

    /// Record a subscription row.
    async fn insert_subscription(&self, subscription: NewSubscription) -> Result<(), DomainError>;

    /// Remove the row for a processor subscription. Returns whether a row was removed.
    async fn delete_subscription(&self, subscription_id: &str) -> Result<bool, DomainError>;

    /// The user's main subscription, if any.
    async fn find_main_subscription(
        &self,
        user_id: UserId,
    ) -> Result<Option<UserSubscription>, DomainError>;

    /// Look up a row by processor subscription id.
    async fn find_subscription(
        &self,
        subscription_id: &str,
    ) -> Result<Option<UserSubscription>, DomainError>;

    /// Record the processor status of a row. Returns whether a row matched.
    async fn update_subscription_status(
        &self,
        subscription_id: &str,
        status: SubscriptionStatus,
    ) -> Result<bool, DomainError>;
}
