//! In-memory entitlement ledger.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use super::{unavailable, InMemoryCatalog};
use crate::domain::entitlement::{
    NewSubscription, PurchaseTarget, SubscriptionStatus, UserPurchase, UserSubscription,
};
use crate::domain::foundation::{DomainError, Timestamp, UserId, VideoId};
use crate::ports::EntitlementLedger;

/// In-memory implementation of the `EntitlementLedger` port.
///
/// Series and module names are resolved through the shared catalog, the
/// way the SQL implementation joins on the name columns.
pub struct InMemoryEntitlementLedger {
    catalog: Arc<InMemoryCatalog>,
    purchases: Mutex<Vec<UserPurchase>>,
    subscriptions: Mutex<Vec<UserSubscription>>,
    fail_writes: AtomicBool,
}

impl InMemoryEntitlementLedger {
    pub fn new(catalog: Arc<InMemoryCatalog>) -> Self {
        Self {
            catalog,
            purchases: Mutex::new(Vec::new()),
            subscriptions: Mutex::new(Vec::new()),
            fail_writes: AtomicBool::new(false),
        }
    }

    /// Returns all purchase rows.
    pub fn purchases(&self) -> Vec<UserPurchase> {
        self.purchases.lock().unwrap().clone()
    }

    /// Returns all subscription rows.
    pub fn subscriptions(&self) -> Vec<UserSubscription> {
        self.subscriptions.lock().unwrap().clone()
    }

    /// Makes every subsequent write fail with a database error.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn check_write(&self) -> Result<(), DomainError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(unavailable());
        }
        Ok(())
    }
}

#[async_trait]
impl EntitlementLedger for InMemoryEntitlementLedger {
    async fn has_direct_purchase(
        &self,
        user_id: UserId,
        video_id: VideoId,
    ) -> Result<bool, DomainError> {
        let target = PurchaseTarget::Video(video_id);
        Ok(self
            .purchases
            .lock()
            .unwrap()
            .iter()
            .any(|p| p.user_id == user_id && p.target == target))
    }

    async fn has_series_purchase(
        &self,
        user_id: UserId,
        series_name: &str,
    ) -> Result<bool, DomainError> {
        let Some(series_id) = self.catalog.series_id(series_name) else {
            return Ok(false);
        };
        let target = PurchaseTarget::Series(series_id);
        Ok(self
            .purchases
            .lock()
            .unwrap()
            .iter()
            .any(|p| p.user_id == user_id && p.target == target))
    }

    async fn has_live_module_subscription(
        &self,
        user_id: UserId,
        module_name: &str,
    ) -> Result<bool, DomainError> {
        let Some(module_id) = self.catalog.module_id(module_name) else {
            return Ok(false);
        };
        Ok(self
            .subscriptions
            .lock()
            .unwrap()
            .iter()
            .any(|s| s.user_id == user_id && s.module_id == Some(module_id)))
    }

    async fn insert_purchase(
        &self,
        user_id: UserId,
        target: PurchaseTarget,
    ) -> Result<(), DomainError> {
        self.check_write()?;
        let mut purchases = self.purchases.lock().unwrap();
        // Duplicate grants collapse into one, like ON CONFLICT DO NOTHING.
        if !purchases
            .iter()
            .any(|p| p.user_id == user_id && p.target == target)
        {
            purchases.push(UserPurchase {
                user_id,
                target,
                purchased_at: Timestamp::now(),
            });
        }
        Ok(())
    }

    async fn insert_subscription(&self, subscription: NewSubscription) -> Result<(), DomainError> {
        self.check_write()?;
        let mut rows = self.subscriptions.lock().unwrap();

        if rows
            .iter()
            .any(|s| s.subscription_id == subscription.subscription_id)
        {
            return Err(DomainError::database("duplicate subscription_id")
                .with_detail("subscription_id", subscription.subscription_id));
        }
        if subscription.is_main
            && rows
                .iter()
                .any(|s| s.user_id == subscription.user_id && s.is_main)
        {
            return Err(DomainError::database("user already has a main subscription")
                .with_detail("user_id", subscription.user_id.to_string()));
        }
        if subscription.module_id.is_some()
            && rows.iter().any(|s| {
                s.user_id == subscription.user_id && s.module_id == subscription.module_id
            })
        {
            return Err(DomainError::database("module subscription already live")
                .with_detail("user_id", subscription.user_id.to_string()));
        }

        rows.push(subscription.into_subscription());
        Ok(())
    }

    async fn delete_subscription(&self, subscription_id: &str) -> Result<bool, DomainError> {
        self.check_write()?;
        let mut rows = self.subscriptions.lock().unwrap();
        let before = rows.len();
        rows.retain(|s| s.subscription_id != subscription_id);
        Ok(rows.len() != before)
    }

    async fn find_main_subscription(
        &self,
        user_id: UserId,
    ) -> Result<Option<UserSubscription>, DomainError> {
        Ok(self
            .subscriptions
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.user_id == user_id && s.is_main)
            .cloned())
    }

    async fn find_subscription(
        &self,
        subscription_id: &str,
    ) -> Result<Option<UserSubscription>, DomainError> {
        Ok(self
            .subscriptions
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.subscription_id == subscription_id)
            .cloned())
    }

    async fn update_subscription_status(
        &self,
        subscription_id: &str,
        status: SubscriptionStatus,
    ) -> Result<bool, DomainError> {
        self.check_write()?;
        let mut rows = self.subscriptions.lock().unwrap();
        match rows.iter_mut().find(|s| s.subscription_id == subscription_id) {
            Some(row) => {
                row.status = status;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::{Module, Series};
    use crate::domain::foundation::{ModuleId, SeriesId};

    fn ledger() -> InMemoryEntitlementLedger {
        let catalog = Arc::new(InMemoryCatalog::new());
        catalog.add_series(Series {
            id: SeriesId::new(1),
            name: "Drama".to_string(),
            price_id: Some("price_drama".to_string()),
        });
        catalog.add_module(Module {
            id: ModuleId::new(1),
            name: "Premium".to_string(),
            price_id: Some("price_premium".to_string()),
        });
        InMemoryEntitlementLedger::new(catalog)
    }

    const USER: UserId = UserId::new(1);

    #[tokio::test]
    async fn series_purchase_is_found_by_name() {
        let ledger = ledger();
        ledger
            .insert_purchase(USER, PurchaseTarget::Series(SeriesId::new(1)))
            .await
            .unwrap();

        assert!(ledger.has_series_purchase(USER, "Drama").await.unwrap());
        assert!(!ledger.has_series_purchase(USER, "Comedy").await.unwrap());
        assert!(!ledger.has_series_purchase(UserId::new(2), "Drama").await.unwrap());
    }

    #[tokio::test]
    async fn duplicate_purchase_is_collapsed() {
        let ledger = ledger();
        let target = PurchaseTarget::Video(VideoId::new(2));
        ledger.insert_purchase(USER, target).await.unwrap();
        ledger.insert_purchase(USER, target).await.unwrap();

        assert_eq!(ledger.purchases().len(), 1);
    }

    #[tokio::test]
    async fn subscription_presence_grants_module_regardless_of_status() {
        let ledger = ledger();
        ledger
            .insert_subscription(NewSubscription::module(
                USER,
                ModuleId::new(1),
                "sub_1",
                SubscriptionStatus::PastDue,
            ))
            .await
            .unwrap();

        assert!(ledger.has_live_module_subscription(USER, "Premium").await.unwrap());
    }

    #[tokio::test]
    async fn delete_reports_whether_row_existed() {
        let ledger = ledger();
        ledger
            .insert_subscription(NewSubscription::main(USER, "sub_main", SubscriptionStatus::Active))
            .await
            .unwrap();

        assert!(ledger.delete_subscription("sub_main").await.unwrap());
        assert!(!ledger.delete_subscription("sub_main").await.unwrap());
        assert!(ledger.find_main_subscription(USER).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn second_main_subscription_is_rejected() {
        let ledger = ledger();
        ledger
            .insert_subscription(NewSubscription::main(USER, "sub_a", SubscriptionStatus::Active))
            .await
            .unwrap();

        let result = ledger
            .insert_subscription(NewSubscription::main(USER, "sub_b", SubscriptionStatus::Active))
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn status_update_touches_only_matching_row() {
        let ledger = ledger();
        ledger
            .insert_subscription(NewSubscription::main(USER, "sub_a", SubscriptionStatus::Active))
            .await
            .unwrap();

        assert!(ledger
            .update_subscription_status("sub_a", SubscriptionStatus::PastDue)
            .await
            .unwrap());
        assert!(!ledger
            .update_subscription_status("sub_missing", SubscriptionStatus::PastDue)
            .await
            .unwrap());
        assert_eq!(
            ledger.find_subscription("sub_a").await.unwrap().unwrap().status,
            SubscriptionStatus::PastDue
        );
    }

    #[tokio::test]
    async fn failing_writes_leave_ledger_untouched() {
        let ledger = ledger();
        ledger.set_fail_writes(true);

        let result = ledger
            .insert_purchase(USER, PurchaseTarget::Video(VideoId::new(2)))
            .await;
        assert!(result.is_err());
        assert!(ledger.purchases().is_empty());
    }
}
