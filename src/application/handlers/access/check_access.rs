//! CheckAccessHandler - Query handler deciding whether a user may watch a video.

use std::sync::Arc;

use crate::domain::catalog::Video;
use crate::domain::entitlement::{AccessDecision, EntitlementError};
use crate::domain::foundation::{UserId, VideoId};
use crate::ports::{CatalogReader, EntitlementLedger};

/// Query to check access to one video.
#[derive(Debug, Clone)]
pub struct CheckAccessQuery {
    pub video_id: VideoId,
    /// Authenticated identity; not re-validated here.
    pub user_id: UserId,
}

/// Result of access check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckAccessResult {
    pub has_access: bool,
    /// Which grant allowed access, or `Denied`.
    pub decision: AccessDecision,
}

/// Handler for checking video access.
///
/// Access is the OR of three grants. They are checked cheapest-first and
/// the first hit short-circuits the rest. Pure read.
pub struct CheckAccessHandler {
    catalog: Arc<dyn CatalogReader>,
    ledger: Arc<dyn EntitlementLedger>,
}

impl CheckAccessHandler {
    pub fn new(catalog: Arc<dyn CatalogReader>, ledger: Arc<dyn EntitlementLedger>) -> Self {
        Self { catalog, ledger }
    }

    pub async fn handle(&self, query: CheckAccessQuery) -> Result<CheckAccessResult, EntitlementError> {
        let video = self
            .catalog
            .get_video(query.video_id)
            .await?
            .ok_or_else(|| EntitlementError::not_found("Video", query.video_id))?;

        let decision = self.decide(&video, query.user_id).await?;

        Ok(CheckAccessResult {
            has_access: decision.is_granted(),
            decision,
        })
    }

    async fn decide(&self, video: &Video, user_id: UserId) -> Result<AccessDecision, EntitlementError> {
        if !video.is_premium {
            return Ok(AccessDecision::Free);
        }

        if self.ledger.has_direct_purchase(user_id, video.id).await? {
            return Ok(AccessDecision::DirectPurchase);
        }

        if let Some(series) = video.series_name() {
            if self.ledger.has_series_purchase(user_id, series).await? {
                return Ok(AccessDecision::SeriesPurchase);
            }
        }

        if let Some(module) = video.module_name() {
            if self.ledger.has_live_module_subscription(user_id, module).await? {
                return Ok(AccessDecision::ModuleSubscription);
            }
        }

        Ok(AccessDecision::Denied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::*;
    use crate::domain::entitlement::{NewSubscription, PurchaseTarget, SubscriptionStatus};

    async fn setup() -> (Fixture, CheckAccessHandler) {
        let fx = Fixture::new().await;
        let handler = CheckAccessHandler::new(fx.catalog.clone(), fx.ledger.clone());
        (fx, handler)
    }

    async fn check(handler: &CheckAccessHandler, video_id: VideoId, user_id: UserId) -> CheckAccessResult {
        handler
            .handle(CheckAccessQuery { video_id, user_id })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn free_video_is_always_accessible() {
        let (_fx, handler) = setup().await;

        let result = check(&handler, FREE_VIDEO, NEWCOMER).await;
        assert!(result.has_access);
        assert_eq!(result.decision, AccessDecision::Free);
    }

    #[tokio::test]
    async fn premium_video_without_grants_is_denied() {
        let (_fx, handler) = setup().await;

        let result = check(&handler, DRAMA_EPISODE, SUBSCRIBER).await;
        assert!(!result.has_access);
        assert_eq!(result.decision, AccessDecision::Denied);
    }

    #[tokio::test]
    async fn direct_purchase_grants_access() {
        let (fx, handler) = setup().await;
        fx.ledger
            .insert_purchase(SUBSCRIBER, PurchaseTarget::Video(DRAMA_EPISODE))
            .await
            .unwrap();

        let result = check(&handler, DRAMA_EPISODE, SUBSCRIBER).await;
        assert_eq!(result.decision, AccessDecision::DirectPurchase);
    }

    #[tokio::test]
    async fn series_purchase_grants_access() {
        let (fx, handler) = setup().await;
        fx.ledger
            .insert_purchase(SUBSCRIBER, PurchaseTarget::Series(DRAMA))
            .await
            .unwrap();

        let result = check(&handler, DRAMA_EPISODE, SUBSCRIBER).await;
        assert_eq!(result.decision, AccessDecision::SeriesPurchase);
        // Another user is unaffected.
        assert!(!check(&handler, DRAMA_EPISODE, NEWCOMER).await.has_access);
    }

    #[tokio::test]
    async fn module_subscription_grants_access() {
        let (fx, handler) = setup().await;
        fx.ledger
            .insert_subscription(NewSubscription::module(
                SUBSCRIBER,
                PREMIUM,
                "sub_mod",
                SubscriptionStatus::Active,
            ))
            .await
            .unwrap();

        assert_eq!(
            check(&handler, MODULE_ONLY_VIDEO, SUBSCRIBER).await.decision,
            AccessDecision::ModuleSubscription
        );
        assert_eq!(
            check(&handler, DRAMA_EPISODE, SUBSCRIBER).await.decision,
            AccessDecision::ModuleSubscription
        );
    }

    #[tokio::test]
    async fn main_subscription_alone_grants_nothing() {
        let (fx, handler) = setup().await;
        assert!(fx.ledger.find_main_subscription(SUBSCRIBER).await.unwrap().is_some());

        assert!(!check(&handler, MODULE_ONLY_VIDEO, SUBSCRIBER).await.has_access);
    }

    #[tokio::test]
    async fn unknown_video_is_not_found() {
        let (_fx, handler) = setup().await;

        let err = handler
            .handle(CheckAccessQuery {
                video_id: VideoId::new(999),
                user_id: SUBSCRIBER,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, EntitlementError::NotFound { ref resource, .. } if resource == "Video"));
    }

    #[tokio::test]
    async fn storage_failure_is_infrastructure_error() {
        let (fx, handler) = setup().await;
        fx.catalog.set_failing(true);

        let err = handler
            .handle(CheckAccessQuery {
                video_id: DRAMA_EPISODE,
                user_id: SUBSCRIBER,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, EntitlementError::Infrastructure(_)));
    }
}
