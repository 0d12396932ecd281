//! ListPurchaseOptionsHandler - Query handler listing what a user can still buy.

use std::sync::Arc;

use crate::domain::entitlement::{EntitlementError, PurchaseKind, PurchaseOption};
use crate::domain::foundation::{UserId, VideoId};
use crate::ports::{CatalogReader, EntitlementLedger, PriceOracle};

/// Query for the purchase options of one video.
#[derive(Debug, Clone)]
pub struct ListPurchaseOptionsQuery {
    pub video_id: VideoId,
    pub user_id: UserId,
    /// Simplified mode offers only the single-video purchase.
    pub simplified: bool,
}

/// Options in presentation order: video, series, module.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListPurchaseOptionsResult {
    pub options: Vec<PurchaseOption>,
}

/// Handler for listing purchase options.
///
/// Grants the user already holds are never offered again. An option whose
/// price cannot be resolved is dropped with a warning; catalog and ledger
/// failures still fail the whole query.
pub struct ListPurchaseOptionsHandler {
    catalog: Arc<dyn CatalogReader>,
    ledger: Arc<dyn EntitlementLedger>,
    prices: Arc<dyn PriceOracle>,
}

impl ListPurchaseOptionsHandler {
    pub fn new(
        catalog: Arc<dyn CatalogReader>,
        ledger: Arc<dyn EntitlementLedger>,
        prices: Arc<dyn PriceOracle>,
    ) -> Self {
        Self {
            catalog,
            ledger,
            prices,
        }
    }

    pub async fn handle(
        &self,
        query: ListPurchaseOptionsQuery,
    ) -> Result<ListPurchaseOptionsResult, EntitlementError> {
        let video = self
            .catalog
            .get_video(query.video_id)
            .await?
            .ok_or_else(|| EntitlementError::not_found("Video", query.video_id))?;

        let mut options = Vec::new();
        if !video.is_premium {
            return Ok(ListPurchaseOptionsResult { options });
        }

        if let Some(price_id) = video.price_ref() {
            if !self.ledger.has_direct_purchase(query.user_id, video.id).await? {
                options.extend(self.priced(PurchaseKind::Video, &video.title, price_id).await);
            }
        }

        if query.simplified {
            return Ok(ListPurchaseOptionsResult { options });
        }

        if let Some(series_name) = video.series_name() {
            if !self.ledger.has_series_purchase(query.user_id, series_name).await? {
                let series = self.catalog.get_series_by_name(series_name).await?;
                if let Some(price_id) = series.as_ref().and_then(|s| s.price_ref()) {
                    options.extend(self.priced(PurchaseKind::Series, series_name, price_id).await);
                }
            }
        }

        if let Some(module_name) = video.module_name() {
            if !self
                .ledger
                .has_live_module_subscription(query.user_id, module_name)
                .await?
            {
                let module = self.catalog.get_module_by_name(module_name).await?;
                if let Some(price_id) = module.as_ref().and_then(|m| m.price_ref()) {
                    options.extend(self.priced(PurchaseKind::Module, module_name, price_id).await);
                }
            }
        }

        Ok(ListPurchaseOptionsResult { options })
    }

    async fn priced(&self, kind: PurchaseKind, name: &str, price_id: &str) -> Option<PurchaseOption> {
        match self.prices.get_price(price_id).await {
            Ok(price) => Some(PurchaseOption::new(kind, name, price_id, price)),
            Err(err) => {
                let err = EntitlementError::pricing_unavailable(price_id, err.to_string());
                tracing::warn!(
                    kind = %kind,
                    price_id = %price_id,
                    error = %err,
                    "Omitting purchase option"
                );
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::*;
    use crate::domain::entitlement::{NewSubscription, PurchaseTarget, SubscriptionStatus};
    use crate::ports::BillingError;

    async fn setup() -> (Fixture, ListPurchaseOptionsHandler) {
        let fx = Fixture::new().await;
        let handler =
            ListPurchaseOptionsHandler::new(fx.catalog.clone(), fx.ledger.clone(), fx.billing_port());
        (fx, handler)
    }

    async fn list(
        handler: &ListPurchaseOptionsHandler,
        video_id: VideoId,
        simplified: bool,
    ) -> Vec<PurchaseOption> {
        handler
            .handle(ListPurchaseOptionsQuery {
                video_id,
                user_id: SUBSCRIBER,
                simplified,
            })
            .await
            .unwrap()
            .options
    }

    fn kinds(options: &[PurchaseOption]) -> Vec<PurchaseKind> {
        options.iter().map(|o| o.kind).collect()
    }

    #[tokio::test]
    async fn free_video_has_no_options() {
        let (fx, handler) = setup().await;

        assert!(list(&handler, FREE_VIDEO, false).await.is_empty());
        assert!(!fx.billing.was_called("get_price"));
    }

    #[tokio::test]
    async fn full_mode_lists_video_series_module_in_order() {
        let (_fx, handler) = setup().await;

        let options = list(&handler, DRAMA_EPISODE, false).await;
        assert_eq!(
            kinds(&options),
            vec![PurchaseKind::Video, PurchaseKind::Series, PurchaseKind::Module]
        );
        assert_eq!(options[0].name, "Drama Episode 1");
        assert_eq!(options[0].amount, 299);
        assert_eq!(options[1].name, "Drama");
        assert_eq!(options[1].price_id, "price_drama");
        assert_eq!(options[2].name, "Premium");
        assert_eq!(options[2].currency, "nzd");
    }

    #[tokio::test]
    async fn simplified_mode_offers_only_the_video() {
        let (_fx, handler) = setup().await;

        let options = list(&handler, DRAMA_EPISODE, true).await;
        assert_eq!(kinds(&options), vec![PurchaseKind::Video]);
    }

    #[tokio::test]
    async fn simplified_mode_without_video_price_is_empty() {
        let (_fx, handler) = setup().await;

        assert!(list(&handler, MODULE_ONLY_VIDEO, true).await.is_empty());
        assert_eq!(
            kinds(&list(&handler, MODULE_ONLY_VIDEO, false).await),
            vec![PurchaseKind::Module]
        );
    }

    #[tokio::test]
    async fn held_series_is_not_offered_again() {
        let (fx, handler) = setup().await;
        fx.ledger
            .insert_purchase(SUBSCRIBER, PurchaseTarget::Series(DRAMA))
            .await
            .unwrap();

        assert_eq!(
            kinds(&list(&handler, DRAMA_EPISODE, false).await),
            vec![PurchaseKind::Video, PurchaseKind::Module]
        );
    }

    #[tokio::test]
    async fn held_video_and_module_are_not_offered_again() {
        let (fx, handler) = setup().await;
        fx.ledger
            .insert_purchase(SUBSCRIBER, PurchaseTarget::Video(DRAMA_EPISODE))
            .await
            .unwrap();
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
            kinds(&list(&handler, DRAMA_EPISODE, false).await),
            vec![PurchaseKind::Series]
        );
    }

    #[tokio::test]
    async fn pricing_failure_omits_only_that_option() {
        let (fx, handler) = setup().await;
        fx.billing.set_method_error("get_price", BillingError::network("timeout"));

        assert!(list(&handler, DRAMA_EPISODE, false).await.is_empty());

        fx.billing.clear_errors();
        fx.billing.set_error(BillingError::network("blip"));

        // Only the first lookup (the video price) fails.
        assert_eq!(
            kinds(&list(&handler, DRAMA_EPISODE, false).await),
            vec![PurchaseKind::Series, PurchaseKind::Module]
        );
    }

    #[tokio::test]
    async fn missing_series_row_omits_series_option() {
        let (fx, handler) = setup().await;
        let mut video = fx.catalog.get_video(DRAMA_EPISODE).await.unwrap().unwrap();
        video.series = Some("Unlisted".to_string());
        fx.catalog.add_video(video);

        assert_eq!(
            kinds(&list(&handler, DRAMA_EPISODE, false).await),
            vec![PurchaseKind::Video, PurchaseKind::Module]
        );
    }

    #[tokio::test]
    async fn listing_twice_is_stable() {
        let (_fx, handler) = setup().await;

        let first = list(&handler, DRAMA_EPISODE, false).await;
        let second = list(&handler, DRAMA_EPISODE, false).await;
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn unknown_video_is_not_found() {
        let (_fx, handler) = setup().await;

        let result = handler
            .handle(ListPurchaseOptionsQuery {
                video_id: VideoId::new(404),
                user_id: SUBSCRIBER,
                simplified: false,
            })
            .await;
        assert!(matches!(result, Err(EntitlementError::NotFound { .. })));
    }
}
