//! RecordPurchaseHandler - Command handler that bills a purchase option and
//! records the resulting grant.
//!
//! The processor call always happens first. A ledger row is written only
//! after the processor confirms, so the ledger never claims a grant that
//! was not billed. If the ledger write then fails the processor side is
//! left as is and webhook reconciliation is the recovery path.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::domain::entitlement::{
    EntitlementError, NewSubscription, PurchaseKind, PurchaseTarget, SubscriptionStatus,
};
use crate::domain::foundation::{DomainError, Timestamp, UserId, VideoId};
use crate::ports::{
    BillingError, BillingProvider, CatalogReader, EntitlementLedger, ImmediateChargeRequest,
    LineItemRequest, ModuleSubscriptionRequest, UserRepository,
};

/// Command to purchase one option returned by the options listing.
#[derive(Debug, Clone)]
pub struct RecordPurchaseCommand {
    pub user_id: UserId,
    /// Raw kind as submitted: `video`, `series` or `module`.
    pub kind: String,
    /// Series or module name for those kinds; display name for videos.
    pub name: String,
    pub price_id: String,
    /// Required for video purchases.
    pub video_id: Option<VideoId>,
    pub simplified: bool,
}

/// Result of a recorded purchase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordPurchaseResult {
    pub kind: PurchaseKind,
    /// Invoice item, invoice, or subscription id at the processor.
    pub processor_reference: String,
}

/// How a one-time purchase is billed.
enum BillingRoute {
    /// Simplified mode: charge the customer now.
    Immediate,
    /// Invoice with the user's main subscription.
    MainSubscription { subscription_id: String },
}

/// Handler for recording purchases.
///
/// Every precondition and catalog lookup is checked before the processor is
/// called. Processor failures are reported as `BillingFailed` and never
/// retried here.
pub struct RecordPurchaseHandler {
    catalog: Arc<dyn CatalogReader>,
    ledger: Arc<dyn EntitlementLedger>,
    users: Arc<dyn UserRepository>,
    billing: Arc<dyn BillingProvider>,
}

impl RecordPurchaseHandler {
    pub fn new(
        catalog: Arc<dyn CatalogReader>,
        ledger: Arc<dyn EntitlementLedger>,
        users: Arc<dyn UserRepository>,
        billing: Arc<dyn BillingProvider>,
    ) -> Self {
        Self {
            catalog,
            ledger,
            users,
            billing,
        }
    }

    pub async fn handle(
        &self,
        cmd: RecordPurchaseCommand,
    ) -> Result<RecordPurchaseResult, EntitlementError> {
        let user = self
            .users
            .find_by_id(cmd.user_id)
            .await?
            .ok_or_else(|| EntitlementError::not_found("User", cmd.user_id))?;
        let customer_id = user.require_customer()?.to_string();

        let kind = PurchaseKind::parse(&cmd.kind)?;

        let route = if cmd.simplified {
            BillingRoute::Immediate
        } else {
            let main = self
                .ledger
                .find_main_subscription(cmd.user_id)
                .await?
                .ok_or(EntitlementError::NoMainSubscription(cmd.user_id))?;
            BillingRoute::MainSubscription {
                subscription_id: main.subscription_id,
            }
        };

        let processor_reference = match (kind, route) {
            (PurchaseKind::Video, route) => self.purchase_video(&cmd, &customer_id, route).await?,
            (PurchaseKind::Series, BillingRoute::MainSubscription { subscription_id }) => {
                self.purchase_series(&cmd, &customer_id, subscription_id)
                    .await?
            }
            (PurchaseKind::Module, BillingRoute::MainSubscription { .. }) => {
                self.purchase_module(&cmd, &customer_id).await?
            }
            (other, BillingRoute::Immediate) => {
                return Err(EntitlementError::invalid_purchase_kind(format!(
                    "{} (simplified mode sells single videos only)",
                    other
                )));
            }
        };

        tracing::info!(
            user_id = %cmd.user_id,
            kind = %kind,
            price_id = %cmd.price_id,
            processor_reference = %processor_reference,
            "Purchase recorded"
        );

        Ok(RecordPurchaseResult {
            kind,
            processor_reference,
        })
    }

    async fn purchase_video(
        &self,
        cmd: &RecordPurchaseCommand,
        customer_id: &str,
        route: BillingRoute,
    ) -> Result<String, EntitlementError> {
        let video_id = cmd
            .video_id
            .ok_or_else(|| EntitlementError::validation("video_id", "required for video purchases"))?;
        let video = self
            .catalog
            .get_video(video_id)
            .await?
            .ok_or_else(|| EntitlementError::not_found("Video", video_id))?;

        if !video.is_premium {
            return Err(EntitlementError::validation("video_id", "video is free to watch"));
        }
        ensure_price_matches(video.price_ref(), &cmd.price_id)?;

        let receipt = match route {
            BillingRoute::Immediate => {
                self.billing
                    .create_immediate_charge(ImmediateChargeRequest {
                        customer_id: customer_id.to_string(),
                        price_id: cmd.price_id.clone(),
                        description: video.title.clone(),
                    })
                    .await
            }
            BillingRoute::MainSubscription { subscription_id } => {
                self.billing
                    .add_line_item_to_main_subscription(LineItemRequest {
                        customer_id: customer_id.to_string(),
                        subscription_id,
                        price_id: cmd.price_id.clone(),
                        description: video.title.clone(),
                    })
                    .await
            }
        }
        .map_err(|e| billing_failed(cmd, e))?;

        self.ledger
            .insert_purchase(cmd.user_id, PurchaseTarget::Video(video.id))
            .await
            .map_err(|e| unrecorded(cmd, &receipt.reference, e))?;

        Ok(receipt.reference)
    }

    async fn purchase_series(
        &self,
        cmd: &RecordPurchaseCommand,
        customer_id: &str,
        main_subscription_id: String,
    ) -> Result<String, EntitlementError> {
        let series = self
            .catalog
            .get_series_by_name(&cmd.name)
            .await?
            .ok_or_else(|| EntitlementError::not_found("Series", &cmd.name))?;
        ensure_price_matches(series.price_ref(), &cmd.price_id)?;

        let receipt = self
            .billing
            .add_line_item_to_main_subscription(LineItemRequest {
                customer_id: customer_id.to_string(),
                subscription_id: main_subscription_id,
                price_id: cmd.price_id.clone(),
                description: format!("{} (series)", series.name),
            })
            .await
            .map_err(|e| billing_failed(cmd, e))?;

        self.ledger
            .insert_purchase(cmd.user_id, PurchaseTarget::Series(series.id))
            .await
            .map_err(|e| unrecorded(cmd, &receipt.reference, e))?;

        Ok(receipt.reference)
    }

    async fn purchase_module(
        &self,
        cmd: &RecordPurchaseCommand,
        customer_id: &str,
    ) -> Result<String, EntitlementError> {
        let module = self
            .catalog
            .get_module_by_name(&cmd.name)
            .await?
            .ok_or_else(|| EntitlementError::not_found("Module", &cmd.name))?;
        ensure_price_matches(module.price_ref(), &cmd.price_id)?;

        // A second subscription would bill monthly for a grant the ledger refuses.
        if self
            .ledger
            .has_live_module_subscription(cmd.user_id, &module.name)
            .await?
        {
            return Err(EntitlementError::validation(
                "name",
                format!("already subscribed to module {}", module.name),
            ));
        }

        let mut metadata = BTreeMap::new();
        metadata.insert("module".to_string(), module.name.clone());
        metadata.insert("user_id".to_string(), cmd.user_id.to_string());

        let subscription = self
            .billing
            .create_module_subscription(ModuleSubscriptionRequest {
                customer_id: customer_id.to_string(),
                price_id: cmd.price_id.clone(),
                billing_cycle_anchor: Timestamp::now().start_of_next_month(),
                metadata,
            })
            .await
            .map_err(|e| billing_failed(cmd, e))?;

        let status =
            SubscriptionStatus::parse(&subscription.status).unwrap_or(SubscriptionStatus::Active);
        let inserted = self
            .ledger
            .insert_subscription(NewSubscription::module(
                cmd.user_id,
                module.id,
                subscription.id.clone(),
                status,
            ))
            .await;

        if let Err(err) = inserted {
            // The creation webhook can land between billing and this insert.
            match self.ledger.find_subscription(&subscription.id).await {
                Ok(Some(row)) if row.user_id == cmd.user_id && row.module_id == Some(module.id) => {
                    tracing::info!(
                        user_id = %cmd.user_id,
                        subscription_id = %subscription.id,
                        "Module subscription already recorded by webhook"
                    );
                }
                _ => return Err(unrecorded(cmd, &subscription.id, err)),
            }
        }

        Ok(subscription.id)
    }
}

fn ensure_price_matches(catalog_price: Option<&str>, submitted: &str) -> Result<(), EntitlementError> {
    match catalog_price {
        Some(expected) if expected == submitted => Ok(()),
        Some(_) => Err(EntitlementError::validation(
            "price_id",
            "does not match the catalog price",
        )),
        None => Err(EntitlementError::validation(
            "price_id",
            "item is not for sale",
        )),
    }
}

fn billing_failed(cmd: &RecordPurchaseCommand, err: BillingError) -> EntitlementError {
    tracing::error!(
        user_id = %cmd.user_id,
        kind = %cmd.kind,
        price_id = %cmd.price_id,
        error = %err,
        "Processor rejected purchase"
    );
    EntitlementError::billing_failed(err.message)
}

fn unrecorded(cmd: &RecordPurchaseCommand, reference: &str, err: DomainError) -> EntitlementError {
    tracing::error!(
        user_id = %cmd.user_id,
        kind = %cmd.kind,
        processor_reference = %reference,
        error = %err,
        "Billed purchase not recorded in ledger; reconciliation required"
    );
    EntitlementError::infrastructure(err.to_string())
}
