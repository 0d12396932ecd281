//! Shared application state for the HTTP layer.

use std::sync::Arc;

use crate::application::handlers::{
    CheckAccessHandler, CreatePortalSessionHandler, GetUserHandler, GetVideoHandler,
    HandleBillingWebhookHandler, ListPurchaseOptionsHandler, ListVideosHandler,
    RecordPurchaseHandler, StartPaymentSetupHandler, VerifyPaymentMethodHandler,
};
use crate::domain::billing::StripeWebhookVerifier;
use crate::ports::{BillingProvider, CatalogReader, EntitlementLedger, PriceOracle, UserRepository};

/// Shared application state containing all dependencies.
///
/// Cloned per request; every field is an `Arc`. Handlers are built on
/// demand from these ports.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<dyn CatalogReader>,
    pub ledger: Arc<dyn EntitlementLedger>,
    pub users: Arc<dyn UserRepository>,
    pub prices: Arc<dyn PriceOracle>,
    pub billing: Arc<dyn BillingProvider>,
    pub webhook_verifier: Arc<StripeWebhookVerifier>,
    /// Origin used to build processor redirect URLs.
    pub public_base_url: String,
}

impl AppState {
    pub fn list_videos_handler(&self) -> ListVideosHandler {
        ListVideosHandler::new(self.catalog.clone())
    }

    pub fn get_video_handler(&self) -> GetVideoHandler {
        GetVideoHandler::new(self.catalog.clone())
    }

    pub fn check_access_handler(&self) -> CheckAccessHandler {
        CheckAccessHandler::new(self.catalog.clone(), self.ledger.clone())
    }

    pub fn purchase_options_handler(&self) -> ListPurchaseOptionsHandler {
        ListPurchaseOptionsHandler::new(
            self.catalog.clone(),
            self.ledger.clone(),
            self.prices.clone(),
        )
    }

    pub fn record_purchase_handler(&self) -> RecordPurchaseHandler {
        RecordPurchaseHandler::new(
            self.catalog.clone(),
            self.ledger.clone(),
            self.users.clone(),
            self.billing.clone(),
        )
    }

    pub fn get_user_handler(&self) -> GetUserHandler {
        GetUserHandler::new(self.users.clone())
    }

    pub fn payment_setup_handler(&self) -> StartPaymentSetupHandler {
        StartPaymentSetupHandler::new(
            self.users.clone(),
            self.billing.clone(),
            self.public_base_url.clone(),
        )
    }

    pub fn portal_session_handler(&self) -> CreatePortalSessionHandler {
        CreatePortalSessionHandler::new(
            self.users.clone(),
            self.billing.clone(),
            &self.public_base_url,
        )
    }

    pub fn verify_payment_method_handler(&self) -> VerifyPaymentMethodHandler {
        VerifyPaymentMethodHandler::new(self.users.clone(), self.billing.clone())
    }

    pub fn webhook_handler(&self) -> HandleBillingWebhookHandler {
        HandleBillingWebhookHandler::new(
            self.webhook_verifier.clone(),
            self.ledger.clone(),
            self.users.clone(),
            self.catalog.clone(),
            self.billing.clone(),
        )
    }
}
