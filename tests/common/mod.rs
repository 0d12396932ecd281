//! Shared catalog, users and billing stub for integration tests.
//!
//! - video 1: free
//! - video 2: premium, series "Drama", module "Premium", own price
//! - video 3: premium, module "Premium" only, no own price
//! - user 1: customer `cus_1`, main subscription `sub_main_1`
//! - user 2: no billing customer

#![allow(dead_code)]

use std::sync::Arc;

use vod_access::adapters::http::AppState;
use vod_access::adapters::memory::{
    InMemoryCatalog, InMemoryEntitlementLedger, InMemoryUserRepository,
};
use vod_access::adapters::stripe::MockBillingProvider;
use vod_access::domain::account::User;
use vod_access::domain::billing::StripeWebhookVerifier;
use vod_access::domain::catalog::{Module, Series, Video};
use vod_access::domain::entitlement::{NewSubscription, SubscriptionStatus};
use vod_access::domain::foundation::{ModuleId, SeriesId, UserId, VideoId};
use vod_access::ports::EntitlementLedger;

pub const WEBHOOK_SECRET: &str = "whsec_integration";
pub const BASE_URL: &str = "https://vod.example.com";

pub const FREE_VIDEO: VideoId = VideoId::new(1);
pub const DRAMA_EPISODE: VideoId = VideoId::new(2);
pub const MODULE_ONLY_VIDEO: VideoId = VideoId::new(3);
pub const DRAMA: SeriesId = SeriesId::new(1);
pub const PREMIUM: ModuleId = ModuleId::new(1);

pub const SUBSCRIBER: UserId = UserId::new(1);
pub const NEWCOMER: UserId = UserId::new(2);

pub struct World {
    pub catalog: Arc<InMemoryCatalog>,
    pub ledger: Arc<InMemoryEntitlementLedger>,
    pub users: Arc<InMemoryUserRepository>,
    pub billing: MockBillingProvider,
}

impl World {
    pub async fn new() -> Self {
        let catalog = Arc::new(InMemoryCatalog::new());
        catalog.add_video(video(FREE_VIDEO, false, None, None, None));
        catalog.add_video(video(
            DRAMA_EPISODE,
            true,
            Some("price_video_2"),
            Some("Drama"),
            Some("Premium"),
        ));
        catalog.add_video(video(MODULE_ONLY_VIDEO, true, None, None, Some("Premium")));
        catalog.add_series(Series {
            id: DRAMA,
            name: "Drama".to_string(),
            price_id: Some("price_drama".to_string()),
        });
        catalog.add_module(Module {
            id: PREMIUM,
            name: "Premium".to_string(),
            price_id: Some("price_premium".to_string()),
        });

        let ledger = Arc::new(InMemoryEntitlementLedger::new(catalog.clone()));
        ledger
            .insert_subscription(NewSubscription::main(
                SUBSCRIBER,
                "sub_main_1",
                SubscriptionStatus::Active,
            ))
            .await
            .unwrap();

        let users = Arc::new(InMemoryUserRepository::new());
        users.insert(User {
            id: SUBSCRIBER,
            email: "subscriber@example.com".to_string(),
            display_name: Some("Sam".to_string()),
            customer_id: Some("cus_1".to_string()),
            has_payment_method: true,
        });
        users.insert(User {
            id: NEWCOMER,
            email: "newcomer@example.com".to_string(),
            display_name: None,
            customer_id: None,
            has_payment_method: false,
        });

        let billing = MockBillingProvider::new();
        billing.set_price("price_video_2", 299, "nzd");
        billing.set_price("price_drama", 5000, "nzd");
        billing.set_price("price_premium", 2000, "nzd");

        Self {
            catalog,
            ledger,
            users,
            billing,
        }
    }

    pub fn app_state(&self) -> AppState {
        let billing = Arc::new(self.billing.clone());
        AppState {
            catalog: self.catalog.clone(),
            ledger: self.ledger.clone(),
            users: self.users.clone(),
            prices: billing.clone(),
            billing,
            webhook_verifier: Arc::new(StripeWebhookVerifier::new(WEBHOOK_SECRET)),
            public_base_url: BASE_URL.to_string(),
        }
    }
}

fn video(
    id: VideoId,
    is_premium: bool,
    price_id: Option<&str>,
    series: Option<&str>,
    module: Option<&str>,
) -> Video {
    Video {
        id,
        title: format!("Video {}", id),
        playback_ref: format!("yt-{}", id),
        is_premium,
        price_id: price_id.map(str::to_string),
        series: series.map(str::to_string),
        module: module.map(str::to_string),
    }
}

/// Serialized subscription event, signed with `WEBHOOK_SECRET`.
pub fn signed_subscription_event(
    event_id: &str,
    event_type: &str,
    subscription_id: &str,
    status: &str,
) -> (Vec<u8>, String) {
    let payload = serde_json::to_vec(&serde_json::json!({
        "id": event_id,
        "type": event_type,
        "created": chrono::Utc::now().timestamp(),
        "data": {"object": {
            "id": subscription_id,
            "customer": "cus_1",
            "status": status,
            "metadata": {}
        }}
    }))
    .unwrap();
    let signature = StripeWebhookVerifier::new(WEBHOOK_SECRET)
        .signature_header(chrono::Utc::now().timestamp(), &payload)
        .unwrap();
    (payload, signature)
}
