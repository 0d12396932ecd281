//! Shared fixture for handler tests.
//!
//! Catalog:
//! - video 1: free
//! - video 2: premium, series "Drama", module "Premium", own price
//! - video 3: premium, module "Premium" only, no own price
//!
//! Users:
//! - user 1: customer `cus_1`, main subscription `sub_main_1`
//! - user 2: no processor customer

use std::sync::Arc;

use crate::adapters::memory::{InMemoryCatalog, InMemoryEntitlementLedger, InMemoryUserRepository};
use crate::adapters::stripe::MockBillingProvider;
use crate::domain::account::User;
use crate::domain::catalog::{Module, Series, Video};
use crate::domain::entitlement::{NewSubscription, SubscriptionStatus};
use crate::domain::foundation::{ModuleId, SeriesId, UserId, VideoId};
use crate::ports::EntitlementLedger;

pub const FREE_VIDEO: VideoId = VideoId::new(1);
pub const DRAMA_EPISODE: VideoId = VideoId::new(2);
pub const MODULE_ONLY_VIDEO: VideoId = VideoId::new(3);
pub const DRAMA: SeriesId = SeriesId::new(1);
pub const PREMIUM: ModuleId = ModuleId::new(1);

pub const SUBSCRIBER: UserId = UserId::new(1);
pub const NEWCOMER: UserId = UserId::new(2);

pub struct Fixture {
    pub catalog: Arc<InMemoryCatalog>,
    pub ledger: Arc<InMemoryEntitlementLedger>,
    pub users: Arc<InMemoryUserRepository>,
    pub billing: MockBillingProvider,
}

impl Fixture {
    pub async fn new() -> Self {
        let catalog = Arc::new(InMemoryCatalog::new());
        catalog.add_video(Video {
            id: FREE_VIDEO,
            title: "Trailer".to_string(),
            playback_ref: "yt-trailer".to_string(),
            is_premium: false,
            price_id: None,
            series: None,
            module: None,
        });
        catalog.add_video(Video {
            id: DRAMA_EPISODE,
            title: "Drama Episode 1".to_string(),
            playback_ref: "yt-drama-1".to_string(),
            is_premium: true,
            price_id: Some("price_video_2".to_string()),
            series: Some("Drama".to_string()),
            module: Some("Premium".to_string()),
        });
        catalog.add_video(Video {
            id: MODULE_ONLY_VIDEO,
            title: "Masterclass".to_string(),
            playback_ref: "yt-master".to_string(),
            is_premium: true,
            price_id: None,
            series: None,
            module: Some("Premium".to_string()),
        });
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

    pub fn billing_port(&self) -> Arc<MockBillingProvider> {
        Arc::new(self.billing.clone())
    }
}
