//! PostgreSQL implementation of EntitlementLedger.
//!
//! Series and module grants are matched by name through a join, mirroring
//! how videos reference them.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::entitlement::{
    NewSubscription, PurchaseTarget, SubscriptionStatus, UserSubscription,
};
use crate::domain::foundation::{DomainError, ErrorCode, ModuleId, Timestamp, UserId, VideoId};
use crate::ports::EntitlementLedger;

/// PostgreSQL entitlement ledger.
pub struct PostgresEntitlementLedger {
    pool: PgPool,
}

impl PostgresEntitlementLedger {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct SubscriptionRow {
    user_id: i64,
    module_id: Option<i64>,
    subscription_id: String,
    status: String,
    is_main: bool,
    started_at: DateTime<Utc>,
    ended_at: Option<DateTime<Utc>>,
}

impl TryFrom<SubscriptionRow> for UserSubscription {
    type Error = DomainError;

    fn try_from(row: SubscriptionRow) -> Result<Self, Self::Error> {
        let status = SubscriptionStatus::parse(&row.status).ok_or_else(|| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Invalid subscription status: {}", row.status),
            )
        })?;

        Ok(UserSubscription {
            user_id: UserId::new(row.user_id),
            module_id: row.module_id.map(ModuleId::new),
            subscription_id: row.subscription_id,
            status,
            is_main: row.is_main,
            started_at: Timestamp::from_datetime(row.started_at),
            ended_at: row.ended_at.map(Timestamp::from_datetime),
        })
    }
}

const SUBSCRIPTION_COLUMNS: &str =
    "user_id, module_id, subscription_id, status, is_main, started_at, ended_at";

fn query_failed(what: &str, err: sqlx::Error) -> DomainError {
    DomainError::database(format!("Failed to {}: {}", what, err))
}

#[async_trait]
impl EntitlementLedger for PostgresEntitlementLedger {
    async fn has_direct_purchase(
        &self,
        user_id: UserId,
        video_id: VideoId,
    ) -> Result<bool, DomainError> {
        sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM user_purchases WHERE user_id = $1 AND video_id = $2)",
        )
        .bind(user_id.as_i64())
        .bind(video_id.as_i64())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| query_failed("check video purchase", e))
    }

    async fn has_series_purchase(
        &self,
        user_id: UserId,
        series_name: &str,
    ) -> Result<bool, DomainError> {
        sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1
                FROM user_purchases p
                JOIN series s ON s.id = p.series_id
                WHERE p.user_id = $1 AND s.name = $2
            )
            "#,
        )
        .bind(user_id.as_i64())
        .bind(series_name)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| query_failed("check series purchase", e))
    }

    async fn has_live_module_subscription(
        &self,
        user_id: UserId,
        module_name: &str,
    ) -> Result<bool, DomainError> {
        // Row presence is the grant; status is recorded but not consulted.
        sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1
                FROM user_subscriptions us
                JOIN modules m ON m.id = us.module_id
                WHERE us.user_id = $1 AND m.name = $2
            )
            "#,
        )
        .bind(user_id.as_i64())
        .bind(module_name)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| query_failed("check module subscription", e))
    }

    async fn insert_purchase(
        &self,
        user_id: UserId,
        target: PurchaseTarget,
    ) -> Result<(), DomainError> {
        let (video_id, series_id) = match target {
            PurchaseTarget::Video(id) => (Some(id.as_i64()), None),
            PurchaseTarget::Series(id) => (None, Some(id.as_i64())),
        };

        sqlx::query(
            r#"
            INSERT INTO user_purchases (user_id, video_id, series_id)
            VALUES ($1, $2, $3)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(user_id.as_i64())
        .bind(video_id)
        .bind(series_id)
        .execute(&self.pool)
        .await
        .map_err(|e| query_failed("record purchase", e))?;

        Ok(())
    }

    async fn insert_subscription(&self, subscription: NewSubscription) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO user_subscriptions
                (user_id, module_id, subscription_id, status, is_main, started_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(subscription.user_id.as_i64())
        .bind(subscription.module_id.map(|m| m.as_i64()))
        .bind(&subscription.subscription_id)
        .bind(subscription.status.as_str())
        .bind(subscription.is_main)
        .bind(subscription.started_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if let Some(constraint) = db_err.constraint() {
                    return DomainError::database("Subscription conflicts with an existing row")
                        .with_detail("constraint", constraint)
                        .with_detail("subscription_id", subscription.subscription_id.as_str());
                }
            }
            query_failed("record subscription", e)
        })?;

        Ok(())
    }

    async fn delete_subscription(&self, subscription_id: &str) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM user_subscriptions WHERE subscription_id = $1")
            .bind(subscription_id)
            .execute(&self.pool)
            .await
            .map_err(|e| query_failed("delete subscription", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn find_main_subscription(
        &self,
        user_id: UserId,
    ) -> Result<Option<UserSubscription>, DomainError> {
        let row: Option<SubscriptionRow> = sqlx::query_as(&format!(
            "SELECT {} FROM user_subscriptions WHERE user_id = $1 AND is_main",
            SUBSCRIPTION_COLUMNS
        ))
        .bind(user_id.as_i64())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| query_failed("fetch main subscription", e))?;

        row.map(UserSubscription::try_from).transpose()
    }

    async fn find_subscription(
        &self,
        subscription_id: &str,
    ) -> Result<Option<UserSubscription>, DomainError> {
        let row: Option<SubscriptionRow> = sqlx::query_as(&format!(
            "SELECT {} FROM user_subscriptions WHERE subscription_id = $1",
            SUBSCRIPTION_COLUMNS
        ))
        .bind(subscription_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| query_failed("fetch subscription", e))?;

        row.map(UserSubscription::try_from).transpose()
    }

    async fn update_subscription_status(
        &self,
        subscription_id: &str,
        status: SubscriptionStatus,
    ) -> Result<bool, DomainError> {
        let result =
            sqlx::query("UPDATE user_subscriptions SET status = $2 WHERE subscription_id = $1")
                .bind(subscription_id)
                .bind(status.as_str())
                .execute(&self.pool)
                .await
                .map_err(|e| query_failed("update subscription status", e))?;

        Ok(result.rows_affected() > 0)
    }
}
