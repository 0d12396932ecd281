//! Recurring subscription grants.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::{ModuleId, Timestamp, UserId};

/// Processor-side subscription status.
///
/// Stored alongside each ledger row for diagnostics. Access is decided by
/// row presence, never by this value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    Active,
    Trialing,
    PastDue,
    Unpaid,
    Incomplete,
    IncompleteExpired,
    Canceled,
    Paused,
}

impl SubscriptionStatus {
    /// Parses the processor's status string. Unrecognized values yield `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        let status = match raw {
            "active" => SubscriptionStatus::Active,
            "trialing" => SubscriptionStatus::Trialing,
            "past_due" => SubscriptionStatus::PastDue,
            "unpaid" => SubscriptionStatus::Unpaid,
            "incomplete" => SubscriptionStatus::Incomplete,
            "incomplete_expired" => SubscriptionStatus::IncompleteExpired,
            "canceled" => SubscriptionStatus::Canceled,
            "paused" => SubscriptionStatus::Paused,
            _ => return None,
        };
        Some(status)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionStatus::Active => "active",
            SubscriptionStatus::Trialing => "trialing",
            SubscriptionStatus::PastDue => "past_due",
            SubscriptionStatus::Unpaid => "unpaid",
            SubscriptionStatus::Incomplete => "incomplete",
            SubscriptionStatus::IncompleteExpired => "incomplete_expired",
            SubscriptionStatus::Canceled => "canceled",
            SubscriptionStatus::Paused => "paused",
        }
    }

    /// Statuses for which reconciliation keeps (or restores) a ledger row.
    pub fn keeps_row(&self) -> bool {
        matches!(
            self,
            SubscriptionStatus::Active | SubscriptionStatus::Trialing | SubscriptionStatus::PastDue
        )
    }
}

impl fmt::Display for SubscriptionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A live recurring grant tied to a processor subscription.
///
/// `module_id` is `None` only for the main subscription, which grants no
/// content by itself and anchors one-time line items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSubscription {
    pub user_id: UserId,
    pub module_id: Option<ModuleId>,
    pub subscription_id: String,
    pub status: SubscriptionStatus,
    pub is_main: bool,
    pub started_at: Timestamp,
    pub ended_at: Option<Timestamp>,
}

/// Insert shape for a ledger subscription row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSubscription {
    pub user_id: UserId,
    pub module_id: Option<ModuleId>,
    pub subscription_id: String,
    pub status: SubscriptionStatus,
    pub is_main: bool,
    pub started_at: Timestamp,
}

impl NewSubscription {
    /// A module subscription row.
    pub fn module(
        user_id: UserId,
        module_id: ModuleId,
        subscription_id: impl Into<String>,
        status: SubscriptionStatus,
    ) -> Self {
        Self {
            user_id,
            module_id: Some(module_id),
            subscription_id: subscription_id.into(),
            status,
            is_main: false,
            started_at: Timestamp::now(),
        }
    }

    /// The user's main (baseline) subscription row.
    pub fn main(
        user_id: UserId,
        subscription_id: impl Into<String>,
        status: SubscriptionStatus,
    ) -> Self {
        Self {
            user_id,
            module_id: None,
            subscription_id: subscription_id.into(),
            status,
            is_main: true,
            started_at: Timestamp::now(),
        }
    }

    pub fn into_subscription(self) -> UserSubscription {
        UserSubscription {
            user_id: self.user_id,
            module_id: self.module_id,
            subscription_id: self.subscription_id,
            status: self.status,
            is_main: self.is_main,
            started_at: self.started_at,
            ended_at: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parses_processor_strings() {
        assert_eq!(SubscriptionStatus::parse("active"), Some(SubscriptionStatus::Active));
        assert_eq!(SubscriptionStatus::parse("past_due"), Some(SubscriptionStatus::PastDue));
        assert_eq!(SubscriptionStatus::parse("canceled"), Some(SubscriptionStatus::Canceled));
        assert_eq!(SubscriptionStatus::parse("bogus"), None);
    }

    #[test]
    fn status_round_trips_through_as_str() {
        for status in [
            SubscriptionStatus::Active,
            SubscriptionStatus::Trialing,
            SubscriptionStatus::PastDue,
            SubscriptionStatus::Unpaid,
            SubscriptionStatus::Incomplete,
            SubscriptionStatus::IncompleteExpired,
            SubscriptionStatus::Canceled,
            SubscriptionStatus::Paused,
        ] {
            assert_eq!(SubscriptionStatus::parse(status.as_str()), Some(status));
        }
    }

    #[test]
    fn only_live_statuses_keep_rows() {
        assert!(SubscriptionStatus::Active.keeps_row());
        assert!(SubscriptionStatus::PastDue.keeps_row());
        assert!(!SubscriptionStatus::Canceled.keeps_row());
        assert!(!SubscriptionStatus::IncompleteExpired.keeps_row());
    }

    #[test]
    fn module_row_is_never_main() {
        let row = NewSubscription::module(
            UserId::new(1),
            ModuleId::new(3),
            "sub_123",
            SubscriptionStatus::Active,
        );
        assert!(!row.is_main);
        assert_eq!(row.module_id, Some(ModuleId::new(3)));
    }

    #[test]
    fn main_row_has_no_module() {
        let row = NewSubscription::main(UserId::new(1), "sub_main", SubscriptionStatus::Active)
            .into_subscription();
        assert!(row.is_main);
        assert!(row.module_id.is_none());
        assert!(row.ended_at.is_none());
    }
}
