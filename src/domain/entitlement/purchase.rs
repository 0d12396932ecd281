//! Purchase options and one-time purchase grants.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::EntitlementError;
use crate::domain::foundation::{SeriesId, Timestamp, UserId, VideoId};

/// The three things a user can buy to unlock a premium video.
///
/// Ordering of the variants is the order options are presented in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PurchaseKind {
    Video,
    Series,
    Module,
}

impl PurchaseKind {
    /// Parses a kind submitted by a client.
    pub fn parse(raw: &str) -> Result<Self, EntitlementError> {
        match raw {
            "video" => Ok(PurchaseKind::Video),
            "series" => Ok(PurchaseKind::Series),
            "module" => Ok(PurchaseKind::Module),
            other => Err(EntitlementError::invalid_purchase_kind(other)),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PurchaseKind::Video => "video",
            PurchaseKind::Series => "series",
            PurchaseKind::Module => "module",
        }
    }
}

impl fmt::Display for PurchaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A resolved processor price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in minor currency units (cents).
    pub amount: i64,
    /// Lower-case ISO currency code, e.g. `nzd`.
    pub currency: String,
}

impl Price {
    pub fn new(amount: i64, currency: impl Into<String>) -> Self {
        Self {
            amount,
            currency: currency.into().to_lowercase(),
        }
    }
}

/// Something the user can still buy, with live pricing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseOption {
    pub kind: PurchaseKind,
    /// Display name: video title, series name, or module name.
    pub name: String,
    pub price_id: String,
    pub amount: i64,
    pub currency: String,
}

impl PurchaseOption {
    pub fn new(
        kind: PurchaseKind,
        name: impl Into<String>,
        price_id: impl Into<String>,
        price: Price,
    ) -> Self {
        Self {
            kind,
            name: name.into(),
            price_id: price_id.into(),
            amount: price.amount,
            currency: price.currency,
        }
    }
}

/// What a one-time purchase unlocks. Exactly one target per purchase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "lowercase")]
pub enum PurchaseTarget {
    Video(VideoId),
    Series(SeriesId),
}

/// A non-expiring grant created by a successful one-time purchase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPurchase {
    pub user_id: UserId,
    pub target: PurchaseTarget,
    pub purchased_at: Timestamp,
}
