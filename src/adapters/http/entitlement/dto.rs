//! JSON shapes for access and purchase endpoints.

use serde::{Deserialize, Serialize};

use crate::application::handlers::{CheckAccessResult, RecordPurchaseResult};
use crate::domain::entitlement::{AccessDecision, PurchaseKind, PurchaseOption};
use crate::domain::foundation::VideoId;

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Query string for the purchase options listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PurchaseOptionsParams {
    #[serde(default)]
    pub simplified: bool,
}

/// Request to buy a video, series or module.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordPurchaseRequest {
    /// One of `video`, `series`, `module`. Validated by the handler.
    pub kind: String,
    /// Series or module name; ignored for video purchases.
    #[serde(default)]
    pub name: String,
    /// Price the client was shown.
    pub price_id: String,
    /// Required for video purchases.
    #[serde(default)]
    pub video_id: Option<VideoId>,
    #[serde(default)]
    pub simplified: bool,
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessResponse {
    pub has_access: bool,
    pub decision: AccessDecision,
}

impl From<CheckAccessResult> for AccessResponse {
    fn from(result: CheckAccessResult) -> Self {
        Self {
            has_access: result.has_access,
            decision: result.decision,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseOptionsResponse {
    pub purchase_options: Vec<PurchaseOption>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseResponse {
    pub kind: PurchaseKind,
    /// Processor id of the invoice item, invoice or subscription.
    pub processor_reference: String,
}

impl From<RecordPurchaseResult> for PurchaseResponse {
    fn from(result: RecordPurchaseResult) -> Self {
        Self {
            kind: result.kind,
            processor_reference: result.processor_reference,
        }
    }
}
