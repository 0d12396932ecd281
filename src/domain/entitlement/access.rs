//! Access decisions.

use serde::{Deserialize, Serialize};

/// Outcome of resolving access for a (user, video) pair.
///
/// Grants are checked in a fixed order and the first one found is reported;
/// the decision is a logical OR, so order only affects which grant is named.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessDecision {
    /// The video is not premium.
    Free,
    DirectPurchase,
    SeriesPurchase,
    ModuleSubscription,
    Denied,
}

impl AccessDecision {
    /// Returns true if the user may watch the video.
    pub fn is_granted(&self) -> bool {
        !matches!(self, AccessDecision::Denied)
    }
}
