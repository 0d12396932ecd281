//! Series and modules: the two ways videos are sold in bulk.

use serde::{Deserialize, Serialize};

use super::video::non_empty;
use crate::domain::foundation::{ModuleId, SeriesId};

/// A one-time purchasable season pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Series {
    pub id: SeriesId,
    pub name: String,
    pub price_id: Option<String>,
}

impl Series {
    pub fn price_ref(&self) -> Option<&str> {
        non_empty(self.price_id.as_deref())
    }
}

/// A content vertical sold as a monthly subscription.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Module {
    pub id: ModuleId,
    pub name: String,
    pub price_id: Option<String>,
}

impl Module {
    pub fn price_ref(&self) -> Option<&str> {
        non_empty(self.price_id.as_deref())
    }
}
