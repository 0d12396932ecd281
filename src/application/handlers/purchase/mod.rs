//! Purchase recording handlers.

mod record_purchase;

pub use record_purchase::{RecordPurchaseCommand, RecordPurchaseHandler, RecordPurchaseResult};
