//! Access resolution handlers.

mod check_access;
mod list_purchase_options;

pub use check_access::{CheckAccessHandler, CheckAccessQuery, CheckAccessResult};
pub use list_purchase_options::{
    ListPurchaseOptionsHandler, ListPurchaseOptionsQuery, ListPurchaseOptionsResult,
};
