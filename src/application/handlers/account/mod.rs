//! Account and payment-method handlers.

mod create_portal_session;
mod get_user;
mod start_payment_setup;
mod verify_payment_method;

pub use create_portal_session::{CreatePortalSessionCommand, CreatePortalSessionHandler};
pub use get_user::{GetUserHandler, GetUserQuery};
pub use start_payment_setup::{
    StartPaymentSetupCommand, StartPaymentSetupHandler, StartPaymentSetupResult,
};
pub use verify_payment_method::{
    VerifyPaymentMethodHandler, VerifyPaymentMethodQuery, VerifyPaymentMethodResult,
};
