//! JSON shapes for account endpoints.

use serde::{Deserialize, Serialize};

use crate::application::handlers::StartPaymentSetupResult;
use crate::domain::account::User;
use crate::domain::foundation::UserId;
use crate::ports::PortalSession;

/// Optional redirect overrides for payment setup.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PaymentSetupRequest {
    #[serde(default)]
    pub success_url: Option<String>,
    #[serde(default)]
    pub cancel_url: Option<String>,
}

/// The caller's account as exposed to clients.
///
/// The processor customer id is reduced to a flag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountResponse {
    pub id: UserId,
    pub email: String,
    pub display_name: Option<String>,
    pub billing_enabled: bool,
    pub has_payment_method: bool,
}

impl From<User> for AccountResponse {
    fn from(user: User) -> Self {
        Self {
            billing_enabled: user.customer_id.is_some(),
            id: user.id,
            email: user.email,
            display_name: user.display_name,
            has_payment_method: user.has_payment_method,
        }
    }
}

/// Hosted page the client should redirect to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedirectResponse {
    pub session_id: String,
    pub url: String,
}

impl From<StartPaymentSetupResult> for RedirectResponse {
    fn from(result: StartPaymentSetupResult) -> Self {
        Self {
            session_id: result.session.id,
            url: result.session.url,
        }
    }
}

impl From<PortalSession> for RedirectResponse {
    fn from(session: PortalSession) -> Self {
        Self {
            session_id: session.id,
            url: session.url,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentMethodResponse {
    pub has_payment_method: bool,
}
