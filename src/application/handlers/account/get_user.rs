//! GetUser - Query handler for the account page.

use std::sync::Arc;

use crate::domain::account::User;
use crate::domain::entitlement::EntitlementError;
use crate::domain::foundation::UserId;
use crate::ports::UserRepository;

/// Query to get the current user's account.
#[derive(Debug, Clone)]
pub struct GetUserQuery {
    pub user_id: UserId,
}

/// Handler for getting a user.
pub struct GetUserHandler {
    users: Arc<dyn UserRepository>,
}

impl GetUserHandler {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    pub async fn handle(&self, query: GetUserQuery) -> Result<User, EntitlementError> {
        self.users
            .find_by_id(query.user_id)
            .await?
            .ok_or_else(|| EntitlementError::not_found("User", query.user_id))
    }
}
