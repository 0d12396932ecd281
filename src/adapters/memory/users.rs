//! In-memory user repository.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Mutex;

use crate::domain::account::User;
use crate::domain::foundation::{DomainError, ErrorCode, UserId};
use crate::ports::UserRepository;

/// In-memory implementation of the `UserRepository` port.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Mutex<BTreeMap<UserId, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds an account, as the authentication subsystem would.
    pub fn insert(&self, user: User) {
        self.users.lock().unwrap().insert(user.id, user);
    }

    /// Returns a snapshot of an account.
    pub fn get(&self, id: UserId) -> Option<User> {
        self.users.lock().unwrap().get(&id).cloned()
    }

    fn update<F>(&self, id: UserId, apply: F) -> Result<(), DomainError>
    where
        F: FnOnce(&mut User),
    {
        let mut users = self.users.lock().unwrap();
        let user = users.get_mut(&id).ok_or_else(|| {
            DomainError::new(ErrorCode::NotFound, "User not found")
                .with_detail("resource", "User")
                .with_detail("id", id.to_string())
        })?;
        apply(user);
        Ok(())
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, DomainError> {
        Ok(self.get(id))
    }

    async fn find_by_customer_id(&self, customer_id: &str) -> Result<Option<User>, DomainError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .find(|u| u.customer_id.as_deref() == Some(customer_id))
            .cloned())
    }

    async fn set_customer_id(&self, id: UserId, customer_id: &str) -> Result<(), DomainError> {
        let taken = self
            .users
            .lock()
            .unwrap()
            .values()
            .any(|u| u.id != id && u.customer_id.as_deref() == Some(customer_id));
        if taken {
            return Err(DomainError::database("duplicate stripe_customer_id"));
        }
        self.update(id, |user| user.customer_id = Some(customer_id.to_string()))
    }

    async fn set_has_payment_method(&self, id: UserId, present: bool) -> Result<(), DomainError> {
        self.update(id, |user| user.has_payment_method = present)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: i64) -> User {
        User {
            id: UserId::new(id),
            email: format!("user{}@example.com", id),
            display_name: None,
            customer_id: None,
            has_payment_method: false,
        }
    }

    #[tokio::test]
    async fn customer_id_lookup_after_provisioning() {
        let repo = InMemoryUserRepository::new();
        repo.insert(user(1));

        repo.set_customer_id(UserId::new(1), "cus_1").await.unwrap();

        let found = repo.find_by_customer_id("cus_1").await.unwrap().unwrap();
        assert_eq!(found.id, UserId::new(1));
        assert!(repo.find_by_customer_id("cus_2").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn customer_ids_are_unique() {
        let repo = InMemoryUserRepository::new();
        repo.insert(user(1));
        repo.insert(user(2));
        repo.set_customer_id(UserId::new(1), "cus_1").await.unwrap();

        assert!(repo.set_customer_id(UserId::new(2), "cus_1").await.is_err());
    }

    #[tokio::test]
    async fn updating_unknown_user_is_not_found() {
        let repo = InMemoryUserRepository::new();
        let err = repo
            .set_has_payment_method(UserId::new(9), true)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }
}
