//! PostgreSQL implementation of UserRepository.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::account::User;
use crate::domain::foundation::{DomainError, ErrorCode, UserId};
use crate::ports::UserRepository;

/// PostgreSQL user repository.
///
/// Only the billing columns are written here.
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: i64,
    email: String,
    display_name: Option<String>,
    stripe_customer_id: Option<String>,
    has_payment_method: bool,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: UserId::new(row.id),
            email: row.email,
            display_name: row.display_name,
            customer_id: row.stripe_customer_id,
            has_payment_method: row.has_payment_method,
        }
    }
}

const USER_COLUMNS: &str = "id, email, display_name, stripe_customer_id, has_payment_method";

fn user_not_found(id: UserId) -> DomainError {
    DomainError::new(ErrorCode::NotFound, format!("User {} not found", id))
        .with_detail("resource", "User")
        .with_detail("id", id.to_string())
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, DomainError> {
        let row: Option<UserRow> =
            sqlx::query_as(&format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS))
                .bind(id.as_i64())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| DomainError::database(format!("Failed to fetch user: {}", e)))?;

        Ok(row.map(User::from))
    }

    async fn find_by_customer_id(&self, customer_id: &str) -> Result<Option<User>, DomainError> {
        let row: Option<UserRow> = sqlx::query_as(&format!(
            "SELECT {} FROM users WHERE stripe_customer_id = $1",
            USER_COLUMNS
        ))
        .bind(customer_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to fetch user: {}", e)))?;

        Ok(row.map(User::from))
    }

    async fn set_customer_id(&self, id: UserId, customer_id: &str) -> Result<(), DomainError> {
        let result = sqlx::query("UPDATE users SET stripe_customer_id = $2 WHERE id = $1")
            .bind(id.as_i64())
            .bind(customer_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                DomainError::database(format!("Failed to store customer id: {}", e))
            })?;

        if result.rows_affected() == 0 {
            return Err(user_not_found(id));
        }
        Ok(())
    }

    async fn set_has_payment_method(&self, id: UserId, present: bool) -> Result<(), DomainError> {
        let result = sqlx::query("UPDATE users SET has_payment_method = $2 WHERE id = $1")
            .bind(id.as_i64())
            .bind(present)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                DomainError::database(format!("Failed to store payment method flag: {}", e))
            })?;

        if result.rows_affected() == 0 {
            return Err(user_not_found(id));
        }
        Ok(())
    }
}
