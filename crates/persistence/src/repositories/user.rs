//! User repository for recipient lookups.
//!
//! Read-only queries against the users table owned by the ticket CRUD
//! application.

use async_trait::async_trait;
use sqlx::PgPool;

use domain::models::UserRecord;
use domain::services::{RecipientDirectory, StoreError};

use crate::entities::UserEntity;
use crate::metrics::QueryTimer;

const USER_COLUMNS: &str =
    "id, username, role, is_super, first_name, last_name, email, created_at";

/// Repository for user-related database operations.
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Creates a new UserRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a user by exact username.
    pub async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<UserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_user_by_username");
        let result = sqlx::query_as::<_, UserEntity>(&format!(
            r#"
            SELECT {USER_COLUMNS}
            FROM users
            WHERE username = $1
            "#,
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find a user by trimmed "first last" display name (case-sensitive).
    pub async fn find_by_display_name(
        &self,
        display_name: &str,
    ) -> Result<Option<UserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_user_by_display_name");
        let result = sqlx::query_as::<_, UserEntity>(&format!(
            r#"
            SELECT {USER_COLUMNS}
            FROM users
            WHERE TRIM(first_name) || ' ' || TRIM(last_name) = $1
            LIMIT 1
            "#,
        ))
        .bind(display_name)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Emails of users holding any of the given roles, plus super-flagged
    /// users regardless of role.
    pub async fn list_role_emails(&self, roles: &[&str]) -> Result<Vec<String>, sqlx::Error> {
        if roles.is_empty() {
            return Ok(Vec::new());
        }
        let timer = QueryTimer::new("list_role_emails");
        let roles: Vec<String> = roles.iter().map(|r| r.to_string()).collect();
        let result = sqlx::query_scalar::<_, String>(
            r#"
            SELECT DISTINCT TRIM(email)
            FROM users
            WHERE (role = ANY($1) OR is_super = TRUE)
              AND TRIM(email) <> ''
            ORDER BY TRIM(email)
            "#,
        )
        .bind(&roles)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }
}

#[async_trait]
impl RecipientDirectory for UserRepository {
    async fn find_by_name_or_username(
        &self,
        identifier: &str,
    ) -> Result<Option<UserRecord>, StoreError> {
        let identifier = identifier.trim();
        if identifier.is_empty() {
            return Ok(None);
        }
        if let Some(entity) = self.find_by_username(identifier).await? {
            return Ok(Some(entity.into()));
        }
        Ok(self
            .find_by_display_name(identifier)
            .await?
            .map(UserRecord::from))
    }

    async fn emails_for_roles(&self, roles: &[&str]) -> Result<Vec<String>, StoreError> {
        Ok(self.list_role_emails(roles).await?)
    }
}
