//! User entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database row mapping for the users table.
///
/// The users table is owned by the ticket CRUD application; this service
/// only reads from it.
#[derive(Debug, Clone, FromRow)]
pub struct UserEntity {
    pub id: i64,
    pub username: String,
    pub role: String,
    pub is_super: bool,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl From<UserEntity> for domain::models::UserRecord {
    fn from(entity: UserEntity) -> Self {
        Self {
            id: entity.id,
            username: entity.username,
            role: entity.role,
            is_super: entity.is_super,
            first_name: entity.first_name,
            last_name: entity.last_name,
            email: entity.email,
        }
    }
}
