//! Notification settings entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database row mapping for the notification_settings table.
///
/// The table holds a single row (id = 1). The matrix and templates columns
/// are JSONB override documents; built-in defaults are merged in at read
/// time, so an empty object means "all defaults".
#[derive(Debug, Clone, FromRow)]
pub struct NotificationSettingsEntity {
    pub id: i64,
    pub matrix: serde_json::Value,
    pub templates: serde_json::Value,
    pub updated_at: DateTime<Utc>,
}
