//! Notification settings repository.
//!
//! Persists the singleton override documents for the notification matrix
//! and email templates. The row is lazily seeded with the built-in
//! defaults on first access; reads merge the stored document over the
//! built-ins, writes replace the whole document.

use async_trait::async_trait;
use sqlx::PgPool;

use domain::models::{
    MatrixDocument, NotificationMatrix, TemplateDocument, TemplateMap,
};
use domain::services::{NotificationPolicyStore, StoreError};

use crate::entities::NotificationSettingsEntity;
use crate::metrics::QueryTimer;

/// The id of the singleton settings row.
const SETTINGS_ROW_ID: i64 = 1;

/// Repository for the notification_settings singleton.
#[derive(Clone)]
pub struct NotificationSettingsRepository {
    pool: PgPool,
}

impl NotificationSettingsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch(&self) -> Result<Option<NotificationSettingsEntity>, sqlx::Error> {
        let timer = QueryTimer::new("get_notification_settings");
        let result = sqlx::query_as::<_, NotificationSettingsEntity>(
            r#"
            SELECT id, matrix, templates, updated_at
            FROM notification_settings
            WHERE id = $1
            "#,
        )
        .bind(SETTINGS_ROW_ID)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Insert the built-in defaults if no row exists yet. A concurrent
    /// initializer winning the insert is fine; the follow-up read sees its
    /// row.
    async fn seed_defaults(&self) -> Result<(), StoreError> {
        let matrix = serde_json::to_value(NotificationMatrix::built_in())?;
        let templates = serde_json::to_value(TemplateMap::built_in())?;
        let timer = QueryTimer::new("seed_notification_settings");
        sqlx::query(
            r#"
            INSERT INTO notification_settings (id, matrix, templates)
            VALUES ($1, $2, $3)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(SETTINGS_ROW_ID)
        .bind(matrix)
        .bind(templates)
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(())
    }

    async fn fetch_or_seed(&self) -> Result<NotificationSettingsEntity, StoreError> {
        if let Some(entity) = self.fetch().await? {
            return Ok(entity);
        }
        self.seed_defaults().await?;
        match self.fetch().await? {
            Some(entity) => Ok(entity),
            None => Err(StoreError::Database(sqlx::Error::RowNotFound)),
        }
    }

    async fn replace_column(
        &self,
        query_name: &'static str,
        sql: &'static str,
        value: serde_json::Value,
    ) -> Result<(), StoreError> {
        self.fetch_or_seed().await?;
        let timer = QueryTimer::new(query_name);
        sqlx::query(sql)
            .bind(SETTINGS_ROW_ID)
            .bind(value)
            .execute(&self.pool)
            .await?;
        timer.record();
        Ok(())
    }
}

#[async_trait]
impl NotificationPolicyStore for NotificationSettingsRepository {
    async fn matrix(&self) -> Result<NotificationMatrix, StoreError> {
        let entity = self.fetch_or_seed().await?;
        let doc: MatrixDocument = serde_json::from_value(entity.matrix)?;
        Ok(NotificationMatrix::merged(&doc))
    }

    async fn templates(&self) -> Result<TemplateMap, StoreError> {
        let entity = self.fetch_or_seed().await?;
        let doc: TemplateDocument = serde_json::from_value(entity.templates)?;
        Ok(TemplateMap::merged(&doc))
    }

    async fn replace_matrix(&self, matrix: &MatrixDocument) -> Result<(), StoreError> {
        let value = serde_json::to_value(matrix)?;
        self.replace_column(
            "replace_notification_matrix",
            r#"
            UPDATE notification_settings
            SET matrix = $2, updated_at = NOW()
            WHERE id = $1
            "#,
            value,
        )
        .await
    }

    async fn replace_templates(&self, templates: &TemplateDocument) -> Result<(), StoreError> {
        let value = serde_json::to_value(templates)?;
        self.replace_column(
            "replace_notification_templates",
            r#"
            UPDATE notification_settings
            SET templates = $2, updated_at = NOW()
            WHERE id = $1
            "#,
            value,
        )
        .await
    }
}
