//! Notification settings and test-send endpoints.

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use validator::Validate;

use domain::models::{MatrixDocument, NotificationMatrix, TemplateDocument, TemplateMap};

use crate::app::AppState;
use crate::error::ApiError;

/// Merged view of the notification configuration: every event carries its
/// effective flags and template after defaults are applied.
#[derive(Debug, Serialize)]
pub struct SettingsResponse {
    pub matrix: NotificationMatrix,
    pub templates: TemplateMap,
}

/// Whole-document replacement request. Absent sections are left untouched.
#[derive(Debug, Deserialize)]
pub struct UpdateSettingsRequest {
    #[serde(default)]
    pub matrix: Option<MatrixDocument>,
    #[serde(default)]
    pub templates: Option<TemplateDocument>,
}

/// GET /api/notifications/settings
pub async fn get_settings(
    State(state): State<AppState>,
) -> Result<Json<SettingsResponse>, ApiError> {
    let matrix = state.policy.matrix().await?;
    let templates = state.policy.templates().await?;
    Ok(Json(SettingsResponse { matrix, templates }))
}

/// PUT /api/notifications/settings
///
/// Replaces the stored override documents and answers with the merged view.
pub async fn update_settings(
    State(state): State<AppState>,
    Json(payload): Json<UpdateSettingsRequest>,
) -> Result<Json<SettingsResponse>, ApiError> {
    if let Some(matrix) = &payload.matrix {
        state.policy.replace_matrix(matrix).await?;
    }
    if let Some(templates) = &payload.templates {
        state.policy.replace_templates(templates).await?;
    }
    tracing::info!(
        matrix_replaced = payload.matrix.is_some(),
        templates_replaced = payload.templates.is_some(),
        "notification settings replaced"
    );

    let matrix = state.policy.matrix().await?;
    let templates = state.policy.templates().await?;
    Ok(Json(SettingsResponse { matrix, templates }))
}

/// Test email request.
#[derive(Debug, Deserialize, Validate)]
pub struct TestEmailRequest {
    #[validate(email(message = "must be a valid email address"))]
    pub to: String,
}

#[derive(Debug, Serialize)]
pub struct TestEmailResponse {
    pub sent: bool,
}

/// POST /api/notifications/test
///
/// Sends a test email to the given address, or 400 when SMTP is not
/// configured.
pub async fn send_test_email(
    State(state): State<AppState>,
    Json(payload): Json<TestEmailRequest>,
) -> Result<(StatusCode, Json<TestEmailResponse>), ApiError> {
    payload.validate()?;

    let Some(mailer) = &state.mailer else {
        return Err(ApiError::Validation("SMTP is not configured".into()));
    };

    mailer
        .send(
            std::slice::from_ref(&payload.to),
            "Help Desk Notification Test",
            "This is a test notification email from the help desk system.",
        )
        .await
        .map_err(|e| ApiError::Internal(format!("Test email failed: {}", e)))?;

    tracing::info!(to = %payload.to, "test email sent");
    Ok((StatusCode::OK, Json(TestEmailResponse { sent: true })))
}
