//! Recipient resolution.
//!
//! Given a lifecycle event and a ticket snapshot, consults the notification
//! matrix and the recipient directory to produce the deduplicated set of
//! email addresses to notify. Lookup failures never fail the overall
//! dispatch: a failed creator or assignee lookup is treated as "no match"
//! and role lookups degrade to an empty contribution, so a partial
//! recipient list is an expected outcome.

use async_trait::async_trait;
use std::collections::BTreeSet;
use std::sync::Mutex;

use crate::models::user::{ROLE_ADMIN, ROLE_MANAGER, ROLE_TECHNICIAN};
use crate::models::{
    LifecycleEvent, MatrixDocument, NotificationMatrix, TemplateDocument, TemplateMap,
    TicketSnapshot, UserRecord,
};

/// Errors surfaced by directory and policy store implementations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Read-only access to the external user store, limited to what recipient
/// resolution needs.
#[async_trait]
pub trait RecipientDirectory: Send + Sync {
    /// Resolve a human identifier to a user: exact username match first,
    /// then exact, case-sensitive, trimmed display-name match. Empty
    /// identifiers and misses both resolve to `Ok(None)`; "not found" is an
    /// expected outcome, not an error.
    async fn find_by_name_or_username(
        &self,
        identifier: &str,
    ) -> Result<Option<UserRecord>, StoreError>;

    /// Trimmed, non-empty, deduplicated emails of every user whose role is
    /// in `roles`, plus every super-flagged user regardless of role. An
    /// empty role set yields an empty result with no super inclusion.
    async fn emails_for_roles(&self, roles: &[&str]) -> Result<Vec<String>, StoreError>;
}

/// Access to the persisted notification configuration (a singleton
/// document pair). Reads return the stored document merged over built-in
/// defaults; writes are whole-document replacements.
#[async_trait]
pub trait NotificationPolicyStore: Send + Sync {
    async fn matrix(&self) -> Result<NotificationMatrix, StoreError>;

    async fn templates(&self) -> Result<TemplateMap, StoreError>;

    async fn replace_matrix(&self, matrix: &MatrixDocument) -> Result<(), StoreError>;

    async fn replace_templates(&self, templates: &TemplateDocument) -> Result<(), StoreError>;
}

/// Resolve the recipient emails for one event.
///
/// The caller supplies the already-read matrix so that a policy store read
/// failure can be handled once (by falling back to built-in defaults)
/// rather than per event.
pub async fn resolve_recipients(
    matrix: &NotificationMatrix,
    directory: &dyn RecipientDirectory,
    event: LifecycleEvent,
    ticket: &TicketSnapshot,
) -> BTreeSet<String> {
    let mut recipients = BTreeSet::new();
    let Some(flags) = matrix.flags(event) else {
        return recipients;
    };

    if flags.creator {
        collect_user_email(directory, &ticket.creator, &mut recipients).await;
    }

    if flags.assignee && !ticket.assignee_or_empty().is_empty() {
        collect_user_email(directory, ticket.assignee_or_empty(), &mut recipients).await;
    }

    let mut roles = Vec::new();
    if flags.technician {
        roles.push(ROLE_TECHNICIAN);
    }
    if flags.manager {
        roles.push(ROLE_MANAGER);
    }
    if flags.admin {
        roles.push(ROLE_ADMIN);
    }
    if !roles.is_empty() {
        match directory.emails_for_roles(&roles).await {
            Ok(emails) => {
                for email in emails {
                    let email = email.trim();
                    if !email.is_empty() {
                        recipients.insert(email.to_string());
                    }
                }
            }
            Err(error) => {
                tracing::warn!(%event, %error, "role recipient lookup failed, skipping roles");
            }
        }
    }

    recipients
}

async fn collect_user_email(
    directory: &dyn RecipientDirectory,
    identifier: &str,
    recipients: &mut BTreeSet<String>,
) {
    match directory.find_by_name_or_username(identifier).await {
        Ok(Some(user)) => {
            let email = user.email.trim();
            if !email.is_empty() {
                recipients.insert(email.to_string());
            }
        }
        Ok(None) => {}
        Err(error) => {
            tracing::warn!(identifier, %error, "recipient lookup failed, skipping");
        }
    }
}

/// In-memory recipient directory for development and testing.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDirectory {
    pub users: Vec<UserRecord>,
}

impl InMemoryDirectory {
    pub fn new(users: Vec<UserRecord>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl RecipientDirectory for InMemoryDirectory {
    async fn find_by_name_or_username(
        &self,
        identifier: &str,
    ) -> Result<Option<UserRecord>, StoreError> {
        let identifier = identifier.trim();
        if identifier.is_empty() {
            return Ok(None);
        }
        if let Some(user) = self.users.iter().find(|u| u.username == identifier) {
            return Ok(Some(user.clone()));
        }
        Ok(self
            .users
            .iter()
            .find(|u| u.display_name() == identifier)
            .cloned())
    }

    async fn emails_for_roles(&self, roles: &[&str]) -> Result<Vec<String>, StoreError> {
        if roles.is_empty() {
            return Ok(Vec::new());
        }
        let mut emails = BTreeSet::new();
        for user in &self.users {
            if roles.contains(&user.role.as_str()) || user.is_super {
                let email = user.email.trim();
                if !email.is_empty() {
                    emails.insert(email.to_string());
                }
            }
        }
        Ok(emails.into_iter().collect())
    }
}

/// In-memory policy store for development and testing.
#[derive(Debug, Default)]
pub struct InMemoryPolicyStore {
    inner: Mutex<(MatrixDocument, TemplateDocument)>,
}

impl InMemoryPolicyStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl NotificationPolicyStore for InMemoryPolicyStore {
    async fn matrix(&self) -> Result<NotificationMatrix, StoreError> {
        let inner = self.inner.lock().expect("policy store lock poisoned");
        Ok(NotificationMatrix::merged(&inner.0))
    }

    async fn templates(&self) -> Result<TemplateMap, StoreError> {
        let inner = self.inner.lock().expect("policy store lock poisoned");
        Ok(TemplateMap::merged(&inner.1))
    }

    async fn replace_matrix(&self, matrix: &MatrixDocument) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().expect("policy store lock poisoned");
        inner.0 = matrix.clone();
        Ok(())
    }

    async fn replace_templates(&self, templates: &TemplateDocument) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().expect("policy store lock poisoned");
        inner.1 = templates.clone();
        Ok(())
    }
}
