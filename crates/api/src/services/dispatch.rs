//! Fire-and-forget notification dispatch.
//!
//! One spawned task per fired lifecycle event. Nothing in the pipeline
//! propagates out of the task: policy store read failures degrade to
//! built-in defaults, recipient lookup misses shrink the recipient set,
//! and transport failures are logged.

use std::sync::Arc;

use domain::models::{LifecycleEvent, NotificationMatrix, TemplateMap, TicketSnapshot};
use domain::services::{
    render, resolve_recipients, NotificationPolicyStore, RecipientDirectory,
};

use crate::middleware::metrics::{record_notification_failed, record_notification_sent};
use crate::services::mailer::MailTransport;

/// Routes a lifecycle event to an email, end to end.
#[derive(Clone)]
pub struct NotificationDispatcher {
    directory: Arc<dyn RecipientDirectory>,
    policy: Arc<dyn NotificationPolicyStore>,
    mailer: Option<Arc<dyn MailTransport>>,
}

impl NotificationDispatcher {
    pub fn new(
        directory: Arc<dyn RecipientDirectory>,
        policy: Arc<dyn NotificationPolicyStore>,
        mailer: Option<Arc<dyn MailTransport>>,
    ) -> Self {
        Self {
            directory,
            policy,
            mailer,
        }
    }

    /// Spawn a dispatch task for one event. Returns immediately.
    pub fn spawn(
        &self,
        event: LifecycleEvent,
        ticket: TicketSnapshot,
        actor: Option<String>,
        comment: Option<String>,
    ) {
        let dispatcher = self.clone();
        tokio::spawn(async move {
            dispatcher.dispatch(event, ticket, actor, comment).await;
        });
    }

    /// Resolve recipients, render the template, and hand the message to the
    /// transport. Infallible by contract; failures are logged.
    pub async fn dispatch(
        &self,
        event: LifecycleEvent,
        ticket: TicketSnapshot,
        actor: Option<String>,
        comment: Option<String>,
    ) {
        let matrix = match self.policy.matrix().await {
            Ok(matrix) => matrix,
            Err(error) => {
                tracing::warn!(%event, %error, "matrix read failed, using built-in defaults");
                NotificationMatrix::built_in()
            }
        };

        let recipients =
            resolve_recipients(&matrix, self.directory.as_ref(), event, &ticket).await;
        if recipients.is_empty() {
            tracing::debug!(%event, ticket_id = ticket.id, "no recipients resolved, skipping");
            return;
        }

        let templates = match self.policy.templates().await {
            Ok(templates) => templates,
            Err(error) => {
                tracing::warn!(%event, %error, "template read failed, using built-in defaults");
                TemplateMap::built_in()
            }
        };
        let message = render(&templates, event, &ticket, actor.as_deref(), comment.as_deref());

        let Some(mailer) = &self.mailer else {
            tracing::debug!(%event, ticket_id = ticket.id, "email delivery disabled, skipping");
            return;
        };

        let to: Vec<String> = recipients.into_iter().collect();
        match mailer.send(&to, &message.subject, &message.body).await {
            Ok(()) => {
                record_notification_sent(event.key());
                tracing::info!(
                    %event,
                    ticket_id = ticket.id,
                    recipients = to.len(),
                    "notification email sent"
                );
            }
            Err(error) => {
                record_notification_failed(event.key());
                tracing::error!(
                    %event,
                    ticket_id = ticket.id,
                    %error,
                    "notification email delivery failed"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::mailer::testing::RecordingMailer;
    use domain::models::user::{ROLE_MANAGER, ROLE_TECHNICIAN, ROLE_USER};
    use domain::models::{TicketPriority, TicketStatus, UserRecord};
    use domain::services::{InMemoryDirectory, InMemoryPolicyStore};

    fn user(id: i64, username: &str, role: &str, email: &str) -> UserRecord {
        UserRecord {
            id,
            username: username.to_string(),
            role: role.to_string(),
            is_super: false,
            first_name: String::new(),
            last_name: String::new(),
            email: email.to_string(),
        }
    }

    fn ticket() -> TicketSnapshot {
        TicketSnapshot {
            id: 7,
            department: "Support".to_string(),
            summary: "Printer down".to_string(),
            status: TicketStatus::Open,
            priority: TicketPriority::Medium,
            category: "General Problem".to_string(),
            assignee: Some("bob".to_string()),
            creator: "jane".to_string(),
        }
    }

    fn dispatcher_with(mailer: Option<Arc<dyn MailTransport>>) -> NotificationDispatcher {
        let directory = Arc::new(InMemoryDirectory::new(vec![
            user(1, "jane", ROLE_USER, "jane@example.com"),
            user(2, "bob", ROLE_TECHNICIAN, "bob@example.com"),
            user(3, "meg", ROLE_MANAGER, "meg@example.com"),
        ]));
        let policy = Arc::new(InMemoryPolicyStore::new());
        NotificationDispatcher::new(directory, policy, mailer)
    }

    #[tokio::test]
    async fn sends_one_message_addressed_to_all_recipients() {
        let mailer = Arc::new(RecordingMailer::new());
        let dispatcher = dispatcher_with(Some(mailer.clone()));

        dispatcher
            .dispatch(
                LifecycleEvent::Commented,
                ticket(),
                Some("bob".to_string()),
                Some("on it".to_string()),
            )
            .await;

        let sent = mailer.sent();
        assert_eq!(sent.len(), 1);
        // Commented targets creator and assignee only under defaults.
        assert_eq!(
            sent[0].to,
            vec!["bob@example.com".to_string(), "jane@example.com".to_string()]
        );
        assert_eq!(sent[0].subject, "New Comment on Ticket #7");
        assert!(sent[0].body.contains("Comment: on it"));
    }

    #[tokio::test]
    async fn empty_recipient_set_sends_nothing() {
        let mailer = Arc::new(RecordingMailer::new());
        let directory = Arc::new(InMemoryDirectory::new(Vec::new()));
        let policy = Arc::new(InMemoryPolicyStore::new());
        let dispatcher =
            NotificationDispatcher::new(directory, policy, Some(mailer.clone()));

        dispatcher
            .dispatch(LifecycleEvent::Commented, ticket(), None, None)
            .await;

        assert!(mailer.sent().is_empty());
    }

    #[tokio::test]
    async fn disabled_delivery_is_a_silent_no_op() {
        let dispatcher = dispatcher_with(None);
        dispatcher
            .dispatch(LifecycleEvent::Opened, ticket(), None, None)
            .await;
    }

    #[tokio::test]
    async fn transport_failure_does_not_propagate() {
        let mailer = Arc::new(RecordingMailer::failing());
        let dispatcher = dispatcher_with(Some(mailer));
        dispatcher
            .dispatch(LifecycleEvent::Opened, ticket(), None, None)
            .await;
    }

    #[tokio::test]
    async fn spawn_returns_before_delivery_completes() {
        let mailer = Arc::new(RecordingMailer::new());
        let dispatcher = dispatcher_with(Some(mailer.clone()));

        dispatcher.spawn(LifecycleEvent::Commented, ticket(), None, None);

        // The task runs on the runtime; give it a moment to finish.
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        assert_eq!(mailer.sent().len(), 1);
    }
}
