//! Email template rendering.
//!
//! Substitutes `{token}` placeholders in the configured (or built-in)
//! subject/body template for an event. Substitution is a single literal
//! pass: tokens inside substituted values are not expanded again, and
//! unknown tokens are left verbatim.

use crate::models::{EventTemplate, LifecycleEvent, TemplateMap, TicketSnapshot};

/// Placeholder used when a ticket field is absent or empty.
const MISSING_FIELD: &str = "-";

/// Actor name used when no acting user is known.
const SYSTEM_ACTOR: &str = "System";

/// A rendered email subject and body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedMessage {
    pub subject: String,
    pub body: String,
}

/// Render the subject/body for an event from the given template map.
pub fn render(
    templates: &TemplateMap,
    event: LifecycleEvent,
    ticket: &TicketSnapshot,
    actor: Option<&str>,
    comment: Option<&str>,
) -> RenderedMessage {
    let EventTemplate { subject, body } = templates.template(event);
    RenderedMessage {
        subject: substitute(&subject, ticket, actor, comment),
        body: substitute(&body, ticket, actor, comment),
    }
}

fn field_or_dash(value: &str) -> &str {
    if value.trim().is_empty() {
        MISSING_FIELD
    } else {
        value
    }
}

fn substitute(
    template: &str,
    ticket: &TicketSnapshot,
    actor: Option<&str>,
    comment: Option<&str>,
) -> String {
    let ticket_id = ticket.id.to_string();
    let actor = actor
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .unwrap_or(SYSTEM_ACTOR);

    let lookup = |token: &str| -> Option<&str> {
        match token {
            "ticketId" => Some(&ticket_id),
            "summary" => Some(field_or_dash(&ticket.summary)),
            "department" => Some(field_or_dash(&ticket.department)),
            "status" => Some(field_or_dash(ticket.status.as_str())),
            "priority" => Some(ticket.priority.as_str()),
            "category" => Some(field_or_dash(&ticket.category)),
            "assignee" => Some(field_or_dash(ticket.assignee_or_empty())),
            "actor" => Some(actor),
            "comment" => Some(comment.unwrap_or("")),
            _ => None,
        }
    };

    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        match after.find('}') {
            Some(close) if lookup(&after[..close]).is_some() => {
                out.push_str(lookup(&after[..close]).unwrap_or_default());
                rest = &after[close + 1..];
            }
            _ => {
                // Unknown token or unterminated brace: keep verbatim.
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{TicketPriority, TicketStatus};

    fn ticket() -> TicketSnapshot {
        TicketSnapshot {
            id: 7,
            department: "Support".to_string(),
            summary: "Printer down".to_string(),
            status: TicketStatus::Open,
            priority: TicketPriority::Medium,
            category: "General Problem".to_string(),
            assignee: None,
            creator: "jane".to_string(),
        }
    }

    #[test]
    fn substitutes_ticket_fields() {
        let templates = TemplateMap::built_in();
        let message = render(
            &templates,
            LifecycleEvent::Opened,
            &ticket(),
            Some("Jane Doe"),
            None,
        );
        assert_eq!(message.subject, "New Ticket #7: Printer down");
        assert!(message.body.contains("A new ticket was opened by Jane Doe."));
        assert!(message.body.contains("Status: Open"));
        assert!(message.body.contains("Priority: Medium"));
    }

    #[test]
    fn missing_fields_render_as_dash() {
        let mut t = ticket();
        t.category = String::new();
        let templates = TemplateMap::built_in();
        let message = render(&templates, LifecycleEvent::Opened, &t, None, None);
        assert!(message.body.contains("Category: -"));
        assert!(message.body.contains("Assignee: -"));
    }

    #[test]
    fn absent_actor_renders_as_system() {
        let templates = TemplateMap::built_in();
        let message = render(&templates, LifecycleEvent::Closed, &ticket(), None, None);
        assert!(message.body.contains("closed by System"));
    }

    #[test]
    fn absent_comment_renders_as_empty_string() {
        let templates = TemplateMap::built_in();
        let message = render(&templates, LifecycleEvent::Commented, &ticket(), None, None);
        assert!(message.body.ends_with("Comment: "));
    }

    #[test]
    fn comment_is_substituted() {
        let templates = TemplateMap::built_in();
        let message = render(
            &templates,
            LifecycleEvent::Commented,
            &ticket(),
            Some("bob"),
            Some("rebooted the print server"),
        );
        assert!(message.body.contains("Comment: rebooted the print server"));
    }

    #[test]
    fn unknown_tokens_are_left_verbatim() {
        let doc: crate::models::TemplateDocument = serde_json::from_value(serde_json::json!({
            "opened": { "subject": "{mystery} #{ticketId} {unclosed" }
        }))
        .unwrap();
        let templates = TemplateMap::merged(&doc);
        let message = render(&templates, LifecycleEvent::Opened, &ticket(), None, None);
        assert_eq!(message.subject, "{mystery} #7 {unclosed");
    }

    #[test]
    fn tokens_inside_values_are_not_expanded() {
        let mut t = ticket();
        t.summary = "literal {status} in summary".to_string();
        let templates = TemplateMap::built_in();
        let message = render(&templates, LifecycleEvent::Opened, &t, None, None);
        assert!(message.subject.contains("literal {status} in summary"));
    }

    #[test]
    fn rendering_is_idempotent() {
        let templates = TemplateMap::built_in();
        let t = ticket();
        let first = render(&templates, LifecycleEvent::Opened, &t, Some("jane"), None);
        let second = render(&templates, LifecycleEvent::Opened, &t, Some("jane"), None);
        assert_eq!(first, second);
    }
}
