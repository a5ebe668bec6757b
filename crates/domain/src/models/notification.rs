//! Notification configuration models.
//!
//! The notification matrix controls, per lifecycle event, which stakeholder
//! classes receive email. Templates control the subject and body of each
//! event's email. Both are stored as whole JSON documents and merged over
//! built-in defaults at read time: persisted leaves win, absent leaves fall
//! back, unknown event keys are ignored.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A named transition a ticket can undergo that may trigger notifications.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum LifecycleEvent {
    Opened,
    Assigned,
    Commented,
    Closed,
    ClosedDuplicate,
    Reopened,
}

impl LifecycleEvent {
    pub const ALL: [LifecycleEvent; 6] = [
        LifecycleEvent::Opened,
        LifecycleEvent::Assigned,
        LifecycleEvent::Commented,
        LifecycleEvent::Closed,
        LifecycleEvent::ClosedDuplicate,
        LifecycleEvent::Reopened,
    ];

    /// The event key used in stored configuration documents and on the wire.
    pub fn key(&self) -> &'static str {
        match self {
            LifecycleEvent::Opened => "opened",
            LifecycleEvent::Assigned => "assigned",
            LifecycleEvent::Commented => "commented",
            LifecycleEvent::Closed => "closed",
            LifecycleEvent::ClosedDuplicate => "closedDuplicate",
            LifecycleEvent::Reopened => "reopened",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|e| e.key() == key)
    }
}

impl fmt::Display for LifecycleEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// Per-event recipient targeting: one flag per stakeholder class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecipientFlags {
    pub creator: bool,
    pub assignee: bool,
    pub technician: bool,
    pub manager: bool,
    pub admin: bool,
}

impl RecipientFlags {
    pub const fn new(
        creator: bool,
        assignee: bool,
        technician: bool,
        manager: bool,
        admin: bool,
    ) -> Self {
        Self {
            creator,
            assignee,
            technician,
            manager,
            admin,
        }
    }
}

/// Storage/wire form of [`RecipientFlags`]: absent leaves fall back to the
/// built-in default at read time, present leaves (including explicit `false`)
/// win.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipientFlagsOverride {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creator: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub technician: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manager: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin: Option<bool>,
}

impl RecipientFlagsOverride {
    pub fn apply_to(&self, base: RecipientFlags) -> RecipientFlags {
        RecipientFlags {
            creator: self.creator.unwrap_or(base.creator),
            assignee: self.assignee.unwrap_or(base.assignee),
            technician: self.technician.unwrap_or(base.technician),
            manager: self.manager.unwrap_or(base.manager),
            admin: self.admin.unwrap_or(base.admin),
        }
    }
}

/// Stored matrix document: event key to flag overrides. Keyed by string so
/// unknown event keys survive deserialization and are simply ignored.
pub type MatrixDocument = BTreeMap<String, RecipientFlagsOverride>;

/// Stored template document, same key semantics as [`MatrixDocument`].
pub type TemplateDocument = BTreeMap<String, EventTemplateOverride>;

/// Fully resolved notification matrix: every lifecycle event present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NotificationMatrix {
    pub events: BTreeMap<LifecycleEvent, RecipientFlags>,
}

impl NotificationMatrix {
    /// The built-in default matrix.
    pub fn built_in() -> Self {
        let events = [
            (
                LifecycleEvent::Opened,
                RecipientFlags::new(true, false, true, true, true),
            ),
            (
                LifecycleEvent::Assigned,
                RecipientFlags::new(false, true, false, true, true),
            ),
            (
                LifecycleEvent::Commented,
                RecipientFlags::new(true, true, false, false, false),
            ),
            (
                LifecycleEvent::Closed,
                RecipientFlags::new(true, true, true, true, true),
            ),
            (
                LifecycleEvent::ClosedDuplicate,
                RecipientFlags::new(true, true, true, true, true),
            ),
            (
                LifecycleEvent::Reopened,
                RecipientFlags::new(true, true, true, true, true),
            ),
        ]
        .into_iter()
        .collect();
        Self { events }
    }

    /// Merge a stored override document over the built-in defaults.
    pub fn merged(overrides: &MatrixDocument) -> Self {
        let mut matrix = Self::built_in();
        for (event, flags) in matrix.events.iter_mut() {
            if let Some(over) = overrides.get(event.key()) {
                *flags = over.apply_to(*flags);
            }
        }
        matrix
    }

    /// Targeting flags for an event, or `None` if the event is unknown to
    /// this matrix.
    pub fn flags(&self, event: LifecycleEvent) -> Option<RecipientFlags> {
        self.events.get(&event).copied()
    }
}

impl Default for NotificationMatrix {
    fn default() -> Self {
        Self::built_in()
    }
}

/// Subject and body of one event's email, with `{token}` placeholders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventTemplate {
    pub subject: String,
    pub body: String,
}

impl EventTemplate {
    /// The built-in default template for an event.
    pub fn built_in(event: LifecycleEvent) -> Self {
        const DETAILS: &str = "Ticket ID: {ticketId}\n\
            Summary: {summary}\n\
            Department: {department}\n\
            Status: {status}\n\
            Priority: {priority}\n\
            Category: {category}\n\
            Assignee: {assignee}";
        let (subject, intro, tail) = match event {
            LifecycleEvent::Opened => (
                "New Ticket #{ticketId}: {summary}",
                "A new ticket was opened by {actor}.",
                "",
            ),
            LifecycleEvent::Assigned => (
                "Ticket Assigned #{ticketId}: {summary}",
                "Ticket #{ticketId} was assigned to {assignee} by {actor}.",
                "",
            ),
            LifecycleEvent::Commented => (
                "New Comment on Ticket #{ticketId}",
                "{actor} commented on ticket #{ticketId}.",
                "\n\nComment: {comment}",
            ),
            LifecycleEvent::Closed => (
                "Ticket Closed #{ticketId}: {summary}",
                "Ticket #{ticketId} was closed by {actor}.",
                "",
            ),
            LifecycleEvent::ClosedDuplicate => (
                "Ticket Closed as Duplicate #{ticketId}: {summary}",
                "Ticket #{ticketId} was closed as a duplicate by {actor}.",
                "",
            ),
            LifecycleEvent::Reopened => (
                "Ticket Reopened #{ticketId}: {summary}",
                "Ticket #{ticketId} was reopened by {actor}.",
                "",
            ),
        };
        Self {
            subject: subject.to_string(),
            body: format!("{intro}\n\n{DETAILS}{tail}"),
        }
    }
}

/// Storage/wire form of an [`EventTemplate`]: absent or blank leaves fall
/// back to the built-in default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventTemplateOverride {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

impl EventTemplateOverride {
    fn filled(leaf: &Option<String>) -> Option<&String> {
        leaf.as_ref().filter(|s| !s.trim().is_empty())
    }

    pub fn apply_to(&self, base: &EventTemplate) -> EventTemplate {
        EventTemplate {
            subject: Self::filled(&self.subject)
                .cloned()
                .unwrap_or_else(|| base.subject.clone()),
            body: Self::filled(&self.body)
                .cloned()
                .unwrap_or_else(|| base.body.clone()),
        }
    }
}

/// Fully resolved template map: every lifecycle event present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TemplateMap {
    pub events: BTreeMap<LifecycleEvent, EventTemplate>,
}

impl TemplateMap {
    pub fn built_in() -> Self {
        let events = LifecycleEvent::ALL
            .iter()
            .map(|&event| (event, EventTemplate::built_in(event)))
            .collect();
        Self { events }
    }

    /// Merge a stored override document over the built-in defaults.
    pub fn merged(overrides: &TemplateDocument) -> Self {
        let mut templates = Self::built_in();
        for (event, template) in templates.events.iter_mut() {
            if let Some(over) = overrides.get(event.key()) {
                *template = over.apply_to(template);
            }
        }
        templates
    }

    /// The template for an event, falling back to the built-in default when
    /// the map was constructed without it.
    pub fn template(&self, event: LifecycleEvent) -> EventTemplate {
        self.events
            .get(&event)
            .cloned()
            .unwrap_or_else(|| EventTemplate::built_in(event))
    }
}

impl Default for TemplateMap {
    fn default() -> Self {
        Self::built_in()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_keys_round_trip() {
        for event in LifecycleEvent::ALL {
            assert_eq!(LifecycleEvent::from_key(event.key()), Some(event));
        }
        assert_eq!(LifecycleEvent::from_key("weirdEvent"), None);
    }

    #[test]
    fn event_serializes_as_camel_case_key() {
        let json = serde_json::to_string(&LifecycleEvent::ClosedDuplicate).unwrap();
        assert_eq!(json, "\"closedDuplicate\"");
    }

    #[test]
    fn built_in_matrix_matches_default_table() {
        let matrix = NotificationMatrix::built_in();
        let expect = [
            (LifecycleEvent::Opened, (true, false, true, true, true)),
            (LifecycleEvent::Assigned, (false, true, false, true, true)),
            (LifecycleEvent::Commented, (true, true, false, false, false)),
            (LifecycleEvent::Closed, (true, true, true, true, true)),
            (LifecycleEvent::ClosedDuplicate, (true, true, true, true, true)),
            (LifecycleEvent::Reopened, (true, true, true, true, true)),
        ];
        for (event, (creator, assignee, technician, manager, admin)) in expect {
            let flags = matrix.flags(event).unwrap();
            assert_eq!(
                flags,
                RecipientFlags::new(creator, assignee, technician, manager, admin),
                "wrong defaults for {event}"
            );
        }
    }

    #[test]
    fn merge_preserves_explicit_false_leaves() {
        let doc: MatrixDocument = serde_json::from_value(serde_json::json!({
            "closed": { "creator": false }
        }))
        .unwrap();
        let matrix = NotificationMatrix::merged(&doc);
        let flags = matrix.flags(LifecycleEvent::Closed).unwrap();
        assert!(!flags.creator);
        // Absent leaves keep their defaults.
        assert!(flags.assignee && flags.technician && flags.manager && flags.admin);
    }

    #[test]
    fn merge_ignores_unknown_event_keys() {
        let doc: MatrixDocument = serde_json::from_value(serde_json::json!({
            "escalated": { "admin": false }
        }))
        .unwrap();
        assert_eq!(NotificationMatrix::merged(&doc), NotificationMatrix::built_in());
    }

    #[test]
    fn matrix_serializes_with_event_keys() {
        let json = serde_json::to_value(NotificationMatrix::built_in()).unwrap();
        assert!(json.get("closedDuplicate").is_some());
        assert_eq!(json["assigned"]["assignee"], serde_json::json!(true));
    }

    #[test]
    fn template_merge_falls_back_on_blank_leaves() {
        let doc: TemplateDocument = serde_json::from_value(serde_json::json!({
            "opened": { "subject": "Custom: {summary}", "body": "   " }
        }))
        .unwrap();
        let templates = TemplateMap::merged(&doc);
        let opened = templates.template(LifecycleEvent::Opened);
        assert_eq!(opened.subject, "Custom: {summary}");
        assert_eq!(opened.body, EventTemplate::built_in(LifecycleEvent::Opened).body);
    }

    #[test]
    fn built_in_templates_cover_every_event() {
        let templates = TemplateMap::built_in();
        for event in LifecycleEvent::ALL {
            let t = templates.template(event);
            assert!(t.subject.contains("{ticketId}"), "subject for {event}");
            assert!(t.body.contains("{ticketId}"), "body for {event}");
        }
        assert!(templates
            .template(LifecycleEvent::Commented)
            .body
            .contains("{comment}"));
    }
}
