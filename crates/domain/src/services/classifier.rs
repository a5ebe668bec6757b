//! Lifecycle event classification.
//!
//! Pure diff over two ticket snapshots. Each rule is evaluated
//! independently, so a single mutation can fire several events (closing and
//! reassigning in one update fires both `closed` and `assigned`).
//! `commented` is never derived here; the caller reports it explicitly when
//! a comment is added.

use crate::models::{LifecycleEvent, TicketSnapshot, TicketStatus};

/// Determine which lifecycle events a ticket mutation fired.
///
/// `previous` is `None` for a freshly created ticket. Creation fires
/// `opened`, and also `assigned` when the ticket is created with an assignee
/// already set (the absent previous assignee is treated as empty). Status
/// transition events compare against the previous status and therefore never
/// fire at creation.
pub fn classify(previous: Option<&TicketSnapshot>, next: &TicketSnapshot) -> Vec<LifecycleEvent> {
    let mut events = Vec::new();

    match previous {
        None => events.push(LifecycleEvent::Opened),
        Some(prev) => {
            if prev.status != TicketStatus::Closed && next.status == TicketStatus::Closed {
                events.push(LifecycleEvent::Closed);
            }
            if prev.status != TicketStatus::ClosedDuplicate
                && next.status == TicketStatus::ClosedDuplicate
            {
                events.push(LifecycleEvent::ClosedDuplicate);
            }
            if prev.status != TicketStatus::Open && next.status == TicketStatus::Open {
                events.push(LifecycleEvent::Reopened);
            }
        }
    }

    let prev_assignee = previous.map(|p| p.assignee_or_empty()).unwrap_or("");
    let next_assignee = next.assignee_or_empty();
    if !next_assignee.is_empty() && next_assignee != prev_assignee {
        events.push(LifecycleEvent::Assigned);
    }

    events
}
