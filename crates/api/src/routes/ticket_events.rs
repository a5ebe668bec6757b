//! Ticket mutation boundary.
//!
//! The (external) ticket CRUD application reports each mutation here. The
//! handler classifies which lifecycle events fired, spawns one
//! fire-and-forget dispatch task per event, and answers immediately.

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};

use domain::models::{LifecycleEvent, TicketSnapshot};
use domain::services::classify;

use crate::app::AppState;

/// A reported ticket mutation.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketEventRequest {
    /// Snapshot before the mutation. Absent for a freshly created ticket.
    #[serde(default)]
    pub previous: Option<TicketSnapshot>,
    /// Snapshot after the mutation.
    pub ticket: TicketSnapshot,
    /// Username of the acting user, when known.
    #[serde(default)]
    pub actor: Option<String>,
    /// Comment text, when the mutation was a comment being added.
    #[serde(default)]
    pub comment: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TicketEventResponse {
    pub events: Vec<LifecycleEvent>,
}

/// POST /internal/ticket-events
pub async fn handle_ticket_event(
    State(state): State<AppState>,
    Json(payload): Json<TicketEventRequest>,
) -> (StatusCode, Json<TicketEventResponse>) {
    let comment = payload
        .comment
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string);

    // A comment mutation is reported explicitly and never re-classified.
    let events = if comment.is_some() {
        vec![LifecycleEvent::Commented]
    } else {
        classify(payload.previous.as_ref(), &payload.ticket)
    };

    for event in &events {
        state.dispatcher.spawn(
            *event,
            payload.ticket.clone(),
            payload.actor.clone(),
            comment.clone(),
        );
    }

    tracing::debug!(
        ticket_id = payload.ticket.id,
        fired = events.len(),
        "ticket mutation processed"
    );
    (StatusCode::ACCEPTED, Json(TicketEventResponse { events }))
}
