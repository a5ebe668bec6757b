//! Ticket snapshot domain models.
//!
//! A [`TicketSnapshot`] is the immutable view of a ticket read at event time.
//! It is provided by the ticket CRUD application alongside each mutation and
//! is never persisted by this service.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Ticket status. Well-known statuses drive event classification; anything
/// else is carried through verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TicketStatus {
    Open,
    Closed,
    ClosedDuplicate,
    Other(String),
}

impl TicketStatus {
    pub fn as_str(&self) -> &str {
        match self {
            TicketStatus::Open => "Open",
            TicketStatus::Closed => "Closed",
            TicketStatus::ClosedDuplicate => "Closed (Duplicate)",
            TicketStatus::Other(s) => s,
        }
    }
}

impl Default for TicketStatus {
    fn default() -> Self {
        TicketStatus::Open
    }
}

impl From<&str> for TicketStatus {
    fn from(s: &str) -> Self {
        match s {
            "Open" => TicketStatus::Open,
            "Closed" => TicketStatus::Closed,
            "Closed (Duplicate)" => TicketStatus::ClosedDuplicate,
            other => TicketStatus::Other(other.to_string()),
        }
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for TicketStatus {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for TicketStatus {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(TicketStatus::from(s.as_str()))
    }
}

/// Ticket priority.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TicketPriority {
    High,
    #[default]
    Medium,
    Low,
}

impl TicketPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketPriority::High => "High",
            TicketPriority::Medium => "Medium",
            TicketPriority::Low => "Low",
        }
    }
}

impl fmt::Display for TicketPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Immutable view of a ticket at the moment a mutation happened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketSnapshot {
    pub id: i64,
    #[serde(default)]
    pub department: String,
    pub summary: String,
    #[serde(default)]
    pub status: TicketStatus,
    #[serde(default)]
    pub priority: TicketPriority,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub assignee: Option<String>,
    pub creator: String,
}

impl TicketSnapshot {
    /// The assignee identifier, with absent treated as empty.
    pub fn assignee_or_empty(&self) -> &str {
        self.assignee.as_deref().unwrap_or("")
    }
}
