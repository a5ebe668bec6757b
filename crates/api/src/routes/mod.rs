//! Route handlers.

pub mod health;
pub mod notifications;
pub mod ticket_events;
