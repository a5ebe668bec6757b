//! Domain layer for the Help Desk backend.
//!
//! This crate contains:
//! - Domain models (TicketSnapshot, UserRecord, notification configuration)
//! - Business logic services (event classification, recipient resolution,
//!   template rendering)

pub mod models;
pub mod services;
