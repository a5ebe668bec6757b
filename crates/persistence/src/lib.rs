//! Persistence layer for the help desk notification service.
//!
//! This crate contains:
//! - Database connection management
//! - Entity definitions (database row mappings)
//! - Repository implementations backing the domain directory and policy
//!   store traits

pub mod db;
pub mod entities;
pub mod metrics;
pub mod repositories;
