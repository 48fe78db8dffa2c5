//! Persistence layer for the salon site content service.
//!
//! This crate contains:
//! - Database connection management
//! - Entity definitions (database row mappings)
//! - The content repository, which implements the domain `ContentGateway`
//! - SQL migrations (`src/migrations`)

pub mod db;
pub mod entities;
pub mod metrics;
pub mod repositories;
