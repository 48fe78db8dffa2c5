//! Domain layer for the salon site content service.
//!
//! This crate contains:
//! - Content models (menu, staff, gallery, FAQ, site info) and the
//!   serializable `ContentSnapshot` that aggregates them
//! - The admin editing machinery: ordered list editor, content draft and
//!   image attachment helper
//! - The `ContentGateway` and `ObjectStorage` seams implemented by the
//!   persistence and api crates

pub mod models;
pub mod services;
