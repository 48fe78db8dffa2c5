//! HTTP route handlers.

pub mod admin;
pub mod auth;
pub mod content;
pub mod draft;
pub mod health;
pub mod uploaded_files;
