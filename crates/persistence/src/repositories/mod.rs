//! Repository implementations for database operations.

pub mod content;

pub use content::{ContentRepository, SETTINGS_SINGLETON_KEY};
