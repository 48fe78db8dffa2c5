//! Application services behind the HTTP handlers.

pub mod auth;
pub mod cleanup;
pub mod content;
pub mod drafts;
pub mod storage;

pub use auth::{AdminAuth, AdminSession, AuthError};
pub use cleanup::CleanupQueue;
pub use content::ContentService;
pub use drafts::{DraftStore, SharedDraft};
pub use storage::{build_storage, HttpObjectStorage, LocalObjectStorage};
