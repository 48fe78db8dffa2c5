//! Content read/write gateway.
//!
//! The gateway reads all five content sections and writes a whole
//! [`ContentSnapshot`] back atomically. The Postgres implementation lives in
//! the persistence crate.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex as StdMutex;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{ContentSnapshot, Section};

/// Error type for content writes.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("Failed to save content: {0}")]
    Write(String),

    #[error("Invalid {section} content: {message}")]
    Invalid { section: Section, message: String },
}

impl ContentError {
    /// Whether sending the same snapshot again may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ContentError::Write(_))
    }
}

/// Reads and writes site content.
#[async_trait]
pub trait ContentGateway: Send + Sync {
    /// Reads every section. A section whose read fails comes back empty (or
    /// as the default site info); this never fails as a whole.
    async fn fetch_all(&self) -> ContentSnapshot;

    /// Replaces all stored content with `snapshot` in one transaction.
    async fn save_all(&self, snapshot: &ContentSnapshot) -> Result<(), ContentError>;
}

/// In-memory gateway for development and testing.
#[derive(Debug, Default)]
pub struct MockContentGateway {
    stored: StdMutex<ContentSnapshot>,
    saves: AtomicUsize,
    /// Whether to simulate a failing transaction.
    pub simulate_failure: bool,
}

impl MockContentGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a gateway that already holds `snapshot`.
    pub fn with_content(snapshot: ContentSnapshot) -> Self {
        Self {
            stored: StdMutex::new(snapshot),
            ..Self::default()
        }
    }

    /// Create a gateway whose writes always fail.
    pub fn failing() -> Self {
        Self {
            simulate_failure: true,
            ..Self::default()
        }
    }

    /// Number of successful writes.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    pub fn stored(&self) -> ContentSnapshot {
        self.stored
            .lock()
            .map(|s| s.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl ContentGateway for MockContentGateway {
    async fn fetch_all(&self) -> ContentSnapshot {
        self.stored()
    }

    async fn save_all(&self, snapshot: &ContentSnapshot) -> Result<(), ContentError> {
        if self.simulate_failure {
            return Err(ContentError::Write("simulated write failure".to_string()));
        }

        let mut persisted = snapshot.clone();
        persisted.menu.renumber();
        persisted.staff.renumber();
        persisted.gallery.renumber();
        persisted.faq.renumber();

        let mut stored = self
            .stored
            .lock()
            .map_err(|e| ContentError::Write(e.to_string()))?;
        *stored = persisted;
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
