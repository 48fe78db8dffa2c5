//! Per-session admin drafts.

use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex};
use std::time::{Duration, Instant};

use domain::services::ContentDraft;
use metrics::gauge;
use tokio::sync::Mutex;
use tracing::{info, warn};

use super::content::ContentService;

pub type SharedDraft = Arc<Mutex<ContentDraft>>;

struct DraftEntry {
    draft: SharedDraft,
    last_touched: Instant,
}

/// Holds one draft per admin session. A draft is created from freshly
/// fetched content the first time its session asks for it.
#[derive(Default)]
pub struct DraftStore {
    entries: StdMutex<HashMap<String, DraftEntry>>,
}

impl DraftStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lookup(&self, session_id: &str) -> Option<SharedDraft> {
        let mut entries = self.entries.lock().ok()?;
        entries.get_mut(session_id).map(|entry| {
            entry.last_touched = Instant::now();
            entry.draft.clone()
        })
    }

    /// Returns the session's draft, initializing it once.
    pub async fn get_or_init(&self, session_id: &str, content: &ContentService) -> SharedDraft {
        if let Some(draft) = self.lookup(session_id) {
            return draft;
        }

        let fresh = ContentDraft::initialize(content.fresh_snapshot().await);
        let draft = match self.entries.lock() {
            Ok(mut entries) => {
                // Another request for the same session may have won the race
                let entry = entries
                    .entry(session_id.to_string())
                    .or_insert_with(|| DraftEntry {
                        draft: Arc::new(Mutex::new(fresh)),
                        last_touched: Instant::now(),
                    });
                let draft = entry.draft.clone();
                gauge!("admin_drafts_active").set(entries.len() as f64);
                draft
            }
            Err(_) => Arc::new(Mutex::new(fresh)),
        };
        info!(session_id = %session_id, "Admin draft ready");
        draft
    }

    /// Drops the session's draft, unsaved edits included.
    pub fn discard(&self, session_id: &str) -> bool {
        let Ok(mut entries) = self.entries.lock() else {
            return false;
        };
        let removed = entries.remove(session_id).is_some();
        gauge!("admin_drafts_active").set(entries.len() as f64);
        removed
    }

    /// Drops drafts that have not been used for `max_idle`. Returns how many
    /// were dropped.
    pub fn evict_idle(&self, max_idle: Duration) -> usize {
        let Ok(mut entries) = self.entries.lock() else {
            return 0;
        };

        let expired: Vec<String> = entries
            .iter()
            .filter(|(_, entry)| entry.last_touched.elapsed() >= max_idle)
            .map(|(id, _)| id.clone())
            .collect();

        for session_id in &expired {
            if let Some(entry) = entries.remove(session_id) {
                let dirty = entry
                    .draft
                    .try_lock()
                    .map(|draft| draft.is_dirty())
                    .unwrap_or(false);
                if dirty {
                    warn!(session_id = %session_id, "Discarding idle draft with unsaved edits");
                }
            }
        }

        gauge!("admin_drafts_active").set(entries.len() as f64);
        expired.len()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
