//! Drops admin drafts whose session can no longer be used.

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use super::scheduler::{Job, JobFrequency};
use crate::services::DraftStore;

/// Evicts drafts idle for longer than the session lifetime.
pub struct DraftExpiryJob {
    drafts: Arc<DraftStore>,
    max_idle: Duration,
}

impl DraftExpiryJob {
    pub fn new(drafts: Arc<DraftStore>, max_idle: Duration) -> Self {
        Self { drafts, max_idle }
    }
}

#[async_trait::async_trait]
impl Job for DraftExpiryJob {
    fn name(&self) -> &'static str {
        "draft_expiry"
    }

    fn frequency(&self) -> JobFrequency {
        JobFrequency::Minutes(5)
    }

    async fn execute(&self) -> Result<(), String> {
        let evicted = self.drafts.evict_idle(self.max_idle);
        if evicted > 0 {
            info!(evicted, remaining = self.drafts.len(), "Evicted idle admin drafts");
        }
        Ok(())
    }
}
