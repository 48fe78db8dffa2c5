//! Content service: public reads with a short-lived cache, and writes that
//! invalidate it.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use domain::models::ContentSnapshot;
use domain::services::{ContentDraft, ContentError, ContentGateway};
use metrics::counter;
use tokio::sync::RwLock;
use tracing::{debug, info};

struct CachedSnapshot {
    snapshot: ContentSnapshot,
    fetched_at: Instant,
}

/// Wraps the content gateway for the HTTP layer.
pub struct ContentService {
    gateway: Arc<dyn ContentGateway>,
    cache: RwLock<Option<CachedSnapshot>>,
    /// Bumped on every invalidation. A fetch that started under an older
    /// generation is not cached.
    generation: AtomicU64,
    ttl: Duration,
}

impl ContentService {
    pub fn new(gateway: Arc<dyn ContentGateway>, ttl: Duration) -> Self {
        Self {
            gateway,
            cache: RwLock::new(None),
            generation: AtomicU64::new(0),
            ttl,
        }
    }

    pub fn gateway(&self) -> &dyn ContentGateway {
        self.gateway.as_ref()
    }

    /// Content for public pages. Served from memory while the cached copy is
    /// younger than the TTL; a zero TTL disables caching.
    pub async fn public_snapshot(&self) -> ContentSnapshot {
        if !self.ttl.is_zero() {
            if let Some(cached) = self.cache.read().await.as_ref() {
                if cached.fetched_at.elapsed() < self.ttl {
                    return cached.snapshot.clone();
                }
            }
        }

        let generation = self.generation.load(Ordering::Acquire);
        let snapshot = self.gateway.fetch_all().await;
        if !self.ttl.is_zero() {
            let mut cache = self.cache.write().await;
            if self.generation.load(Ordering::Acquire) == generation {
                *cache = Some(CachedSnapshot {
                    snapshot: snapshot.clone(),
                    fetched_at: Instant::now(),
                });
            } else {
                debug!("Content changed during fetch; not caching");
            }
        }
        snapshot
    }

    /// Uncached content, used to start admin drafts.
    pub async fn fresh_snapshot(&self) -> ContentSnapshot {
        self.gateway.fetch_all().await
    }

    /// Writes a whole snapshot directly.
    pub async fn save_all(&self, snapshot: &ContentSnapshot) -> Result<(), ContentError> {
        let result = match snapshot.validate_required() {
            Ok(()) => self.gateway.save_all(snapshot).await,
            Err(e) => Err(e),
        };
        self.record_save(&result).await;
        result
    }

    /// Commits a draft through the gateway.
    pub async fn commit(&self, draft: &mut ContentDraft) -> Result<(), ContentError> {
        let result = draft.commit(self.gateway.as_ref()).await;
        self.record_save(&result).await;
        result
    }

    async fn record_save(&self, result: &Result<(), ContentError>) {
        let outcome = match result {
            Ok(()) => {
                self.invalidate().await;
                info!("Site content saved");
                "success"
            }
            Err(ContentError::Invalid { .. }) => "invalid",
            Err(ContentError::Write(_)) => "failure",
        };
        counter!("content_saves_total", "outcome" => outcome).increment(1);
    }

    pub async fn invalidate(&self) {
        let mut cache = self.cache.write().await;
        self.generation.fetch_add(1, Ordering::AcqRel);
        if cache.take().is_some() {
            debug!("Public content cache invalidated");
        }
    }
}
