//! Background deletion of images that are no longer referenced.

use std::sync::Arc;

use domain::services::{ImageCleanup, ObjectStorage};
use metrics::counter;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Unbounded queue of image URLs to delete. Scheduling never blocks; a
/// single worker task performs the deletes.
#[derive(Debug, Clone)]
pub struct CleanupQueue {
    sender: mpsc::UnboundedSender<String>,
}

impl CleanupQueue {
    /// Starts the worker and returns the queue handle alongside it.
    ///
    /// The worker exits once every queue handle has been dropped and the
    /// remaining URLs have been processed.
    pub fn start(storage: Arc<dyn ObjectStorage>) -> (Self, JoinHandle<()>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let worker = tokio::spawn(run_worker(storage, receiver));
        (Self { sender }, worker)
    }
}

impl ImageCleanup for CleanupQueue {
    fn schedule_delete(&self, url: String) {
        debug!(url = %url, "Image queued for deletion");
        if self.sender.send(url).is_err() {
            warn!("Image cleanup worker is not running");
            counter!("image_cleanup_failures_total").increment(1);
        }
    }
}

async fn run_worker(storage: Arc<dyn ObjectStorage>, mut receiver: mpsc::UnboundedReceiver<String>) {
    while let Some(url) = receiver.recv().await {
        match storage.delete(&url).await {
            Ok(()) => info!(url = %url, "Deleted unreferenced image"),
            Err(e) => {
                warn!(url = %url, error = %e, "Failed to delete unreferenced image");
                counter!("image_cleanup_failures_total").increment(1);
            }
        }
    }
    debug!("Image cleanup worker stopped");
}
