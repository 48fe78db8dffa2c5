//! Image attachment: upload a picture, then point a content field at it.
//!
//! Uploads go through the [`ObjectStorage`] seam. Pictures that stop being
//! referenced are handed to an [`ImageCleanup`] sink which deletes them in the
//! background; an edit never waits on a delete.

use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex};

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info};

use super::draft::ContentDraft;
use crate::models::SALON_SPACE_SLOTS;

/// Error type for object storage adapters.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage I/O failed: {0}")]
    Io(String),

    #[error("Storage service returned {status}: {message}")]
    Service { status: u16, message: String },

    #[error("URL is not served by this storage: {0}")]
    ForeignUrl(String),
}

/// Error type for image uploads.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("Unsupported image type: {0}")]
    UnsupportedContentType(String),

    #[error("Upload body is empty")]
    EmptyBody,

    #[error("Upload exceeds the {limit} byte limit")]
    TooLarge { limit: usize },

    #[error("Image target not found: {0}")]
    InvalidTarget(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// An image received from the admin, not yet stored.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    /// Storage key for this upload: sanitized stem, random suffix, and an
    /// extension derived from the content type.
    pub fn object_key(&self) -> String {
        let stem = shared::validation::sanitize_file_stem(&self.file_name);
        let extension = shared::validation::image_extension(&self.content_type).unwrap_or("img");
        shared::crypto::object_key(&stem, extension)
    }
}

/// Object storage seam.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Stores the upload and returns its public URL.
    async fn put(&self, upload: &ImageUpload) -> Result<String, StorageError>;

    /// Deletes the object behind `url`. Deleting something already gone is
    /// not an error.
    async fn delete(&self, url: &str) -> Result<(), StorageError>;
}

/// Receives URLs whose objects should be deleted eventually.
pub trait ImageCleanup: Send + Sync {
    fn schedule_delete(&self, url: String);
}

/// Releases pictures that are no longer referenced.
#[derive(Clone)]
pub struct ImageDetacher {
    sink: Arc<dyn ImageCleanup>,
    bundled_prefix: String,
}

impl std::fmt::Debug for ImageDetacher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageDetacher")
            .field("bundled_prefix", &self.bundled_prefix)
            .finish()
    }
}

impl ImageDetacher {
    pub fn new(sink: Arc<dyn ImageCleanup>, bundled_prefix: impl Into<String>) -> Self {
        Self {
            sink,
            bundled_prefix: bundled_prefix.into(),
        }
    }

    /// Whether `url` points at an asset shipped with the site.
    pub fn is_bundled(&self, url: &str) -> bool {
        !self.bundled_prefix.is_empty() && url.starts_with(&self.bundled_prefix)
    }

    /// Queues `url` for deletion. Empty and bundled URLs are skipped.
    /// Returns true when something was queued.
    pub fn detach(&self, url: &str) -> bool {
        let url = url.trim();
        if url.is_empty() {
            return false;
        }
        if self.is_bundled(url) {
            debug!(url = %url, "Skipping cleanup of bundled asset");
            return false;
        }
        self.sink.schedule_delete(url.to_string());
        true
    }
}

/// Where an uploaded picture goes in the draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageTarget {
    /// Replaces the staff member's portrait.
    Staff { id: String },
    /// Appends to the gallery item's pictures.
    Gallery { id: String },
    /// Replaces an existing hero image, or adds a new one when `id` is `None`.
    Hero { id: Option<String> },
    /// Replaces the picture in one of the three salon space slots.
    SalonSpace { slot: usize },
}

impl ImageTarget {
    /// Builds a target from loosely typed request parameters.
    pub fn from_parts(
        target: &str,
        id: Option<String>,
        slot: Option<usize>,
    ) -> Result<Self, UploadError> {
        let id = id.filter(|id| !id.trim().is_empty());
        match (target, id, slot) {
            ("staff", Some(id), _) => Ok(ImageTarget::Staff { id }),
            ("gallery", Some(id), _) => Ok(ImageTarget::Gallery { id }),
            ("hero", id, _) => Ok(ImageTarget::Hero { id }),
            ("salonSpace", _, Some(slot)) if slot < SALON_SPACE_SLOTS => {
                Ok(ImageTarget::SalonSpace { slot })
            }
            (other, _, _) => Err(UploadError::InvalidTarget(other.to_string())),
        }
    }
}

impl std::fmt::Display for ImageTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImageTarget::Staff { id } => write!(f, "staff:{}", id),
            ImageTarget::Gallery { id } => write!(f, "gallery:{}", id),
            ImageTarget::Hero { id: Some(id) } => write!(f, "hero:{}", id),
            ImageTarget::Hero { id: None } => write!(f, "hero:new"),
            ImageTarget::SalonSpace { slot } => write!(f, "salonSpace:{}", slot),
        }
    }
}

/// Uploads pictures and wires them into a draft.
pub struct ImageAttachment {
    storage: Arc<dyn ObjectStorage>,
    detacher: ImageDetacher,
    max_upload_bytes: usize,
}

impl ImageAttachment {
    pub fn new(
        storage: Arc<dyn ObjectStorage>,
        detacher: ImageDetacher,
        max_upload_bytes: usize,
    ) -> Self {
        Self {
            storage,
            detacher,
            max_upload_bytes,
        }
    }

    pub fn detacher(&self) -> &ImageDetacher {
        &self.detacher
    }

    fn check(&self, upload: &ImageUpload) -> Result<(), UploadError> {
        if shared::validation::validate_image_content_type(&upload.content_type).is_err() {
            return Err(UploadError::UnsupportedContentType(
                upload.content_type.clone(),
            ));
        }
        if upload.bytes.is_empty() {
            return Err(UploadError::EmptyBody);
        }
        if upload.bytes.len() > self.max_upload_bytes {
            return Err(UploadError::TooLarge {
                limit: self.max_upload_bytes,
            });
        }
        Ok(())
    }

    /// Stores an image without touching any draft. Returns its public URL.
    pub async fn upload(&self, upload: &ImageUpload) -> Result<String, UploadError> {
        self.check(upload)?;
        let url = self.storage.put(upload).await?;
        info!(
            url = %url,
            bytes = upload.bytes.len(),
            content_type = %upload.content_type,
            "Image stored"
        );
        Ok(url)
    }

    /// Stores an image and assigns its URL to `target` in the draft.
    ///
    /// The content type is checked before anything is transferred. The draft
    /// lock is not held during the transfer; if the target disappeared in the
    /// meantime the fresh object is released again.
    pub async fn upload_and_assign(
        &self,
        draft: &Mutex<ContentDraft>,
        upload: &ImageUpload,
        target: &ImageTarget,
    ) -> Result<String, UploadError> {
        self.check(upload)?;

        if !draft.lock().await.has_image_target(target) {
            return Err(UploadError::InvalidTarget(target.to_string()));
        }

        let url = self.upload(upload).await?;

        let assigned = draft.lock().await.assign_image(target, url.clone());
        if !assigned {
            self.detacher.detach(&url);
            return Err(UploadError::InvalidTarget(target.to_string()));
        }
        Ok(url)
    }

    /// Releases a picture the admin removed.
    pub fn detach(&self, url: &str) -> bool {
        self.detacher.detach(url)
    }
}

/// Cleanup sink that only remembers what it was given.
#[derive(Debug, Default)]
pub struct RecordingCleanup {
    urls: StdMutex<Vec<String>>,
}

impl RecordingCleanup {
    pub fn urls(&self) -> Vec<String> {
        self.urls.lock().map(|u| u.clone()).unwrap_or_default()
    }
}

impl ImageCleanup for RecordingCleanup {
    fn schedule_delete(&self, url: String) {
        if let Ok(mut urls) = self.urls.lock() {
            urls.push(url);
        }
    }
}

/// In-memory object storage for development and testing.
#[derive(Debug, Default)]
pub struct MockObjectStorage {
    objects: StdMutex<HashMap<String, Vec<u8>>>,
    /// Whether to simulate an unavailable storage service.
    pub simulate_failure: bool,
}

/// Base URL of objects held by [`MockObjectStorage`].
pub const MOCK_STORAGE_BASE_URL: &str = "https://storage.test/salon";

impl MockObjectStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock storage that rejects every request.
    pub fn failing() -> Self {
        Self {
            simulate_failure: true,
            ..Self::default()
        }
    }

    pub fn contains(&self, url: &str) -> bool {
        self.objects
            .lock()
            .map(|objects| objects.contains_key(url))
            .unwrap_or(false)
    }

    pub fn object_count(&self) -> usize {
        self.objects.lock().map(|o| o.len()).unwrap_or(0)
    }

    fn unavailable() -> StorageError {
        StorageError::Service {
            status: 503,
            message: "simulated outage".to_string(),
        }
    }
}

#[async_trait]
impl ObjectStorage for MockObjectStorage {
    async fn put(&self, upload: &ImageUpload) -> Result<String, StorageError> {
        if self.simulate_failure {
            return Err(Self::unavailable());
        }
        let url = format!("{}/{}", MOCK_STORAGE_BASE_URL, upload.object_key());
        self.objects
            .lock()
            .map_err(|e| StorageError::Io(e.to_string()))?
            .insert(url.clone(), upload.bytes.clone());
        Ok(url)
    }

    async fn delete(&self, url: &str) -> Result<(), StorageError> {
        if self.simulate_failure {
            return Err(Self::unavailable());
        }
        if !url.starts_with(MOCK_STORAGE_BASE_URL) {
            return Err(StorageError::ForeignUrl(url.to_string()));
        }
        self.objects
            .lock()
            .map_err(|e| StorageError::Io(e.to_string()))?
            .remove(url);
        Ok(())
    }
}
