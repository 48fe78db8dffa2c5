//! Object storage adapters for uploaded images.
//!
//! `local` writes files under a directory that the server itself serves at
//! `storage.public_base_url`. `http` talks to a blob service with bearer
//! authenticated PUT and DELETE requests.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use domain::services::{ImageUpload, ObjectStorage, StorageError};
use reqwest::{header, Client, StatusCode};
use tokio::fs;
use tracing::debug;

use crate::config::StorageConfig;

/// Builds the adapter selected by `storage.provider`.
pub fn build_storage(config: &StorageConfig) -> Result<Arc<dyn ObjectStorage>, StorageError> {
    match config.provider.as_str() {
        "http" => Ok(Arc::new(HttpObjectStorage::new(
            &config.http_endpoint,
            &config.http_token,
            Duration::from_millis(config.timeout_ms),
        )?)),
        _ => Ok(Arc::new(LocalObjectStorage::new(
            &config.local_dir,
            &config.public_base_url,
        ))),
    }
}

/// Whether `key` names a single file directly under the storage root.
pub fn is_valid_object_key(key: &str) -> bool {
    !key.is_empty()
        && key != "."
        && key != ".."
        && !key.starts_with('.')
        && !key.contains('/')
        && !key.contains('\\')
}

/// Stores uploads as files in a local directory.
#[derive(Debug, Clone)]
pub struct LocalObjectStorage {
    root: PathBuf,
    public_base_url: String,
}

impl LocalObjectStorage {
    pub fn new(root: impl Into<PathBuf>, public_base_url: &str) -> Self {
        Self {
            root: root.into(),
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Maps a public URL back to its object key.
    fn key_for_url<'a>(&self, url: &'a str) -> Option<&'a str> {
        url.strip_prefix(self.public_base_url.as_str())
            .and_then(|rest| rest.strip_prefix('/'))
            .filter(|key| is_valid_object_key(key))
    }
}

#[async_trait]
impl ObjectStorage for LocalObjectStorage {
    async fn put(&self, upload: &ImageUpload) -> Result<String, StorageError> {
        let key = upload.object_key();
        fs::create_dir_all(&self.root)
            .await
            .map_err(|e| StorageError::Io(e.to_string()))?;
        fs::write(self.root.join(&key), &upload.bytes)
            .await
            .map_err(|e| StorageError::Io(e.to_string()))?;

        Ok(format!("{}/{}", self.public_base_url, key))
    }

    async fn delete(&self, url: &str) -> Result<(), StorageError> {
        let key = self
            .key_for_url(url)
            .ok_or_else(|| StorageError::ForeignUrl(url.to_string()))?;

        match fs::remove_file(self.root.join(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(url = %url, "Image already gone");
                Ok(())
            }
            Err(e) => Err(StorageError::Io(e.to_string())),
        }
    }
}

/// Stores uploads in a remote blob service.
#[derive(Debug, Clone)]
pub struct HttpObjectStorage {
    client: Client,
    endpoint: String,
    token: String,
}

impl HttpObjectStorage {
    pub fn new(endpoint: &str, token: &str, timeout: Duration) -> Result<Self, StorageError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| StorageError::Io(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            token: token.to_string(),
        })
    }

    fn owns(&self, url: &str) -> bool {
        url.strip_prefix(self.endpoint.as_str())
            .and_then(|rest| rest.strip_prefix('/'))
            .is_some_and(is_valid_object_key)
    }

    fn request(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if self.token.is_empty() {
            builder
        } else {
            builder.bearer_auth(&self.token)
        }
    }
}

async fn service_error(response: reqwest::Response) -> StorageError {
    let status = response.status().as_u16();
    let message = response.text().await.unwrap_or_default();
    StorageError::Service { status, message }
}

#[async_trait]
impl ObjectStorage for HttpObjectStorage {
    async fn put(&self, upload: &ImageUpload) -> Result<String, StorageError> {
        let url = format!("{}/{}", self.endpoint, upload.object_key());
        let response = self
            .request(self.client.put(&url))
            .header(header::CONTENT_TYPE, upload.content_type.as_str())
            .body(upload.bytes.clone())
            .send()
            .await
            .map_err(|e| StorageError::Io(e.to_string()))?;

        if !response.status().is_success() {
            return Err(service_error(response).await);
        }
        Ok(url)
    }

    async fn delete(&self, url: &str) -> Result<(), StorageError> {
        if !self.owns(url) {
            return Err(StorageError::ForeignUrl(url.to_string()));
        }

        let response = self
            .request(self.client.delete(url))
            .send()
            .await
            .map_err(|e| StorageError::Io(e.to_string()))?;

        match response.status() {
            status if status.is_success() => Ok(()),
            StatusCode::NOT_FOUND => {
                debug!(url = %url, "Image already gone");
                Ok(())
            }
            _ => Err(service_error(response).await),
        }
    }
}
