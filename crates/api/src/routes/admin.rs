//! Direct admin content and image endpoints.

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::HeaderMap,
    Extension, Json,
};
use domain::models::ContentSnapshot;
use domain::services::ImageUpload;
use metrics::counter;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::metrics::record_image_upload;
use crate::routes::draft::content_type;
use crate::services::AdminSession;

#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub struct UploadQuery {
    pub filename: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DeleteImageRequest {
    #[serde(default)]
    pub url: String,
}

/// `POST /api/v1/admin/content`: replaces all stored content with the
/// request body in one transaction.
pub async fn save_content(
    State(state): State<AppState>,
    Extension(session): Extension<AdminSession>,
    Json(snapshot): Json<ContentSnapshot>,
) -> Result<Json<SuccessResponse>, ApiError> {
    state.content.save_all(&snapshot).await?;
    info!(principal = %session.principal, "Admin saved all content");
    Ok(Json(SuccessResponse { success: true }))
}

/// `POST /api/v1/admin/uploads?filename=..`: stores the request body and
/// returns its URL. Nothing in the content changes.
pub async fn upload(
    State(state): State<AppState>,
    Query(query): Query<UploadQuery>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<UploadResponse>, ApiError> {
    let upload = ImageUpload {
        file_name: query.filename.unwrap_or_else(|| "image".to_string()),
        content_type: content_type(&headers),
        bytes: body.to_vec(),
    };

    let result = state.images.upload(&upload).await;
    record_image_upload(if result.is_ok() { "success" } else { "failure" });
    Ok(Json(UploadResponse { url: result? }))
}

/// `POST /api/v1/admin/images/delete`: removes a stored image. An image that
/// is already gone counts as success; storage failures are logged and
/// reported as `success: false`.
pub async fn delete_image(
    State(state): State<AppState>,
    Json(request): Json<DeleteImageRequest>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let url = request.url.trim();
    if url.is_empty() {
        return Err(ApiError::Validation("url is required".to_string()));
    }

    if state.images.detacher().is_bundled(url) {
        return Ok(Json(SuccessResponse { success: false }));
    }

    match state.storage.delete(url).await {
        Ok(()) => {
            info!(url = %url, "Image deleted");
            Ok(Json(SuccessResponse { success: true }))
        }
        Err(e) => {
            warn!(url = %url, error = %e, "Image delete failed");
            counter!("image_cleanup_failures_total").increment(1);
            Ok(Json(SuccessResponse { success: false }))
        }
    }
}
