//! Serves images stored by the local storage adapter.

use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use tokio::fs;
use tracing::warn;

use crate::app::AppState;
use crate::services::storage::is_valid_object_key;

/// Uploaded object keys carry a random suffix, so a stored file never changes.
const UPLOAD_CACHE_CONTROL: &str = "public, max-age=31536000, immutable";

/// `GET /uploads/*key`
pub async fn serve_upload(State(state): State<AppState>, Path(key): Path<String>) -> Response {
    let key = key.trim_start_matches('/');
    if !is_valid_object_key(key) {
        warn!(requested = %key, "Rejected upload path");
        return StatusCode::NOT_FOUND.into_response();
    }

    let path = std::path::Path::new(&state.config.storage.local_dir).join(key);
    let content = match fs::read(&path).await {
        Ok(content) => content,
        Err(_) => return StatusCode::NOT_FOUND.into_response(),
    };
    let mime = mime_guess::from_path(&path).first_or_octet_stream();

    (
        [
            (header::CONTENT_TYPE, mime.as_ref().to_string()),
            (header::CACHE_CONTROL, UPLOAD_CACHE_CONTROL.to_string()),
        ],
        Body::from(content),
    )
        .into_response()
}
