//! Admin draft editing.
//!
//! Each admin session edits its own draft. Edits stay in memory until the
//! admin commits; a failed commit keeps them for a retry.

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{header, HeaderMap},
    Extension, Json,
};
use domain::models::{ContentSnapshot, SectionValue};
use domain::services::{DraftStatus, EditOutcome, ImageTarget, ImageUpload, ListEdit};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::metrics::record_image_upload;
use crate::services::AdminSession;

/// Draft content together with its save state.
#[derive(Debug, Serialize)]
pub struct DraftResponse {
    pub content: ContentSnapshot,
    pub status: DraftStatus,
}

/// Result of a list edit.
#[derive(Debug, Serialize)]
pub struct EditResponse {
    pub outcome: EditOutcome,
    pub status: DraftStatus,
}

/// Result of an image upload into the draft.
#[derive(Debug, Serialize)]
pub struct DraftImageResponse {
    pub url: String,
    pub status: DraftStatus,
}

/// Query parameters addressing the field an uploaded image goes to.
#[derive(Debug, Deserialize)]
pub struct ImageTargetQuery {
    pub target: String,
    pub id: Option<String>,
    pub slot: Option<usize>,
    pub filename: Option<String>,
}

/// `GET /api/v1/admin/draft`: starts the session's draft on first use.
pub async fn get_draft(
    State(state): State<AppState>,
    Extension(session): Extension<AdminSession>,
) -> Json<DraftResponse> {
    let draft = state.drafts.get_or_init(&session.session_id, &state.content).await;
    let draft = draft.lock().await;
    Json(DraftResponse {
        content: draft.snapshot().clone(),
        status: draft.status(),
    })
}

/// `DELETE /api/v1/admin/draft`: throws away unsaved edits.
pub async fn discard_draft(
    State(state): State<AppState>,
    Extension(session): Extension<AdminSession>,
) -> Json<DraftResponse> {
    if state.drafts.discard(&session.session_id) {
        info!(principal = %session.principal, "Admin discarded draft");
    }
    get_draft(State(state), Extension(session)).await
}

/// `PUT /api/v1/admin/draft/sections`: replaces one section wholesale.
pub async fn replace_section(
    State(state): State<AppState>,
    Extension(session): Extension<AdminSession>,
    Json(value): Json<SectionValue>,
) -> Json<DraftStatus> {
    let draft = state.drafts.get_or_init(&session.session_id, &state.content).await;
    let mut draft = draft.lock().await;
    let section = value.section();
    draft.replace_section(value);
    tracing::debug!(section = %section, "Draft section replaced");
    Json(draft.status())
}

/// `POST /api/v1/admin/draft/edits`: one append, update, remove or reorder.
pub async fn apply_edit(
    State(state): State<AppState>,
    Extension(session): Extension<AdminSession>,
    Json(edit): Json<ListEdit>,
) -> Json<EditResponse> {
    let draft = state.drafts.get_or_init(&session.session_id, &state.content).await;
    let mut draft = draft.lock().await;
    let outcome = draft.apply(edit, state.images.detacher());
    Json(EditResponse {
        outcome,
        status: draft.status(),
    })
}

/// `POST /api/v1/admin/draft/images?target=..`: uploads the request body
/// and assigns it to the addressed field.
pub async fn upload_image(
    State(state): State<AppState>,
    Extension(session): Extension<AdminSession>,
    Query(query): Query<ImageTargetQuery>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<DraftImageResponse>, ApiError> {
    let target = ImageTarget::from_parts(&query.target, query.id, query.slot)?;
    let upload = ImageUpload {
        file_name: query.filename.unwrap_or_else(|| query.target.clone()),
        content_type: content_type(&headers),
        bytes: body.to_vec(),
    };

    let draft = state.drafts.get_or_init(&session.session_id, &state.content).await;
    let result = state.images.upload_and_assign(&draft, &upload, &target).await;
    record_image_upload(if result.is_ok() { "success" } else { "failure" });
    let url = result?;

    let status = draft.lock().await.status();
    Ok(Json(DraftImageResponse { url, status }))
}

/// `POST /api/v1/admin/draft/commit`: saves the whole draft in one
/// transaction.
pub async fn commit(
    State(state): State<AppState>,
    Extension(session): Extension<AdminSession>,
) -> Result<Json<DraftStatus>, ApiError> {
    let draft = state.drafts.get_or_init(&session.session_id, &state.content).await;
    let mut draft = draft.lock().await;
    state.content.commit(&mut draft).await?;
    info!(principal = %session.principal, "Admin committed draft");
    Ok(Json(draft.status()))
}

pub(crate) fn content_type(headers: &HeaderMap) -> String {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}
