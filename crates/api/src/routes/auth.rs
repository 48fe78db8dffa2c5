//! Admin login and logout.

use axum::{extract::State, http::StatusCode, Extension, Json};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::services::auth::{AdminSession, AuthError};

/// Request body for admin login.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Response body for a successful login.
#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub token_type: String,
    pub expires_in: i64,
}

/// Who is logged in, for the admin header.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub principal: String,
    pub development_mode: bool,
}

/// `POST /api/v1/admin/login`
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    request.validate()?;

    let issued = state.auth.login(&request.password).map_err(|e| match e {
        AuthError::InvalidCredentials => ApiError::Unauthorized {
            message: "Invalid password".to_string(),
            login_path: state.config.auth.login_path.clone(),
        },
        other => ApiError::Internal(other.to_string()),
    })?;

    Ok(Json(LoginResponse {
        token: issued.token,
        token_type: "Bearer".to_string(),
        expires_in: issued.expires_in,
    }))
}

/// `POST /api/v1/admin/logout`: ends the session and drops its draft.
pub async fn logout(
    State(state): State<AppState>,
    Extension(session): Extension<AdminSession>,
) -> StatusCode {
    state.drafts.discard(&session.session_id);
    state.auth.logout(&session);
    StatusCode::NO_CONTENT
}

/// `GET /api/v1/admin/session`
pub async fn current_session(
    State(state): State<AppState>,
    Extension(session): Extension<AdminSession>,
) -> Json<SessionResponse> {
    Json(SessionResponse {
        principal: session.principal,
        development_mode: state.auth.skip_auth(),
    })
}
