//! Admin authentication middleware.
//!
//! Every admin route except login runs behind [`require_admin_session`]. The
//! resolved [`AdminSession`] is stored in request extensions for handlers.

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::app::AppState;
use crate::error::ApiError;
use crate::services::auth::{AdminSession, AuthError};

/// Extracts a bearer token from the Authorization header.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Middleware that requires an admin session.
///
/// With `auth.skip_auth` enabled the developer session is injected instead.
pub async fn require_admin_session(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let result = state.auth.authenticate(bearer_token(req.headers()));

    match result {
        Ok(session) => {
            tracing::debug!(
                principal = %session.principal,
                session_id = %session.session_id,
                "Admin request authenticated"
            );
            req.extensions_mut().insert::<AdminSession>(session);
            next.run(req).await
        }
        Err(e) => {
            let message = match e {
                AuthError::SessionExpired => "Session expired. Please log in again.",
                _ => "Admin login required",
            };
            ApiError::Unauthorized {
                message: message.to_string(),
                login_path: state.config.auth.login_path.clone(),
            }
            .into_response()
        }
    }
}
