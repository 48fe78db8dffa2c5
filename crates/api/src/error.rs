use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use domain::services::{ContentError, StorageError, UploadError};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or invalid admin session. Carries the login page path.
    #[error("Unauthorized: {message}")]
    Unauthorized { message: String, login_path: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    #[error("Rate limited")]
    RateLimited,

    /// A transactional content write failed. Sending the same content again
    /// may succeed.
    #[error("Save failed: {0}")]
    SaveFailed(String),

    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    login_path: Option<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    retryable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Vec<ValidationDetail>>,
}

#[derive(Debug, Serialize)]
pub struct ValidationDetail {
    pub field: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut login_path = None;
        let mut retryable = false;

        let (status, error_code, message) = match self {
            ApiError::Unauthorized {
                message,
                login_path: path,
            } => {
                login_path = Some(path);
                (StatusCode::UNAUTHORIZED, "unauthorized", message)
            }
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg),
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, "validation_error", msg),
            ApiError::PayloadTooLarge(msg) => {
                (StatusCode::PAYLOAD_TOO_LARGE, "payload_too_large", msg)
            }
            ApiError::RateLimited => (
                StatusCode::TOO_MANY_REQUESTS,
                "rate_limited",
                "Too many requests. Please try again later.".into(),
            ),
            ApiError::SaveFailed(msg) => {
                tracing::error!("Content save failed: {}", msg);
                retryable = true;
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "save_failed",
                    "Saving failed. Your changes are kept; please try again.".into(),
                )
            }
            ApiError::StorageUnavailable(msg) => {
                tracing::error!("Image storage failed: {}", msg);
                retryable = true;
                (
                    StatusCode::BAD_GATEWAY,
                    "storage_unavailable",
                    "Image storage is unavailable. Please try again.".into(),
                )
            }
            ApiError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".into(),
                )
            }
            ApiError::ServiceUnavailable(msg) => {
                (StatusCode::SERVICE_UNAVAILABLE, "service_unavailable", msg)
            }
        };

        let body = ErrorBody {
            error: error_code.into(),
            message,
            login_path,
            retryable,
            details: None,
        };

        (status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => ApiError::NotFound("Resource not found".into()),
            sqlx::Error::PoolTimedOut => {
                ApiError::ServiceUnavailable("Database is not reachable".into())
            }
            _ => ApiError::Internal(format!("Database error: {}", err)),
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let details: Vec<ValidationDetail> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |e| ValidationDetail {
                    field: field.to_string(),
                    message: e.message.clone().map(|m| m.to_string()).unwrap_or_default(),
                })
            })
            .collect();

        let message = if details.len() == 1 {
            details[0].message.clone()
        } else {
            format!("{} validation errors", details.len())
        };

        ApiError::Validation(message)
    }
}

impl From<ContentError> for ApiError {
    fn from(err: ContentError) -> Self {
        match err {
            ContentError::Write(msg) => ApiError::SaveFailed(msg),
            invalid @ ContentError::Invalid { .. } => ApiError::Validation(invalid.to_string()),
        }
    }
}

impl From<UploadError> for ApiError {
    fn from(err: UploadError) -> Self {
        match err {
            UploadError::UnsupportedContentType(_) | UploadError::EmptyBody => {
                ApiError::Validation(err.to_string())
            }
            UploadError::TooLarge { .. } => ApiError::PayloadTooLarge(err.to_string()),
            UploadError::InvalidTarget(_) => ApiError::NotFound(err.to_string()),
            UploadError::Storage(StorageError::ForeignUrl(url)) => {
                ApiError::Validation(format!("URL is not a stored upload: {}", url))
            }
            UploadError::Storage(e) => ApiError::StorageUnavailable(e.to_string()),
        }
    }
}
