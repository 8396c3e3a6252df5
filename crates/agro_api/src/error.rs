//! Error to HTTP response mapping.

use agro_core::model::field_errors::{FieldErrors, NON_FIELD_ERRORS};
use agro_core::{RepoError, ServiceError};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use log::error;
use serde_json::json;
use thiserror::Error;

pub type ApiResult<T> = Result<T, ApiError>;

pub const NOT_FOUND_DETAIL: &str = "Not found.";
pub const INVALID_PAGE_DETAIL: &str = "Invalid page.";
pub const INTERNAL_ERROR_MESSAGE: &str = "An error occurred while processing your request.";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("validation failed: {0}")]
    Validation(FieldErrors),
    /// Malformed body or conflicting write, reported as a non-field error.
    #[error("{0}")]
    BadRequest(String),
    #[error("not found")]
    NotFound,
    #[error("invalid page")]
    InvalidPage,
    /// Cause is logged, never sent to the client.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<ServiceError> for ApiError {
    fn from(value: ServiceError) -> Self {
        match value {
            ServiceError::Validation(errors) => Self::Validation(errors),
            ServiceError::Conflict(message) => Self::BadRequest(message),
            ServiceError::NotFound { .. } => Self::NotFound,
            ServiceError::Repo(err) => Self::Internal(err.to_string()),
        }
    }
}

impl From<RepoError> for ApiError {
    fn from(value: RepoError) -> Self {
        ServiceError::from(value).into()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(errors) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "errors": errors }))).into_response()
            }
            ApiError::BadRequest(message) => {
                let errors = FieldErrors::single(NON_FIELD_ERRORS, message);
                (StatusCode::BAD_REQUEST, Json(json!({ "errors": errors }))).into_response()
            }
            ApiError::NotFound => (
                StatusCode::NOT_FOUND,
                Json(json!({ "detail": NOT_FOUND_DETAIL })),
            )
                .into_response(),
            ApiError::InvalidPage => (
                StatusCode::NOT_FOUND,
                Json(json!({ "detail": INVALID_PAGE_DETAIL })),
            )
                .into_response(),
            ApiError::Internal(cause) => {
                error!("event=http_error module=api status=error error={cause}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": INTERNAL_ERROR_MESSAGE })),
                )
                    .into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ApiError;
    use agro_core::{RepoError, ServiceError};

    #[test]
    fn service_errors_map_to_api_errors() {
        assert!(matches!(
            ApiError::from(ServiceError::Conflict("taken".to_string())),
            ApiError::BadRequest(ref msg) if msg == "taken"
        ));
        assert!(matches!(
            ApiError::from(ServiceError::not_found("farm", 1)),
            ApiError::NotFound
        ));
    }
}
