//! Route handlers, one module per resource.

pub(crate) mod crop_types;
pub(crate) mod crops;
pub(crate) mod dashboard;
pub(crate) mod farmers;
pub(crate) mod farms;
pub(crate) mod health;

use crate::error::{ApiError, ApiResult};
use crate::pagination::PageParams;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query};
use axum::Json;

pub(crate) async fn not_found() -> ApiError {
    ApiError::NotFound
}

/// Unparsable ids cannot name a stored record.
pub(crate) fn path_id<T>(path: Result<Path<T>, PathRejection>) -> ApiResult<T> {
    path.map(|Path(id)| id).map_err(|_| ApiError::NotFound)
}

pub(crate) fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> ApiResult<T> {
    body.map(|Json(value)| value)
        .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))
}

pub(crate) fn page_params(query: Result<Query<PageParams>, QueryRejection>) -> PageParams {
    query.map(|Query(params)| params).unwrap_or_default()
}
