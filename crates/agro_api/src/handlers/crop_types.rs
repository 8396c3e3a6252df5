//! `/agro/crops_type/` handlers. The listing is not paginated.

use super::{json_body, path_id};
use crate::error::ApiResult;
use crate::AppState;
use agro_core::model::crop_type::{CropType, CropTypeId, CropTypeInput};
use agro_core::repo::crop_type_repo::SqliteCropTypeRepository;
use agro_core::service::crop_type_service::CropTypeService;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use rusqlite::Connection;

fn service(conn: &Connection) -> ApiResult<CropTypeService<SqliteCropTypeRepository<'_>>> {
    Ok(CropTypeService::new(SqliteCropTypeRepository::try_new(conn)?))
}

pub(crate) async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<CropType>>> {
    let crop_types = state
        .with_conn(|conn| Ok(service(conn)?.list_crop_types()?))
        .await?;
    Ok(Json(crop_types))
}

pub(crate) async fn create(
    State(state): State<AppState>,
    body: Result<Json<CropTypeInput>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<CropType>)> {
    let input = json_body(body)?;
    let crop_type = state
        .with_conn(|conn| Ok(service(conn)?.create_crop_type(&input)?))
        .await?;
    Ok((StatusCode::CREATED, Json(crop_type)))
}

pub(crate) async fn retrieve(
    State(state): State<AppState>,
    path: Result<Path<CropTypeId>, PathRejection>,
) -> ApiResult<Json<CropType>> {
    let id = path_id(path)?;
    let crop_type = state
        .with_conn(|conn| Ok(service(conn)?.get_crop_type(id)?))
        .await?;
    Ok(Json(crop_type))
}

pub(crate) async fn update(
    State(state): State<AppState>,
    path: Result<Path<CropTypeId>, PathRejection>,
    body: Result<Json<CropTypeInput>, JsonRejection>,
) -> ApiResult<Json<CropType>> {
    let id = path_id(path)?;
    let input = json_body(body)?;
    let crop_type = state
        .with_conn(|conn| Ok(service(conn)?.update_crop_type(id, &input)?))
        .await?;
    Ok(Json(crop_type))
}

pub(crate) async fn partial_update(
    State(state): State<AppState>,
    path: Result<Path<CropTypeId>, PathRejection>,
    body: Result<Json<CropTypeInput>, JsonRejection>,
) -> ApiResult<Json<CropType>> {
    let id = path_id(path)?;
    let input = json_body(body)?;
    let crop_type = state
        .with_conn(|conn| Ok(service(conn)?.patch_crop_type(id, input)?))
        .await?;
    Ok(Json(crop_type))
}

pub(crate) async fn destroy(
    State(state): State<AppState>,
    path: Result<Path<CropTypeId>, PathRejection>,
) -> ApiResult<StatusCode> {
    let id = path_id(path)?;
    state
        .with_conn(|conn| Ok(service(conn)?.delete_crop_type(id)?))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
