//! `/agro/crops/` handlers. The listing groups crop types by farm.

use super::{json_body, path_id};
use crate::error::ApiResult;
use crate::AppState;
use agro_core::model::crop::{Crop, CropId, CropInput, FarmCrops};
use agro_core::repo::crop_repo::SqliteCropRepository;
use agro_core::repo::crop_type_repo::SqliteCropTypeRepository;
use agro_core::repo::farm_repo::SqliteFarmRepository;
use agro_core::service::crop_service::CropService;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use rusqlite::Connection;

type Service<'c> = CropService<
    SqliteCropRepository<'c>,
    SqliteFarmRepository<'c>,
    SqliteCropTypeRepository<'c>,
>;

fn service(conn: &Connection) -> ApiResult<Service<'_>> {
    Ok(CropService::new(
        SqliteCropRepository::try_new(conn)?,
        SqliteFarmRepository::try_new(conn)?,
        SqliteCropTypeRepository::try_new(conn)?,
    ))
}

pub(crate) async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<FarmCrops>>> {
    let groups = state
        .with_conn(|conn| Ok(service(conn)?.list_crops_by_farm()?))
        .await?;
    Ok(Json(groups))
}

pub(crate) async fn create(
    State(state): State<AppState>,
    body: Result<Json<CropInput>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Crop>)> {
    let input = json_body(body)?;
    let crop = state
        .with_conn(|conn| Ok(service(conn)?.create_crop(&input)?))
        .await?;
    Ok((StatusCode::CREATED, Json(crop)))
}

pub(crate) async fn retrieve(
    State(state): State<AppState>,
    path: Result<Path<CropId>, PathRejection>,
) -> ApiResult<Json<Crop>> {
    let id = path_id(path)?;
    let crop = state
        .with_conn(|conn| Ok(service(conn)?.get_crop(id)?))
        .await?;
    Ok(Json(crop))
}

pub(crate) async fn update(
    State(state): State<AppState>,
    path: Result<Path<CropId>, PathRejection>,
    body: Result<Json<CropInput>, JsonRejection>,
) -> ApiResult<Json<Crop>> {
    let id = path_id(path)?;
    let input = json_body(body)?;
    let crop = state
        .with_conn(|conn| Ok(service(conn)?.update_crop(id, &input)?))
        .await?;
    Ok(Json(crop))
}

pub(crate) async fn partial_update(
    State(state): State<AppState>,
    path: Result<Path<CropId>, PathRejection>,
    body: Result<Json<CropInput>, JsonRejection>,
) -> ApiResult<Json<Crop>> {
    let id = path_id(path)?;
    let input = json_body(body)?;
    let crop = state
        .with_conn(|conn| Ok(service(conn)?.patch_crop(id, input)?))
        .await?;
    Ok(Json(crop))
}

pub(crate) async fn destroy(
    State(state): State<AppState>,
    path: Result<Path<CropId>, PathRejection>,
) -> ApiResult<StatusCode> {
    let id = path_id(path)?;
    state
        .with_conn(|conn| Ok(service(conn)?.delete_crop(id)?))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
