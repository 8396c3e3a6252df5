//! `/agro/farms/` handlers.

use super::{json_body, page_params, path_id};
use crate::error::ApiResult;
use crate::pagination::{PageParams, Paginated};
use crate::AppState;
use agro_core::model::farm::{Farm, FarmId, FarmInput};
use agro_core::repo::farm_repo::SqliteFarmRepository;
use agro_core::repo::farmer_repo::SqliteFarmerRepository;
use agro_core::service::farm_service::FarmService;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use rusqlite::Connection;

type Service<'c> = FarmService<SqliteFarmRepository<'c>, SqliteFarmerRepository<'c>>;

fn service(conn: &Connection) -> ApiResult<Service<'_>> {
    Ok(FarmService::new(
        SqliteFarmRepository::try_new(conn)?,
        SqliteFarmerRepository::try_new(conn)?,
    ))
}

pub(crate) async fn list(
    State(state): State<AppState>,
    query: Result<Query<PageParams>, QueryRejection>,
) -> ApiResult<Json<Paginated<Farm>>> {
    let request = page_params(query).resolve(state.pagination())?;
    let page = state
        .with_conn(|conn| Ok(service(conn)?.list_farms(&request)?))
        .await?;
    Ok(Json(Paginated::from_page(page)?))
}

pub(crate) async fn create(
    State(state): State<AppState>,
    body: Result<Json<FarmInput>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Farm>)> {
    let input = json_body(body)?;
    let farm = state
        .with_conn(|conn| Ok(service(conn)?.create_farm(&input)?))
        .await?;
    Ok((StatusCode::CREATED, Json(farm)))
}

pub(crate) async fn retrieve(
    State(state): State<AppState>,
    path: Result<Path<FarmId>, PathRejection>,
) -> ApiResult<Json<Farm>> {
    let id = path_id(path)?;
    let farm = state
        .with_conn(|conn| Ok(service(conn)?.get_farm(id)?))
        .await?;
    Ok(Json(farm))
}

pub(crate) async fn update(
    State(state): State<AppState>,
    path: Result<Path<FarmId>, PathRejection>,
    body: Result<Json<FarmInput>, JsonRejection>,
) -> ApiResult<Json<Farm>> {
    let id = path_id(path)?;
    let input = json_body(body)?;
    let farm = state
        .with_conn(|conn| Ok(service(conn)?.update_farm(id, &input)?))
        .await?;
    Ok(Json(farm))
}

pub(crate) async fn partial_update(
    State(state): State<AppState>,
    path: Result<Path<FarmId>, PathRejection>,
    body: Result<Json<FarmInput>, JsonRejection>,
) -> ApiResult<Json<Farm>> {
    let id = path_id(path)?;
    let input = json_body(body)?;
    let farm = state
        .with_conn(|conn| Ok(service(conn)?.patch_farm(id, input)?))
        .await?;
    Ok(Json(farm))
}

pub(crate) async fn destroy(
    State(state): State<AppState>,
    path: Result<Path<FarmId>, PathRejection>,
) -> ApiResult<StatusCode> {
    let id = path_id(path)?;
    state
        .with_conn(|conn| Ok(service(conn)?.delete_farm(id)?))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
