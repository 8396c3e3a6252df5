//! `/agro/farmers/` handlers.

use super::{json_body, page_params, path_id};
use crate::error::ApiResult;
use crate::pagination::{PageParams, Paginated};
use crate::AppState;
use agro_core::model::farmer::{Farmer, FarmerId, FarmerInput};
use agro_core::repo::farmer_repo::SqliteFarmerRepository;
use agro_core::service::farmer_service::FarmerService;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use rusqlite::Connection;

fn service<'c>(
    conn: &'c Connection,
    state: &AppState,
) -> ApiResult<FarmerService<SqliteFarmerRepository<'c>>> {
    Ok(FarmerService::with_policy(
        SqliteFarmerRepository::try_new(conn)?,
        state.documents(),
    ))
}

pub(crate) async fn list(
    State(state): State<AppState>,
    query: Result<Query<PageParams>, QueryRejection>,
) -> ApiResult<Json<Paginated<Farmer>>> {
    let request = page_params(query).resolve(state.pagination())?;
    let page = state
        .with_conn(|conn| Ok(service(conn, &state)?.list_farmers(&request)?))
        .await?;
    Ok(Json(Paginated::from_page(page)?))
}

pub(crate) async fn create(
    State(state): State<AppState>,
    body: Result<Json<FarmerInput>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Farmer>)> {
    let input = json_body(body)?;
    let farmer = state
        .with_conn(|conn| Ok(service(conn, &state)?.create_farmer(&input)?))
        .await?;
    Ok((StatusCode::CREATED, Json(farmer)))
}

pub(crate) async fn retrieve(
    State(state): State<AppState>,
    path: Result<Path<FarmerId>, PathRejection>,
) -> ApiResult<Json<Farmer>> {
    let id = path_id(path)?;
    let farmer = state
        .with_conn(|conn| Ok(service(conn, &state)?.get_farmer(id)?))
        .await?;
    Ok(Json(farmer))
}

pub(crate) async fn update(
    State(state): State<AppState>,
    path: Result<Path<FarmerId>, PathRejection>,
    body: Result<Json<FarmerInput>, JsonRejection>,
) -> ApiResult<Json<Farmer>> {
    let id = path_id(path)?;
    let input = json_body(body)?;
    let farmer = state
        .with_conn(|conn| Ok(service(conn, &state)?.update_farmer(id, &input)?))
        .await?;
    Ok(Json(farmer))
}

pub(crate) async fn partial_update(
    State(state): State<AppState>,
    path: Result<Path<FarmerId>, PathRejection>,
    body: Result<Json<FarmerInput>, JsonRejection>,
) -> ApiResult<Json<Farmer>> {
    let id = path_id(path)?;
    let input = json_body(body)?;
    let farmer = state
        .with_conn(|conn| Ok(service(conn, &state)?.patch_farmer(id, input)?))
        .await?;
    Ok(Json(farmer))
}

pub(crate) async fn destroy(
    State(state): State<AppState>,
    path: Result<Path<FarmerId>, PathRejection>,
) -> ApiResult<StatusCode> {
    let id = path_id(path)?;
    state
        .with_conn(|conn| Ok(service(conn, &state)?.delete_farmer(id)?))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
