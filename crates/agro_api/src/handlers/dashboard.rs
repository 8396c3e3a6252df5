use crate::error::{ApiError, ApiResult};
use crate::AppState;
use agro_core::repo::report_repo::SqliteReportRepository;
use agro_core::{DashboardService, DashboardSnapshot};
use axum::extract::State;
use axum::Json;

/// GET /agro/dashboard/
///
/// Any storage failure is a 500; the cause is logged by the service and the
/// error mapping.
pub(crate) async fn snapshot(State(state): State<AppState>) -> ApiResult<Json<DashboardSnapshot>> {
    let snapshot = state
        .with_conn(|conn| {
            let repo = SqliteReportRepository::try_new(conn)
                .map_err(|err| ApiError::Internal(err.to_string()))?;
            DashboardService::new(repo)
                .snapshot()
                .map_err(|err| ApiError::Internal(err.to_string()))
        })
        .await?;
    Ok(Json(snapshot))
}
