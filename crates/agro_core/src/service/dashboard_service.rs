//! Dashboard aggregation.
//!
//! # Responsibility
//! - Shape repository aggregates into the dashboard snapshot.
//!
//! # Invariants
//! - Read-only; a fixed number of aggregate queries per snapshot.
//! - `count_by_state` is ordered by state code, `farm_count_by_crop` by
//!   crop type name.

use crate::model::state::StateCode;
use crate::repo::report_repo::{ReportAggregates, ReportRepository};
use crate::repo::RepoResult;
use log::{error, info};
use rust_decimal::Decimal;
use serde::Serialize;
use std::time::Instant;

/// Point-in-time summary over every farm and crop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardSnapshot {
    pub farm_count: u64,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_area_hectares: Decimal,
    pub soil_usage: SoilUsage,
    pub farm_count_by_crop: Vec<CropFarmCount>,
    pub count_by_state: Vec<StateFarmCount>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SoilUsage {
    #[serde(with = "rust_decimal::serde::float")]
    pub total_arable_area_hectares: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_vegetation_area_hectares: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CropFarmCount {
    pub crop_type_name: String,
    pub total: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StateFarmCount {
    pub state: StateCode,
    pub total: u64,
}

impl From<ReportAggregates> for DashboardSnapshot {
    fn from(value: ReportAggregates) -> Self {
        Self {
            farm_count: value.totals.farm_count,
            total_area_hectares: value.totals.total_area_hectares,
            soil_usage: SoilUsage {
                total_arable_area_hectares: value.totals.arable_area_hectares,
                total_vegetation_area_hectares: value.totals.vegetation_area_hectares,
            },
            farm_count_by_crop: value
                .by_crop_type
                .into_iter()
                .map(|item| CropFarmCount {
                    crop_type_name: item.crop_type_name,
                    total: item.total,
                })
                .collect(),
            count_by_state: value
                .by_state
                .into_iter()
                .map(|item| StateFarmCount {
                    state: item.state,
                    total: item.total,
                })
                .collect(),
        }
    }
}

pub struct DashboardService<R: ReportRepository> {
    repo: R,
}

impl<R: ReportRepository> DashboardService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Computes the snapshot. Storage failures are logged and returned.
    pub fn snapshot(&self) -> RepoResult<DashboardSnapshot> {
        let started_at = Instant::now();
        match self.repo.aggregates() {
            Ok(aggregates) => {
                let snapshot = DashboardSnapshot::from(aggregates);
                info!(
                    "event=dashboard_snapshot module=service status=ok duration_ms={} farm_count={}",
                    started_at.elapsed().as_millis(),
                    snapshot.farm_count
                );
                Ok(snapshot)
            }
            Err(err) => {
                error!(
                    "event=dashboard_snapshot module=service status=error duration_ms={} error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err)
            }
        }
    }
}
