//! Read-only aggregate queries backing the dashboard.
//!
//! # Invariants
//! - Every method runs a single aggregate statement; result size is bounded
//!   by the number of groups, never by the number of rows.
//! - Empty tables yield zero sums and empty group lists.

use super::{centi_to_hectares, ensure_connection_ready, RepoError, RepoResult};
use crate::model::state::StateCode;
use rust_decimal::Decimal;
use rusqlite::Connection;

/// Farm count and area sums over all farms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FarmTotals {
    pub farm_count: u64,
    pub total_area_hectares: Decimal,
    pub arable_area_hectares: Decimal,
    pub vegetation_area_hectares: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateCount {
    pub state: StateCode,
    pub total: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CropTypeFarmCount {
    pub crop_type_name: String,
    /// Number of distinct farms growing this crop type.
    pub total: u64,
}

/// The three dashboard aggregates, read consistently.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReportAggregates {
    pub totals: FarmTotals,
    pub by_state: Vec<StateCount>,
    pub by_crop_type: Vec<CropTypeFarmCount>,
}

pub trait ReportRepository {
    /// Reads every dashboard aggregate from a single snapshot of the store.
    fn aggregates(&self) -> RepoResult<ReportAggregates>;
}

/// SQLite-backed report repository.
pub struct SqliteReportRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteReportRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, &["farms", "crop_types", "crops"])?;
        Ok(Self { conn })
    }
}

impl ReportRepository for SqliteReportRepository<'_> {
    fn aggregates(&self) -> RepoResult<ReportAggregates> {
        // Deferred read transaction: the three statements see the same data.
        let tx = self.conn.unchecked_transaction()?;
        let totals = farm_totals(&tx)?;
        let by_state = count_by_state(&tx)?;
        let by_crop_type = farm_count_by_crop_type(&tx)?;
        tx.commit()?;

        Ok(ReportAggregates {
            totals,
            by_state,
            by_crop_type,
        })
    }
}

fn farm_totals(conn: &Connection) -> RepoResult<FarmTotals> {
    let (count, total, arable, vegetation): (i64, i64, i64, i64) = conn.query_row(
        "SELECT
            COUNT(*),
            COALESCE(SUM(total_area_centi), 0),
            COALESCE(SUM(arable_area_centi), 0),
            COALESCE(SUM(vegetation_area_centi), 0)
         FROM farms;",
        [],
        |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
    )?;

    Ok(FarmTotals {
        farm_count: to_count(count)?,
        total_area_hectares: centi_to_hectares(total),
        arable_area_hectares: centi_to_hectares(arable),
        vegetation_area_hectares: centi_to_hectares(vegetation),
    })
}

fn count_by_state(conn: &Connection) -> RepoResult<Vec<StateCount>> {
    let mut stmt = conn.prepare(
        "SELECT state, COUNT(*) AS total
         FROM farms
         GROUP BY state
         ORDER BY state ASC;",
    )?;
    let mut rows = stmt.query([])?;
    let mut counts = Vec::new();
    while let Some(row) = rows.next()? {
        let code: String = row.get("state")?;
        let state = StateCode::parse(&code).ok_or_else(|| {
            RepoError::InvalidData(format!("invalid state `{code}` in farms.state"))
        })?;
        counts.push(StateCount {
            state,
            total: to_count(row.get("total")?)?,
        });
    }
    Ok(counts)
}

fn farm_count_by_crop_type(conn: &Connection) -> RepoResult<Vec<CropTypeFarmCount>> {
    let mut stmt = conn.prepare(
        "SELECT ct.name AS crop_type_name, COUNT(DISTINCT c.farm_id) AS total
         FROM crops c
         JOIN crop_types ct ON ct.id = c.crop_type_id
         GROUP BY ct.id, ct.name
         ORDER BY ct.name ASC;",
    )?;
    let mut rows = stmt.query([])?;
    let mut counts = Vec::new();
    while let Some(row) = rows.next()? {
        counts.push(CropTypeFarmCount {
            crop_type_name: row.get("crop_type_name")?,
            total: to_count(row.get("total")?)?,
        });
    }
    Ok(counts)
}

fn to_count(value: i64) -> RepoResult<u64> {
    u64::try_from(value)
        .map_err(|_| RepoError::InvalidData(format!("negative aggregate count `{value}`")))
}
