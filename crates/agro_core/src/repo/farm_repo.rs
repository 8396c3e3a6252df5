//! Farm repository contract and SQLite implementation.
//!
//! # Invariants
//! - Every farm read embeds its owning farmer (single JOIN, no per-row query).
//! - Areas are stored as hundredths of a hectare.
//! - Deleting a farm cascades to its crops.

use super::farmer_repo::{raw_farmer, RawFarmer};
use super::{
    centi_to_hectares, ensure_connection_ready, hectares_to_centi, map_constraint_violation,
    parse_uuid, Page, PageRequest, RepoError, RepoResult,
};
use crate::model::farm::{Farm, FarmDraft, FarmId};
use crate::model::state::StateCode;
use rusqlite::{params, Connection, OptionalExtension, Row};
use uuid::Uuid;

const MISSING_FARMER_MESSAGE: &str = "The selected farmer does not exist.";

/// Repository interface for farm CRUD operations.
pub trait FarmRepository {
    fn create_farm(&self, draft: &FarmDraft) -> RepoResult<Farm>;
    fn update_farm(&self, id: FarmId, draft: &FarmDraft) -> RepoResult<Farm>;
    fn get_farm(&self, id: FarmId) -> RepoResult<Option<Farm>>;
    /// Lists farms, most recently updated first.
    fn list_farms(&self, page: &PageRequest) -> RepoResult<Page<Farm>>;
    fn delete_farm(&self, id: FarmId) -> RepoResult<()>;
}

/// SQLite-backed farm repository.
pub struct SqliteFarmRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteFarmRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, &["farmers", "farms"])?;
        Ok(Self { conn })
    }
}

impl FarmRepository for SqliteFarmRepository<'_> {
    fn create_farm(&self, draft: &FarmDraft) -> RepoResult<Farm> {
        let id = Uuid::new_v4();
        self.conn.execute(
            "INSERT INTO farms (
                id,
                farmer_id,
                name,
                city,
                state,
                total_area_centi,
                arable_area_centi,
                vegetation_area_centi
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8);",
            params![
                id.to_string(),
                draft.farmer_id.to_string(),
                draft.name,
                draft.city,
                draft.state.code(),
                hectares_to_centi(draft.total_area_hectares),
                hectares_to_centi(draft.arable_area_hectares),
                hectares_to_centi(draft.vegetation_area_hectares),
            ],
        )
        .map_err(|err| {
            map_constraint_violation(err, "farm already exists", MISSING_FARMER_MESSAGE)
        })?;

        self.get_farm(id)?
            .ok_or_else(|| RepoError::not_found("farm", id))
    }

    fn update_farm(&self, id: FarmId, draft: &FarmDraft) -> RepoResult<Farm> {
        let changed = self.conn.execute(
            "UPDATE farms
             SET
                farmer_id = ?1,
                name = ?2,
                city = ?3,
                state = ?4,
                total_area_centi = ?5,
                arable_area_centi = ?6,
                vegetation_area_centi = ?7,
                updated_at = (CAST((julianday('now') - 2440587.5) * 86400000 AS INTEGER))
             WHERE id = ?8;",
            params![
                draft.farmer_id.to_string(),
                draft.name,
                draft.city,
                draft.state.code(),
                hectares_to_centi(draft.total_area_hectares),
                hectares_to_centi(draft.arable_area_hectares),
                hectares_to_centi(draft.vegetation_area_hectares),
                id.to_string(),
            ],
        )
        .map_err(|err| {
            map_constraint_violation(err, "farm already exists", MISSING_FARMER_MESSAGE)
        })?;

        if changed == 0 {
            return Err(RepoError::not_found("farm", id));
        }

        self.get_farm(id)?
            .ok_or_else(|| RepoError::not_found("farm", id))
    }

    fn get_farm(&self, id: FarmId) -> RepoResult<Option<Farm>> {
        let row = self
            .conn
            .query_row(
                &format!("{} WHERE f.id = ?1;", farm_select_sql()),
                [id.to_string()],
                |row| raw_farm(row, ""),
            )
            .optional()?;
        row.map(RawFarm::into_farm).transpose()
    }

    fn list_farms(&self, page: &PageRequest) -> RepoResult<Page<Farm>> {
        let total: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM farms;", [], |row| row.get(0))?;

        let mut stmt = self.conn.prepare(&format!(
            "{}
             ORDER BY f.updated_at DESC, f.id ASC
             LIMIT ?1 OFFSET ?2;",
            farm_select_sql()
        ))?;
        let mut rows = stmt.query(params![page.limit(), page.offset()])?;
        let mut farms = Vec::new();
        while let Some(row) = rows.next()? {
            farms.push(raw_farm(row, "")?.into_farm()?);
        }

        Ok(Page {
            items: farms,
            total: u64::try_from(total).unwrap_or_default(),
            request: *page,
        })
    }

    fn delete_farm(&self, id: FarmId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM farms WHERE id = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::not_found("farm", id));
        }
        Ok(())
    }
}

fn farm_select_sql() -> String {
    format!(
        "SELECT {}
         FROM farms f
         JOIN farmers fr ON fr.id = f.farmer_id",
        farm_columns("f", "fr", "")
    )
}

/// Column list for a farm joined with its farmer, aliased with `prefix`.
pub(crate) fn farm_columns(farm_alias: &str, farmer_alias: &str, prefix: &str) -> String {
    format!(
        "{farm_alias}.id AS {prefix}id,
         {farm_alias}.name AS {prefix}name,
         {farm_alias}.city AS {prefix}city,
         {farm_alias}.state AS {prefix}state,
         {farm_alias}.total_area_centi AS {prefix}total_area_centi,
         {farm_alias}.arable_area_centi AS {prefix}arable_area_centi,
         {farm_alias}.vegetation_area_centi AS {prefix}vegetation_area_centi,
         {farm_alias}.created_at AS {prefix}created_at,
         {farm_alias}.updated_at AS {prefix}updated_at,
         {farmer_alias}.id AS {prefix}farmer_id,
         {farmer_alias}.document AS {prefix}farmer_document,
         {farmer_alias}.name AS {prefix}farmer_name,
         {farmer_alias}.created_at AS {prefix}farmer_created_at,
         {farmer_alias}.updated_at AS {prefix}farmer_updated_at"
    )
}

pub(crate) struct RawFarm {
    id: String,
    farmer: RawFarmer,
    name: String,
    city: String,
    state: String,
    total_area_centi: i64,
    arable_area_centi: i64,
    vegetation_area_centi: i64,
    created_at: i64,
    updated_at: i64,
}

impl RawFarm {
    pub(crate) fn into_farm(self) -> RepoResult<Farm> {
        let state = StateCode::parse(&self.state).ok_or_else(|| {
            RepoError::InvalidData(format!("invalid state `{}` in farms.state", self.state))
        })?;
        Ok(Farm {
            id: parse_uuid(&self.id, "farms.id")?,
            farmer: self.farmer.into_farmer()?,
            name: self.name,
            city: self.city,
            state,
            total_area_hectares: centi_to_hectares(self.total_area_centi),
            arable_area_hectares: centi_to_hectares(self.arable_area_centi),
            vegetation_area_hectares: centi_to_hectares(self.vegetation_area_centi),
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Reads columns produced by [`farm_columns`] with the same `prefix`.
pub(crate) fn raw_farm(row: &Row<'_>, prefix: &str) -> rusqlite::Result<RawFarm> {
    let column = |name: &str| format!("{prefix}{name}");
    Ok(RawFarm {
        id: row.get(column("id").as_str())?,
        farmer: raw_farmer(row, &column("farmer_"))?,
        name: row.get(column("name").as_str())?,
        city: row.get(column("city").as_str())?,
        state: row.get(column("state").as_str())?,
        total_area_centi: row.get(column("total_area_centi").as_str())?,
        arable_area_centi: row.get(column("arable_area_centi").as_str())?,
        vegetation_area_centi: row.get(column("vegetation_area_centi").as_str())?,
        created_at: row.get(column("created_at").as_str())?,
        updated_at: row.get(column("updated_at").as_str())?,
    })
}
