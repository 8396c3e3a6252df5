//! Crop repository contract and SQLite implementation.
//!
//! # Invariants
//! - (farm, crop type) is unique; a duplicate write yields `RepoError::Conflict`.
//! - Reads embed farm, farmer and crop type through one JOIN.

use super::crop_type_repo::parse_crop_type_row;
use super::farm_repo::{farm_columns, raw_farm};
use super::{ensure_connection_ready, map_constraint_violation, parse_uuid, RepoError, RepoResult};
use crate::model::crop::{Crop, CropDraft, CropId, FarmCrops, DUPLICATE_CROP_MESSAGE};
use crate::model::crop_type::CropTypeId;
use crate::model::farm::FarmId;
use rusqlite::{params, Connection, OptionalExtension, Row};
use uuid::Uuid;

const MISSING_REFERENCE_MESSAGE: &str = "The selected farm or crop type does not exist.";

pub trait CropRepository {
    fn create_crop(&self, draft: &CropDraft) -> RepoResult<Crop>;
    fn update_crop(&self, id: CropId, draft: &CropDraft) -> RepoResult<Crop>;
    fn get_crop(&self, id: CropId) -> RepoResult<Option<Crop>>;
    /// Finds the crop registered for `farm_id` and `crop_type_id`, if any.
    fn find_by_pair(
        &self,
        farm_id: FarmId,
        crop_type_id: CropTypeId,
    ) -> RepoResult<Option<Crop>>;
    /// Lists crops grouped by farm, farms and crop types in insertion order.
    fn list_crops_by_farm(&self) -> RepoResult<Vec<FarmCrops>>;
    fn delete_crop(&self, id: CropId) -> RepoResult<()>;
}

/// SQLite-backed crop repository.
pub struct SqliteCropRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCropRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, &["farmers", "farms", "crop_types", "crops"])?;
        Ok(Self { conn })
    }

    fn query_one(&self, filter: &str, params: impl rusqlite::Params) -> RepoResult<Option<Crop>> {
        let row = self
            .conn
            .query_row(&format!("{} {filter};", crop_select_sql()), params, |row| {
                Ok(parse_crop_row(row))
            })
            .optional()?;
        row.transpose()
    }
}

impl CropRepository for SqliteCropRepository<'_> {
    fn create_crop(&self, draft: &CropDraft) -> RepoResult<Crop> {
        let id = Uuid::new_v4();
        self.conn
            .execute(
                "INSERT INTO crops (id, farm_id, crop_type_id) VALUES (?1, ?2, ?3);",
                params![id.to_string(), draft.farm_id.to_string(), draft.crop_type_id],
            )
            .map_err(|err| {
                map_constraint_violation(err, DUPLICATE_CROP_MESSAGE, MISSING_REFERENCE_MESSAGE)
            })?;

        self.get_crop(id)?
            .ok_or_else(|| RepoError::not_found("crop", id))
    }

    fn update_crop(&self, id: CropId, draft: &CropDraft) -> RepoResult<Crop> {
        let changed = self
            .conn
            .execute(
                "UPDATE crops
                 SET
                    farm_id = ?1,
                    crop_type_id = ?2,
                    updated_at = (CAST((julianday('now') - 2440587.5) * 86400000 AS INTEGER))
                 WHERE id = ?3;",
                params![draft.farm_id.to_string(), draft.crop_type_id, id.to_string()],
            )
            .map_err(|err| {
                map_constraint_violation(err, DUPLICATE_CROP_MESSAGE, MISSING_REFERENCE_MESSAGE)
            })?;

        if changed == 0 {
            return Err(RepoError::not_found("crop", id));
        }

        self.get_crop(id)?
            .ok_or_else(|| RepoError::not_found("crop", id))
    }

    fn get_crop(&self, id: CropId) -> RepoResult<Option<Crop>> {
        self.query_one("WHERE c.id = ?1", [id.to_string()])
    }

    fn find_by_pair(
        &self,
        farm_id: FarmId,
        crop_type_id: CropTypeId,
    ) -> RepoResult<Option<Crop>> {
        self.query_one(
            "WHERE c.farm_id = ?1 AND c.crop_type_id = ?2",
            params![farm_id.to_string(), crop_type_id],
        )
    }

    fn list_crops_by_farm(&self) -> RepoResult<Vec<FarmCrops>> {
        let mut stmt = self.conn.prepare(&format!(
            "{}
             ORDER BY f.created_at ASC, f.id ASC, c.created_at ASC, ct.name ASC;",
            crop_select_sql()
        ))?;
        let mut rows = stmt.query([])?;

        let mut groups: Vec<FarmCrops> = Vec::new();
        while let Some(row) = rows.next()? {
            let crop = parse_crop_row(row)?;
            match groups.last_mut() {
                Some(group) if group.farm.id == crop.farm.id => group.crops.push(crop.crop_type),
                _ => groups.push(FarmCrops {
                    farm: crop.farm,
                    crops: vec![crop.crop_type],
                }),
            }
        }

        Ok(groups)
    }

    fn delete_crop(&self, id: CropId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM crops WHERE id = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::not_found("crop", id));
        }
        Ok(())
    }
}

fn crop_select_sql() -> String {
    format!(
        "SELECT
            c.id AS id,
            c.created_at AS created_at,
            c.updated_at AS updated_at,
            ct.id AS crop_type_id,
            ct.name AS crop_type_name,
            ct.created_at AS crop_type_created_at,
            ct.updated_at AS crop_type_updated_at,
            {}
         FROM crops c
         JOIN crop_types ct ON ct.id = c.crop_type_id
         JOIN farms f ON f.id = c.farm_id
         JOIN farmers fr ON fr.id = f.farmer_id",
        farm_columns("f", "fr", "farm_")
    )
}

fn parse_crop_row(row: &Row<'_>) -> RepoResult<Crop> {
    let id_text: String = row.get("id")?;
    Ok(Crop {
        id: parse_uuid(&id_text, "crops.id")?,
        farm: raw_farm(row, "farm_")?.into_farm()?,
        crop_type: parse_crop_type_row(row, "crop_type_")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}
