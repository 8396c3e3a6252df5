//! Crop type repository contract and SQLite implementation.
//!
//! # Invariants
//! - `name` uniqueness is enforced by the `crop_types.name` constraint.
//! - Deleting a crop type cascades to the crops that reference it.

use super::{ensure_connection_ready, map_unique_violation, RepoError, RepoResult};
use crate::model::crop_type::{CropType, CropTypeDraft, CropTypeId};
use rusqlite::{params, Connection, OptionalExtension, Row};

pub const DUPLICATE_CROP_TYPE_MESSAGE: &str = "A crop type with this name already exists.";

const CROP_TYPE_SELECT_SQL: &str = "SELECT
    id,
    name,
    created_at,
    updated_at
FROM crop_types";

pub trait CropTypeRepository {
    fn create_crop_type(&self, draft: &CropTypeDraft) -> RepoResult<CropType>;
    fn update_crop_type(&self, id: CropTypeId, draft: &CropTypeDraft) -> RepoResult<CropType>;
    fn get_crop_type(&self, id: CropTypeId) -> RepoResult<Option<CropType>>;
    fn find_by_name(&self, name: &str) -> RepoResult<Option<CropType>>;
    /// Lists every crop type ordered by name.
    fn list_crop_types(&self) -> RepoResult<Vec<CropType>>;
    fn delete_crop_type(&self, id: CropTypeId) -> RepoResult<()>;
}

/// SQLite-backed crop type repository.
pub struct SqliteCropTypeRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCropTypeRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, &["crop_types"])?;
        Ok(Self { conn })
    }
}

impl CropTypeRepository for SqliteCropTypeRepository<'_> {
    fn create_crop_type(&self, draft: &CropTypeDraft) -> RepoResult<CropType> {
        self.conn
            .execute(
                "INSERT INTO crop_types (name) VALUES (?1);",
                [draft.name.as_str()],
            )
            .map_err(|err| map_unique_violation(err, DUPLICATE_CROP_TYPE_MESSAGE))?;

        let id = self.conn.last_insert_rowid();
        self.get_crop_type(id)?
            .ok_or_else(|| RepoError::not_found("crop type", id))
    }

    fn update_crop_type(&self, id: CropTypeId, draft: &CropTypeDraft) -> RepoResult<CropType> {
        let changed = self
            .conn
            .execute(
                "UPDATE crop_types
                 SET
                    name = ?1,
                    updated_at = (CAST((julianday('now') - 2440587.5) * 86400000 AS INTEGER))
                 WHERE id = ?2;",
                params![draft.name, id],
            )
            .map_err(|err| map_unique_violation(err, DUPLICATE_CROP_TYPE_MESSAGE))?;

        if changed == 0 {
            return Err(RepoError::not_found("crop type", id));
        }

        self.get_crop_type(id)?
            .ok_or_else(|| RepoError::not_found("crop type", id))
    }

    fn get_crop_type(&self, id: CropTypeId) -> RepoResult<Option<CropType>> {
        let crop_type = self
            .conn
            .query_row(
                &format!("{CROP_TYPE_SELECT_SQL} WHERE id = ?1;"),
                [id],
                |row| parse_crop_type_row(row, ""),
            )
            .optional()?;
        Ok(crop_type)
    }

    fn find_by_name(&self, name: &str) -> RepoResult<Option<CropType>> {
        let crop_type = self
            .conn
            .query_row(
                &format!("{CROP_TYPE_SELECT_SQL} WHERE name = ?1;"),
                [name],
                |row| parse_crop_type_row(row, ""),
            )
            .optional()?;
        Ok(crop_type)
    }

    fn list_crop_types(&self) -> RepoResult<Vec<CropType>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{CROP_TYPE_SELECT_SQL} ORDER BY name ASC, id ASC;"))?;
        let crop_types = stmt
            .query_map([], |row| parse_crop_type_row(row, ""))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(crop_types)
    }

    fn delete_crop_type(&self, id: CropTypeId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM crop_types WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::not_found("crop type", id));
        }
        Ok(())
    }
}

pub(crate) fn parse_crop_type_row(row: &Row<'_>, prefix: &str) -> rusqlite::Result<CropType> {
    let column = |name: &str| format!("{prefix}{name}");
    Ok(CropType {
        id: row.get(column("id").as_str())?,
        name: row.get(column("name").as_str())?,
        created_at: row.get(column("created_at").as_str())?,
        updated_at: row.get(column("updated_at").as_str())?,
    })
}
