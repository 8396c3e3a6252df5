//! Farmer repository contract and SQLite implementation.
//!
//! # Invariants
//! - `document` uniqueness is enforced by the `farmers.document` constraint.
//! - Deleting a farmer cascades to its farms and their crops.

use super::{
    ensure_connection_ready, map_unique_violation, parse_uuid, Page, PageRequest, RepoError,
    RepoResult,
};
use crate::model::farmer::{Farmer, FarmerDraft, FarmerId};
use rusqlite::{params, Connection, OptionalExtension, Row};
use uuid::Uuid;

pub const DUPLICATE_DOCUMENT_MESSAGE: &str = "A farmer with this document already exists.";

const FARMER_SELECT_SQL: &str = "SELECT
    id,
    document,
    name,
    created_at,
    updated_at
FROM farmers";

/// Repository interface for farmer CRUD operations.
pub trait FarmerRepository {
    fn create_farmer(&self, draft: &FarmerDraft) -> RepoResult<Farmer>;
    fn update_farmer(&self, id: FarmerId, draft: &FarmerDraft) -> RepoResult<Farmer>;
    fn get_farmer(&self, id: FarmerId) -> RepoResult<Option<Farmer>>;
    fn find_by_document(&self, document: &str) -> RepoResult<Option<Farmer>>;
    /// Lists farmers, most recently updated first.
    fn list_farmers(&self, page: &PageRequest) -> RepoResult<Page<Farmer>>;
    fn delete_farmer(&self, id: FarmerId) -> RepoResult<()>;
}

/// SQLite-backed farmer repository.
pub struct SqliteFarmerRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteFarmerRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, &["farmers"])?;
        Ok(Self { conn })
    }
}

impl FarmerRepository for SqliteFarmerRepository<'_> {
    fn create_farmer(&self, draft: &FarmerDraft) -> RepoResult<Farmer> {
        let id = Uuid::new_v4();
        self.conn
            .execute(
                "INSERT INTO farmers (id, document, name) VALUES (?1, ?2, ?3);",
                params![id.to_string(), draft.document, draft.name],
            )
            .map_err(|err| map_unique_violation(err, DUPLICATE_DOCUMENT_MESSAGE))?;

        self.get_farmer(id)?
            .ok_or_else(|| RepoError::not_found("farmer", id))
    }

    fn update_farmer(&self, id: FarmerId, draft: &FarmerDraft) -> RepoResult<Farmer> {
        let changed = self
            .conn
            .execute(
                "UPDATE farmers
                 SET
                    document = ?1,
                    name = ?2,
                    updated_at = (CAST((julianday('now') - 2440587.5) * 86400000 AS INTEGER))
                 WHERE id = ?3;",
                params![draft.document, draft.name, id.to_string()],
            )
            .map_err(|err| map_unique_violation(err, DUPLICATE_DOCUMENT_MESSAGE))?;

        if changed == 0 {
            return Err(RepoError::not_found("farmer", id));
        }

        self.get_farmer(id)?
            .ok_or_else(|| RepoError::not_found("farmer", id))
    }

    fn get_farmer(&self, id: FarmerId) -> RepoResult<Option<Farmer>> {
        let row = self
            .conn
            .query_row(
                &format!("{FARMER_SELECT_SQL} WHERE id = ?1;"),
                [id.to_string()],
                |row| raw_farmer(row, ""),
            )
            .optional()?;
        row.map(RawFarmer::into_farmer).transpose()
    }

    fn find_by_document(&self, document: &str) -> RepoResult<Option<Farmer>> {
        let row = self
            .conn
            .query_row(
                &format!("{FARMER_SELECT_SQL} WHERE document = ?1;"),
                [document],
                |row| raw_farmer(row, ""),
            )
            .optional()?;
        row.map(RawFarmer::into_farmer).transpose()
    }

    fn list_farmers(&self, page: &PageRequest) -> RepoResult<Page<Farmer>> {
        let total: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM farmers;", [], |row| row.get(0))?;

        let mut stmt = self.conn.prepare(&format!(
            "{FARMER_SELECT_SQL}
             ORDER BY updated_at DESC, id ASC
             LIMIT ?1 OFFSET ?2;"
        ))?;
        let mut rows = stmt.query(params![page.limit(), page.offset()])?;
        let mut farmers = Vec::new();
        while let Some(row) = rows.next()? {
            farmers.push(raw_farmer(row, "")?.into_farmer()?);
        }

        Ok(Page {
            items: farmers,
            total: u64::try_from(total).unwrap_or_default(),
            request: *page,
        })
    }

    fn delete_farmer(&self, id: FarmerId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM farmers WHERE id = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::not_found("farmer", id));
        }
        Ok(())
    }
}

/// Farmer columns read from a row before uuid parsing.
pub(crate) struct RawFarmer {
    id: String,
    document: String,
    name: String,
    created_at: i64,
    updated_at: i64,
}

impl RawFarmer {
    pub(crate) fn into_farmer(self) -> RepoResult<Farmer> {
        Ok(Farmer {
            id: parse_uuid(&self.id, "farmers.id")?,
            document: self.document,
            name: self.name,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Reads farmer columns, optionally prefixed (e.g. `farmer_`) when joined.
pub(crate) fn raw_farmer(row: &Row<'_>, prefix: &str) -> rusqlite::Result<RawFarmer> {
    Ok(RawFarmer {
        id: row.get(format!("{prefix}id").as_str())?,
        document: row.get(format!("{prefix}document").as_str())?,
        name: row.get(format!("{prefix}name").as_str())?,
        created_at: row.get(format!("{prefix}created_at").as_str())?,
        updated_at: row.get(format!("{prefix}updated_at").as_str())?,
    })
}
