//! Repository layer abstractions and SQLite implementations.
//!
//! # Responsibility
//! - Define per-entity data access contracts returning plain records.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Write paths only accept validated drafts.
//! - Unique-constraint violations surface as `RepoError::Conflict`, never as
//!   raw database errors.
//! - Repositories refuse connections whose schema is not fully migrated.

pub mod crop_repo;
pub mod crop_type_repo;
pub mod farm_repo;
pub mod farmer_repo;
pub mod report_repo;

use crate::db::migrations::{current_user_version, latest_version};
use crate::db::DbError;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rusqlite::{Connection, ErrorCode};
use thiserror::Error;
use uuid::Uuid;

pub type RepoResult<T> = Result<T, RepoError>;

/// Generic repository error for record persistence and query operations.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("{0}")]
    Db(#[from] DbError),
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },
    /// A unique constraint rejected the write.
    #[error("{0}")]
    Conflict(String),
    /// A foreign key rejected the write because the referenced row is gone.
    #[error("{0}")]
    MissingReference(String),
    #[error("invalid persisted data: {0}")]
    InvalidData(String),
    #[error(
        "connection schema version {actual_version} does not match expected {expected_version}"
    )]
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    #[error("required table `{0}` is missing")]
    MissingRequiredTable(&'static str),
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl RepoError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}

/// One page of a listing request. `page` is 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub page_size: u32,
}

impl PageRequest {
    pub fn new(page: u32, page_size: u32) -> Self {
        Self {
            page: page.max(1),
            page_size: page_size.max(1),
        }
    }

    pub fn offset(&self) -> i64 {
        i64::from(self.page - 1) * i64::from(self.page_size)
    }

    pub fn limit(&self) -> i64 {
        i64::from(self.page_size)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(1, 10)
    }
}

/// A slice of rows plus the total row count of the unpaged listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub request: PageRequest,
}

impl<T> Page<T> {
    /// Number of pages for `total`, at least 1 so an empty listing has page 1.
    pub fn page_count(&self) -> u32 {
        let size = u64::from(self.request.page_size);
        let pages = self.total.div_ceil(size).max(1);
        u32::try_from(pages).unwrap_or(u32::MAX)
    }

    pub fn has_next(&self) -> bool {
        self.request.page < self.page_count()
    }

    pub fn has_previous(&self) -> bool {
        self.request.page > 1
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            request: self.request,
        }
    }
}

/// Verifies that `conn` is migrated and carries every table in `tables`.
pub(crate) fn ensure_connection_ready(
    conn: &Connection,
    tables: &[&'static str],
) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version = current_user_version(conn)?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    for &table in tables {
        let exists: bool = conn.query_row(
            "SELECT EXISTS(
                SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1
            );",
            [table],
            |row| row.get(0),
        )?;
        if !exists {
            return Err(RepoError::MissingRequiredTable(table));
        }
    }

    Ok(())
}

/// Maps a unique-constraint failure to `Conflict(message)`.
pub(crate) fn map_unique_violation(err: rusqlite::Error, message: &str) -> RepoError {
    map_constraint_violation(err, message, "referenced record does not exist")
}

/// Maps unique and foreign-key failures to `Conflict` / `MissingReference`.
pub(crate) fn map_constraint_violation(
    err: rusqlite::Error,
    unique_message: &str,
    reference_message: &str,
) -> RepoError {
    let extended_code = match &err {
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.code == ErrorCode::ConstraintViolation =>
        {
            failure.extended_code
        }
        _ => return err.into(),
    };
    match extended_code {
        rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE | rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY => {
            RepoError::Conflict(unique_message.to_string())
        }
        rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY => {
            RepoError::MissingReference(reference_message.to_string())
        }
        _ => err.into(),
    }
}

pub(crate) fn parse_uuid(value: &str, column: &str) -> RepoResult<Uuid> {
    Uuid::parse_str(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid value `{value}` in {column}")))
}

/// Converts hectares to the stored hundredths-of-hectare integer.
pub(crate) fn hectares_to_centi(value: Decimal) -> i64 {
    (value * Decimal::ONE_HUNDRED)
        .trunc()
        .to_i64()
        .unwrap_or(i64::MAX)
}

/// Converts a stored hundredths-of-hectare integer back to hectares.
pub(crate) fn centi_to_hectares(value: i64) -> Decimal {
    Decimal::new(value, 2)
}

#[cfg(test)]
mod tests {
    use super::{centi_to_hectares, hectares_to_centi, Page, PageRequest};
    use rust_decimal::Decimal;

    #[test]
    fn hectare_conversion_is_exact_for_two_decimal_places() {
        let value = Decimal::new(12_345, 2);
        assert_eq!(hectares_to_centi(value), 12_345);
        assert_eq!(centi_to_hectares(12_345), value);
        assert_eq!(hectares_to_centi(Decimal::from(300)), 30_000);
    }

    #[test]
    fn page_request_clamps_to_first_page() {
        let request = PageRequest::new(0, 0);
        assert_eq!(request.page, 1);
        assert_eq!(request.page_size, 1);
        assert_eq!(request.offset(), 0);
    }

    #[test]
    fn page_navigation_flags() {
        let page = Page {
            items: vec![1, 2],
            total: 5,
            request: PageRequest::new(2, 2),
        };
        assert_eq!(page.page_count(), 3);
        assert!(page.has_next());
        assert!(page.has_previous());

        let empty: Page<i32> = Page {
            items: Vec::new(),
            total: 0,
            request: PageRequest::new(1, 10),
        };
        assert_eq!(empty.page_count(), 1);
        assert!(!empty.has_next());
    }
}
