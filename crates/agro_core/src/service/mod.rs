//! Core use-case services.
//!
//! # Responsibility
//! - Turn typed inputs into validated drafts and persist them through
//!   repository contracts.
//! - Run uniqueness and reference pre-checks, relying on storage constraints
//!   for the races those checks cannot close.
//!
//! # Invariants
//! - Service APIs never bypass draft validation.
//! - Services remain storage-agnostic and hold no shared mutable state.

pub mod crop_service;
pub mod crop_type_service;
pub mod dashboard_service;
pub mod farm_service;
pub mod farmer_service;

use crate::model::field_errors::{FieldErrors, NON_FIELD_ERRORS};
use crate::repo::RepoError;
use thiserror::Error;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Errors from record service operations.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// One or more fields failed validation; nothing was persisted.
    #[error("validation failed: {0}")]
    Validation(FieldErrors),
    /// A uniqueness rule rejected the write.
    #[error("{0}")]
    Conflict(String),
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },
    /// Unexpected storage failure.
    #[error(transparent)]
    Repo(RepoError),
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Conflict(message) => Self::Conflict(message),
            RepoError::NotFound { entity, id } => Self::NotFound { entity, id },
            RepoError::MissingReference(message) => {
                Self::Validation(FieldErrors::single(NON_FIELD_ERRORS, message))
            }
            other => Self::Repo(other),
        }
    }
}

impl From<FieldErrors> for ServiceError {
    fn from(value: FieldErrors) -> Self {
        Self::Validation(value)
    }
}

impl ServiceError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}

/// Message for a reference to a row that does not exist.
pub(crate) fn missing_reference_message(id: impl std::fmt::Display) -> String {
    format!("Invalid pk \"{id}\" - object does not exist.")
}
