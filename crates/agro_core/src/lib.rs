//! Core domain logic for the agro record backend.
//! This crate is the single source of truth for business invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod validation;

pub use config::{AgroConfig, ConfigError};
pub use db::{open_db, open_db_in_memory, DbError, DbResult};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError, LoggingOptions};
pub use model::field_errors::FieldErrors;
pub use model::state::StateCode;
pub use repo::{Page, PageRequest, RepoError, RepoResult};
pub use service::dashboard_service::{DashboardService, DashboardSnapshot};
pub use service::{ServiceError, ServiceResult};
pub use validation::area::{areas_within_total, validate_farm_areas};
pub use validation::document::{
    is_valid_document, validate_document, DocumentCheck, DocumentKind, DocumentPolicy,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
