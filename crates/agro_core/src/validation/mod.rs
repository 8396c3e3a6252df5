//! Pure field validators shared by the record services.
//!
//! # Invariants
//! - Validators never touch storage and never panic.
//! - Validators report validity as values; callers map them to field errors.

pub mod area;
pub mod document;
