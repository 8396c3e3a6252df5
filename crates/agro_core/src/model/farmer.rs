//! Farmer record and write input.
//!
//! # Invariants
//! - `document` is stored digits-only and is unique across farmers.
//! - `document` passes the CPF (11 digits) or CNPJ (14 digits) check.

use super::field_errors::FieldErrors;
use super::{required_text, EpochMillis, MAX_TEXT_CHARS};
use crate::validation::document::{validate_document, DocumentPolicy};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type FarmerId = Uuid;

pub const DOCUMENT_FIELD: &str = "cpf_cnpj";
pub const INVALID_DOCUMENT_MESSAGE: &str = "Enter a valid CPF or CNPJ.";

/// Persisted farmer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Farmer {
    pub id: FarmerId,
    /// Normalized CPF/CNPJ digits, serialized under the `cpf_cnpj` key.
    #[serde(rename = "cpf_cnpj")]
    pub document: String,
    pub name: String,
    pub created_at: EpochMillis,
    pub updated_at: EpochMillis,
}

/// Create/update payload. Absent fields are `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct FarmerInput {
    #[serde(rename = "cpf_cnpj")]
    pub document: Option<String>,
    pub name: Option<String>,
}

impl FarmerInput {
    /// Fills absent fields from `current`, for partial updates.
    pub fn merged_over(self, current: &Farmer) -> Self {
        Self {
            document: self.document.or_else(|| Some(current.document.clone())),
            name: self.name.or_else(|| Some(current.name.clone())),
        }
    }
}

/// Validated farmer fields ready for persistence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FarmerDraft {
    /// Digits-only document.
    pub document: String,
    pub name: String,
}

impl FarmerDraft {
    /// Validates every field of `input`, returning all failures together.
    pub fn validate(input: &FarmerInput, policy: DocumentPolicy) -> Result<Self, FieldErrors> {
        let mut errors = FieldErrors::new();

        let document = match input.document.as_deref() {
            None => {
                errors.push(DOCUMENT_FIELD, super::field_errors::REQUIRED);
                None
            }
            Some(raw) => {
                let check = validate_document(Some(raw), policy);
                match check.into_valid() {
                    Some((_, normalized)) => Some(normalized),
                    None => {
                        errors.push(DOCUMENT_FIELD, INVALID_DOCUMENT_MESSAGE);
                        None
                    }
                }
            }
        };
        let name = required_text(&mut errors, "name", input.name.as_deref(), MAX_TEXT_CHARS);

        match (document, name) {
            (Some(document), Some(name)) if errors.is_empty() => Ok(Self { document, name }),
            _ => Err(errors),
        }
    }
}
