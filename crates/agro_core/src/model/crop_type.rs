//! Crop type record and write input.

use super::field_errors::FieldErrors;
use super::{required_text, EpochMillis};
use serde::{Deserialize, Serialize};

pub type CropTypeId = i64;

const MAX_NAME_CHARS: usize = 100;

/// Persisted crop type. `name` is unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CropType {
    pub id: CropTypeId,
    pub name: String,
    pub created_at: EpochMillis,
    pub updated_at: EpochMillis,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CropTypeInput {
    pub name: Option<String>,
}

impl CropTypeInput {
    pub fn merged_over(self, current: &CropType) -> Self {
        Self {
            name: self.name.or_else(|| Some(current.name.clone())),
        }
    }
}

/// Validated crop type fields. `name` is trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CropTypeDraft {
    pub name: String,
}

impl CropTypeDraft {
    pub fn validate(input: &CropTypeInput) -> Result<Self, FieldErrors> {
        let mut errors = FieldErrors::new();
        match required_text(&mut errors, "name", input.name.as_deref(), MAX_NAME_CHARS) {
            Some(name) => Ok(Self { name }),
            None => Err(errors),
        }
    }
}
